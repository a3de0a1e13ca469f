//! The acquisition-strategy trait and chain composition.

use async_trait::async_trait;
use flyway_core::{FlywayCli, Result};
use tracing::{debug, warn};

/// One concrete way of obtaining a Flyway CLI for a requested version.
///
/// Outcomes per attempt: `Ok(Some(cli))` resolved, `Ok(None)` nothing found
/// (a fallback may still succeed), `Err` failed.
#[async_trait]
pub trait FlywayCliProvider: Send + Sync {
    /// Provider name, used in diagnostics when chains fall through.
    fn name(&self) -> &'static str;

    /// Attempt to obtain a CLI of the given version.
    ///
    /// # Errors
    ///
    /// Returns an error when the strategy definitively failed, e.g. a
    /// version mismatch on disk or a download failure. Absence is not an
    /// error.
    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>>;
}

/// Compose two providers so that the fallback runs when the primary yields
/// nothing or fails.
///
/// A primary failure is logged with the failing provider's name and never
/// re-raised; only the last provider in a chain propagates its error.
/// Composition is associative, so chains of any length are built two at a
/// time: `chain(a, chain(b, c))`.
#[must_use]
pub fn chain(
    primary: Box<dyn FlywayCliProvider>,
    fallback: Box<dyn FlywayCliProvider>,
) -> Box<dyn FlywayCliProvider> {
    Box::new(ChainedProvider { primary, fallback })
}

struct ChainedProvider {
    primary: Box<dyn FlywayCliProvider>,
    fallback: Box<dyn FlywayCliProvider>,
}

#[async_trait]
impl FlywayCliProvider for ChainedProvider {
    fn name(&self) -> &'static str {
        "chained"
    }

    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
        match self.primary.get_cli(version).await {
            Ok(Some(cli)) => Ok(Some(cli)),
            Ok(None) => {
                debug!(
                    provider = self.primary.name(),
                    fallback = self.fallback.name(),
                    %version,
                    "provider found no CLI, trying fallback"
                );
                self.fallback.get_cli(version).await
            }
            Err(error) => {
                warn!(
                    provider = self.primary.name(),
                    fallback = self.fallback.name(),
                    %error,
                    "provider failed, trying fallback"
                );
                self.fallback.get_cli(version).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyway_core::{CliSource, Error, FlywayExecutable};
    use std::path::PathBuf;

    struct ResolvingProvider;

    #[async_trait]
    impl FlywayCliProvider for ResolvingProvider {
        fn name(&self) -> &'static str {
            "resolving"
        }

        async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
            Ok(Some(FlywayCli {
                version: version.to_string(),
                source: CliSource::FileSystem,
                location: PathBuf::from("example-location"),
                executable: FlywayExecutable::new("/some/path/flyway"),
            }))
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl FlywayCliProvider for EmptyProvider {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn get_cli(&self, _version: &str) -> Result<Option<FlywayCli>> {
            Ok(None)
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl FlywayCliProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
            Err(Error::CliUnavailable {
                requested: version.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_chain_falls_through_not_found() {
        let provider = chain(
            Box::new(EmptyProvider),
            chain(
                Box::new(EmptyProvider),
                chain(Box::new(ResolvingProvider), Box::new(EmptyProvider)),
            ),
        );

        let cli = provider.get_cli("V4.0.0").await.unwrap().unwrap();
        assert_eq!(cli.executable.path(), PathBuf::from("/some/path/flyway"));
    }

    #[tokio::test]
    async fn test_chain_falls_through_failures() {
        let provider = chain(
            Box::new(FailingProvider),
            chain(
                Box::new(EmptyProvider),
                chain(Box::new(ResolvingProvider), Box::new(FailingProvider)),
            ),
        );

        let cli = provider.get_cli("V4.0.0").await.unwrap();
        assert!(cli.is_some());
    }

    #[tokio::test]
    async fn test_last_provider_error_propagates() {
        let provider = chain(Box::new(EmptyProvider), Box::new(FailingProvider));
        let result = provider.get_cli("V4.0.0").await;
        assert!(matches!(result, Err(Error::CliUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_resolved_primary_short_circuits() {
        let provider = chain(Box::new(ResolvingProvider), Box::new(FailingProvider));
        let cli = provider.get_cli("V9.22.3").await.unwrap().unwrap();
        assert_eq!(cli.version, "V9.22.3");
    }
}
