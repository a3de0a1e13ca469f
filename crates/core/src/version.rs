//! Flyway version resolution and download-URL construction.
//!
//! Version identifiers are opaque tagged strings such as `"V9.22.3"`; the
//! canonical numeric string used in artifact names is derived by stripping
//! the tag. Two legacy releases deviate: `V4.0.0` was published as `4.0`
//! (always platform-specific) and `V5.0.0` is the only release published
//! as a single platform-independent archive.

use crate::platform::{Arch, Os};

/// Maven repository path Flyway command-line archives are published under.
const REPOSITORY_URL: &str = "https://repo1.maven.org/maven2/org/flywaydb/flyway-commandline";

/// URL components derived from a version identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlComponents {
    /// Canonical numeric version string used in URLs and filenames.
    pub version_string: String,
    /// Whether the artifact name carries OS and architecture identifiers.
    pub platform_specific: bool,
}

/// Resolve the URL components for a version identifier.
///
/// Pure and total: unknown and future identifiers take the generic
/// strip-the-tag, platform-specific branch.
#[must_use]
pub fn url_components(version: &str) -> UrlComponents {
    match version {
        "V4.0.0" => UrlComponents {
            version_string: "4.0".to_string(),
            platform_specific: true,
        },
        "V5.0.0" => UrlComponents {
            version_string: strip_tag(version).to_string(),
            platform_specific: false,
        },
        _ => UrlComponents {
            version_string: strip_tag(version).to_string(),
            platform_specific: true,
        },
    }
}

fn strip_tag(version: &str) -> &str {
    version.strip_prefix('V').unwrap_or(version)
}

/// A resolved download URL and its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliUrl {
    /// Full download URL.
    pub url: String,
    /// Archive filename, also used for the local save path.
    pub file_name: String,
}

/// Build the download URL for a version on the given platform.
#[must_use]
pub fn build_url(version: &str, os: Os, arch: Arch) -> CliUrl {
    let components = url_components(version);
    let file_name = build_file_name(&components, os, arch);
    CliUrl {
        url: format!("{REPOSITORY_URL}/{}/{file_name}", components.version_string),
        file_name,
    }
}

fn build_file_name(components: &UrlComponents, os: Os, arch: Arch) -> String {
    if components.platform_specific {
        format!(
            "flyway-commandline-{}-{os}-{arch}.{}",
            components.version_string,
            os.archive_extension()
        )
    } else {
        format!("flyway-commandline-{}.tar.gz", components.version_string)
    }
}
