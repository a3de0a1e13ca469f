//! Archive extraction for downloaded CLI distributions.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use flyway_core::{Error, Result};
use tar::Archive;
use tracing::debug;

/// Extract a `.tar.gz` or `.zip` archive into a destination directory.
///
/// The archive's top-level `flyway-{version}` directory is preserved, so
/// extraction into an installation root yields the standard layout.
///
/// # Errors
///
/// Returns an error for unsupported extensions or a corrupt archive.
pub fn extract_archive(archive: &Path, destination: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(archive = %archive.display(), destination = %destination.display(), "extracting archive");

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive, destination)
    } else if name.ends_with(".zip") {
        extract_zip(archive, destination)
    } else {
        Err(Error::extraction(archive, "unsupported archive format"))
    }
}

fn extract_tar_gz(archive: &Path, destination: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)?;
    let decoder = GzDecoder::new(file);
    let mut tar = Archive::new(decoder);
    tar.unpack(destination)
        .map_err(|e| Error::extraction(archive, e.to_string()))?;
    Ok(())
}

fn extract_zip(archive: &Path, destination: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)?;
    let mut zip =
        zip::ZipArchive::new(file).map_err(|e| Error::extraction(archive, e.to_string()))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| Error::extraction(archive, e.to_string()))?;

        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let outpath = destination.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut content = Vec::new();
            entry.read_to_end(&mut content)?;
            std::fs::write(&outpath, &content)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                let mut permissions = std::fs::metadata(&outpath)?.permissions();
                permissions.set_mode(mode);
                std::fs::set_permissions(&outpath, permissions)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn write_tar_gz(path: &Path, entry_path: &str, content: &[u8]) {
        let file = std::fs::File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, entry_path, content).unwrap();
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_tar_gz_preserves_layout() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("flyway-commandline-8.5.0-linux-x64.tar.gz");
        write_tar_gz(&archive, "flyway-8.5.0/flyway", b"#!/bin/sh\n");

        extract_archive(&archive, dir.path()).unwrap();
        assert!(dir.path().join("flyway-8.5.0").join("flyway").is_file());
    }

    #[test]
    fn test_unsupported_extension_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("flyway.rar");
        std::fs::write(&archive, b"junk").unwrap();

        let result = extract_archive(&archive, dir.path());
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[test]
    fn test_corrupt_tar_gz_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("flyway-commandline-8.5.0.tar.gz");
        std::fs::write(&archive, b"definitely not gzip").unwrap();

        let result = extract_archive(&archive, dir.path());
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }
}
