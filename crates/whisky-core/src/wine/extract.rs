//! Archive extraction for runtime installs.

use crate::{Result, WhiskyError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Unpacks an archive into a directory.
///
/// Runs on the blocking pool; implementations may do arbitrary file I/O.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    TarGz,
    Tar,
    Zip,
}

impl ArchiveKind {
    fn detect(archive: &Path) -> Option<Self> {
        let name = archive.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else {
            None
        }
    }
}

/// Default extractor for `.tar.gz`, `.tgz`, `.tar` and `.zip` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker;

impl ArchiveUnpacker {
    fn open(archive: &Path) -> Result<BufReader<File>> {
        let file = File::open(archive).map_err(|e| WhiskyError::Io {
            message: format!("Failed to open archive: {}", e),
            path: Some(archive.to_path_buf()),
            source: Some(e),
        })?;
        Ok(BufReader::new(file))
    }

    fn unpack_tar<R: std::io::Read>(reader: R, archive: &Path, destination: &Path) -> Result<()> {
        tar::Archive::new(reader)
            .unpack(destination)
            .map_err(|e| WhiskyError::ExtractionFailed {
                archive: archive.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn unpack_zip(archive: &Path, destination: &Path) -> Result<()> {
        let failed = |message: String| WhiskyError::ExtractionFailed {
            archive: archive.to_path_buf(),
            message,
        };
        let mut zip = zip::ZipArchive::new(Self::open(archive)?)
            .map_err(|e| failed(format!("Invalid zip archive: {}", e)))?;
        zip.extract(destination).map_err(|e| failed(e.to_string()))
    }
}

impl ArchiveExtractor for ArchiveUnpacker {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let kind = ArchiveKind::detect(archive)
            .ok_or_else(|| WhiskyError::UnsupportedArchive(archive.to_path_buf()))?;
        debug!("Extracting {:?} archive {}", kind, archive.display());

        match kind {
            ArchiveKind::TarGz => {
                let decoder = flate2::read::GzDecoder::new(Self::open(archive)?);
                Self::unpack_tar(decoder, archive, destination)
            }
            ArchiveKind::Tar => Self::unpack_tar(Self::open(archive)?, archive, destination),
            ArchiveKind::Zip => Self::unpack_zip(archive, destination),
        }
    }
}
