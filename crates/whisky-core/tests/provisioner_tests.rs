//! Integration tests for installing, uninstalling and update-checking
//! WhiskyWine.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use whisky_kit::wine::{ArchiveExtractor, WhiskyWineInstaller, WineLayout};
use whisky_kit::{SemanticVersion, WhiskyError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a WhiskyWine-shaped `.tar.gz` with the given version descriptor.
fn build_runtime_archive(dir: &Path, version: &str, extra: &[(&str, &[u8])]) -> PathBuf {
    let archive = dir.join("WhiskyWine.tar.gz");
    let encoder = GzEncoder::new(File::create(&archive).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let descriptor = format!(r#"{{"version":"{}"}}"#, version);
    let mut files: Vec<(&str, &[u8])> = vec![
        ("Libraries/WhiskyWineVersion.json", descriptor.as_bytes()),
        ("Libraries/Wine/bin/wine64", &b"#!/bin/sh\necho wine-9.0\n"[..]),
    ];
    files.extend_from_slice(extra);

    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    archive
}

fn installer_in(temp_dir: &TempDir) -> WhiskyWineInstaller {
    WhiskyWineInstaller::new(WineLayout::new(temp_dir.path().join("app"))).unwrap()
}

#[tokio::test]
async fn test_install_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);
    assert!(!installer.is_installed());
    assert_eq!(installer.local_version(), None);

    let archive = build_runtime_archive(temp_dir.path(), "2.1.0", &[]);
    installer.install(&archive).await.unwrap();

    assert!(installer.is_installed());
    assert_eq!(installer.local_version(), Some(SemanticVersion::new(2, 1, 0)));
    assert!(installer.layout().bin_folder().join("wine64").is_file());
    assert!(!archive.exists(), "source archive should be deleted");
}

#[tokio::test]
async fn test_install_replaces_corrupt_previous_install() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);
    let layout = installer.layout().clone();

    // Leftovers from an older, half-finished install.
    fs::create_dir_all(layout.bin_folder()).unwrap();
    fs::write(layout.bin_folder().join("wine-old"), b"stale").unwrap();
    fs::write(layout.version_file(), b"{ corrupt").unwrap();
    fs::write(layout.application_folder().join("stray.txt"), b"stray").unwrap();
    assert!(!installer.is_installed());

    let archive = build_runtime_archive(temp_dir.path(), "1.2.0", &[]);
    installer.install(&archive).await.unwrap();

    assert!(installer.is_installed());
    assert_eq!(installer.local_version(), Some(SemanticVersion::new(1, 2, 0)));
    assert!(!layout.bin_folder().join("wine-old").exists());
    assert!(!layout.application_folder().join("stray.txt").exists());
}

#[tokio::test]
async fn test_install_is_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);

    let archive = build_runtime_archive(temp_dir.path(), "1.0.0", &[("Libraries/extra.txt", &b"x"[..])]);
    installer.install(&archive).await.unwrap();

    let archive = build_runtime_archive(temp_dir.path(), "1.1.0", &[]);
    installer.install(&archive).await.unwrap();

    assert_eq!(installer.local_version(), Some(SemanticVersion::new(1, 1, 0)));
    assert!(!installer.layout().library_folder().join("extra.txt").exists());
}

#[tokio::test]
async fn test_install_corrupt_archive_fails() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);
    let archive = temp_dir.path().join("WhiskyWine.tar.gz");
    fs::write(&archive, b"not a tarball").unwrap();

    let result = installer.install(&archive).await;
    assert!(matches!(result, Err(WhiskyError::InstallationFailed { .. })));
    assert!(!installer.is_installed());
    // No cleanup beyond what already happened: the archive is still there.
    assert!(archive.exists());
}

#[tokio::test]
async fn test_install_missing_archive_fails() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);

    let result = installer.install(&temp_dir.path().join("missing.tar.gz")).await;
    let err = result.unwrap_err();
    assert!(err.is_provisioning());
}

struct FailingExtractor;

impl ArchiveExtractor for FailingExtractor {
    fn extract(&self, archive: &Path, _destination: &Path) -> whisky_kit::Result<()> {
        Err(WhiskyError::ExtractionFailed {
            archive: archive.to_path_buf(),
            message: "disk full".into(),
        })
    }
}

#[tokio::test]
async fn test_install_uses_injected_extractor() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir).with_extractor(Arc::new(FailingExtractor));
    let archive = build_runtime_archive(temp_dir.path(), "1.0.0", &[]);

    let err = installer.install(&archive).await.unwrap_err();
    assert!(err.to_string().contains("disk full"));
    // The folder was recreated before extraction failed.
    assert!(installer.layout().application_folder().is_dir());
}

#[tokio::test]
async fn test_uninstall_keeps_application_folder() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);
    let archive = build_runtime_archive(temp_dir.path(), "1.0.0", &[]);
    installer.install(&archive).await.unwrap();
    let keep = installer.layout().application_folder().join("keep.json");
    fs::write(&keep, b"{}").unwrap();

    installer.uninstall().unwrap();

    assert!(!installer.is_installed());
    assert!(!installer.layout().library_folder().exists());
    assert!(keep.exists());
}

#[tokio::test]
async fn test_uninstall_without_install_fails() {
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir);

    assert!(matches!(
        installer.uninstall(),
        Err(WhiskyError::UninstallFailed { .. })
    ));
}

async fn feed_serving(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Wine/WhiskyWineVersion.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(&server)
        .await;
    server
}

async fn installed_at(temp_dir: &TempDir, version: &str, feed: &MockServer) -> WhiskyWineInstaller {
    let installer = installer_in(temp_dir)
        .with_version_url(&format!("{}/Wine/WhiskyWineVersion.json", feed.uri()))
        .unwrap();
    let archive = build_runtime_archive(temp_dir.path(), version, &[]);
    installer.install(&archive).await.unwrap();
    installer
}

#[tokio::test]
async fn test_check_for_update_reports_newer_remote() {
    let feed = feed_serving(r#"{"version":"1.1.0"}"#).await;
    let temp_dir = TempDir::new().unwrap();
    let installer = installed_at(&temp_dir, "1.0.0", &feed).await;

    let check = installer.check_for_update().await;
    assert!(check.available);
    assert_eq!(check.remote_version, SemanticVersion::new(1, 1, 0));
}

#[tokio::test]
async fn test_check_for_update_ignores_older_remote() {
    let feed = feed_serving(r#"{"version":"1.0.0"}"#).await;
    let temp_dir = TempDir::new().unwrap();
    let installer = installed_at(&temp_dir, "1.1.0", &feed).await;

    let check = installer.check_for_update().await;
    assert!(!check.available);
    assert_eq!(check.remote_version, SemanticVersion::ZERO);
}

#[tokio::test]
async fn test_check_for_update_without_local_install() {
    let feed = feed_serving(r#"{"version":"5.0.0"}"#).await;
    let temp_dir = TempDir::new().unwrap();
    let installer = installer_in(&temp_dir)
        .with_version_url(&format!("{}/Wine/WhiskyWineVersion.json", feed.uri()))
        .unwrap();

    assert_eq!(
        installer.remote_version().await.unwrap(),
        SemanticVersion::new(5, 0, 0)
    );
    let check = installer.check_for_update().await;
    assert!(!check.available);
}

#[tokio::test]
async fn test_check_for_update_bad_body_is_no_update() {
    let feed = feed_serving("<plist>nope</plist>").await;
    let temp_dir = TempDir::new().unwrap();
    let installer = installed_at(&temp_dir, "1.0.0", &feed).await;

    let check = installer.check_for_update().await;
    assert!(!check.available);
    assert_eq!(check.remote_version, SemanticVersion::ZERO);
}

#[tokio::test]
async fn test_check_for_update_http_error_is_no_update() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let installer = installed_at(&temp_dir, "1.0.0", &feed).await;

    assert!(installer.remote_version().await.is_err());
    assert!(!installer.check_for_update().await.available);
}
