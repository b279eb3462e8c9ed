//! Health check for the on-disk key material.

use async_trait::async_trait;
use errata_core::{HealthCheck, HealthStatus};

use crate::directory::CryptoDirectory;

/// Reports unhealthy once the keyring or public key disappears from disk.
///
/// The running process keeps working from memory, but a restart would fail,
/// so operators need to hear about it before then.
pub struct CryptoFilesHealthCheck {
    directory: CryptoDirectory,
}

impl CryptoFilesHealthCheck {
    pub fn new(directory: CryptoDirectory) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl HealthCheck for CryptoFilesHealthCheck {
    fn name(&self) -> &str {
        "Crypto files health check"
    }

    async fn check(&self) -> HealthStatus {
        let missing = self.directory.missing_files();
        if missing.is_empty() {
            return HealthStatus::Healthy;
        }

        let paths = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        HealthStatus::unhealthy(format!("Crypto files missing: {paths}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reports_removed_keyring() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("gpg")).unwrap();
        fs::write(dir.path().join("gpg/secring.gpg"), b"x").unwrap();
        fs::write(dir.path().join("gpg/public-key.asc"), "x").unwrap();

        let directory = CryptoDirectory::open(dir.path()).unwrap();
        let check = CryptoFilesHealthCheck::new(directory.clone());
        assert_eq!(check.check().await, HealthStatus::Healthy);

        fs::remove_file(directory.secret_keyring_path()).unwrap();
        match check.check().await {
            HealthStatus::Unhealthy { reason } => assert!(reason.contains("secring.gpg")),
            HealthStatus::Healthy => panic!("expected unhealthy"),
        }
    }
}
