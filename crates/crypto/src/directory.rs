//! Crypto working directory layout.
//!
//! ```text
//! <base_dir>/
//!   gpg/secring.gpg      private keyring (required)
//!   gpg/public-key.asc   armored public key (required)
//!   gpg/test.txt         sentinel plaintext (created with "OK" if absent)
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::error::StartupError;
use crate::verifier::SENTINEL;

const SECRET_KEYRING: &str = "gpg/secring.gpg";
const PUBLIC_KEY: &str = "gpg/public-key.asc";
const TEST_FILE: &str = "gpg/test.txt";

const EXAMPLE_HINT: &str =
    "Consider copying the example structure from fixtures/error-reporting.";

/// Validated paths of the crypto working directory
#[derive(Debug, Clone)]
pub struct CryptoDirectory {
    base_dir: PathBuf,
    secret_keyring: PathBuf,
    public_key: PathBuf,
    test_file: PathBuf,
}

impl CryptoDirectory {
    /// Resolve the layout under `base_dir`, failing if the directory, the
    /// keyring or the public key is missing.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StartupError> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(StartupError::MissingResource {
                what: "Error reporting directory",
                path: base_dir,
                hint: Some(EXAMPLE_HINT),
            });
        }

        let directory = Self {
            secret_keyring: base_dir.join(SECRET_KEYRING),
            public_key: base_dir.join(PUBLIC_KEY),
            test_file: base_dir.join(TEST_FILE),
            base_dir,
        };

        require_file("Error reporting secret keyring", &directory.secret_keyring)?;
        require_file("Public key", &directory.public_key)?;

        Ok(directory)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn secret_keyring_path(&self) -> &Path {
        &self.secret_keyring
    }

    pub fn public_key_path(&self) -> &Path {
        &self.public_key
    }

    pub fn test_file_path(&self) -> &Path {
        &self.test_file
    }

    /// Raw keyring bytes. The caller hands them straight to the secret store.
    pub fn read_keyring(&self) -> Result<Vec<u8>, StartupError> {
        fs::read(&self.secret_keyring).map_err(|source| io_error(&self.secret_keyring, source))
    }

    pub fn read_public_key(&self) -> Result<ServicePublicKey, StartupError> {
        let armored = fs::read_to_string(&self.public_key)
            .map_err(|source| io_error(&self.public_key, source))?;
        Ok(ServicePublicKey::new(armored))
    }

    /// Contents of the sentinel file, creating it with [`SENTINEL`] first if
    /// it does not exist yet.
    pub fn ensure_test_file(&self) -> std::io::Result<Vec<u8>> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.test_file)
        {
            Ok(mut file) => {
                file.write_all(SENTINEL.as_bytes())?;
                file.flush()?;
                info!(path = %self.test_file.display(), "Created crypto test file");
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
        fs::read(&self.test_file)
    }

    /// Required key files that are no longer on disk.
    pub fn missing_files(&self) -> Vec<&Path> {
        [self.secret_keyring.as_path(), self.public_key.as_path()]
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }
}

/// The armored public key the service hands to clients.
///
/// Loaded once at startup; cloning shares the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePublicKey {
    armored: Arc<str>,
}

impl ServicePublicKey {
    pub fn new(armored: impl Into<Arc<str>>) -> Self {
        Self {
            armored: armored.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.armored
    }
}

fn require_file(what: &'static str, path: &Path) -> Result<(), StartupError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StartupError::MissingResource {
            what,
            path: path.to_path_buf(),
            hint: None,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StartupError {
    StartupError::Io {
        path: path.to_path_buf(),
        source,
    }
}
