//! Startup sequence for the crypto environment.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use zeroize::Zeroizing;

use crate::directory::{CryptoDirectory, ServicePublicKey};
use crate::error::StartupError;
use crate::secret::SecretMaterialStore;
use crate::verifier::verify_crypto_environment;

/// Verified key material, ready to be shared with request handlers.
#[derive(Debug, Clone)]
pub struct CryptoEnvironment {
    directory: CryptoDirectory,
    secrets: Arc<SecretMaterialStore>,
    public_key: ServicePublicKey,
}

impl CryptoEnvironment {
    /// Load the keyring into a new store, run the round-trip check and load
    /// the public key. Nothing is returned unless every step passed.
    pub fn bootstrap(
        base_dir: impl Into<PathBuf>,
        mut password: Zeroizing<String>,
    ) -> Result<Self, StartupError> {
        let directory = CryptoDirectory::open(base_dir)?;

        let secrets = Arc::new(SecretMaterialStore::new());
        secrets.initialize(directory.read_keyring()?, std::mem::take(&mut *password))?;

        verify_crypto_environment(&directory, &secrets)?;

        let public_key = directory.read_public_key()?;
        info!(
            public_key = %directory.public_key_path().display(),
            "Crypto environment verified"
        );

        Ok(Self {
            directory,
            secrets,
            public_key,
        })
    }

    pub fn directory(&self) -> &CryptoDirectory {
        &self.directory
    }

    /// Secret store for components that must decrypt client submissions
    pub fn secrets(&self) -> Arc<SecretMaterialStore> {
        Arc::clone(&self.secrets)
    }

    /// The public key to serve to consumers of this service
    pub fn service_public_key(&self) -> &ServicePublicKey {
        &self.public_key
    }
}
