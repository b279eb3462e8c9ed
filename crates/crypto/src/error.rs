//! Error types for crypto environment verification.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the write-once secret material store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretStoreError {
    /// `initialize` was called a second time
    #[error("Secret material already initialized; it cannot be replaced")]
    AlreadyInitialized,

    /// A copy was requested before `initialize`
    #[error("Secret material not initialized")]
    NotInitialized,
}

/// Low-level OpenPGP failures.
#[derive(Debug, Error)]
pub enum PgpError {
    #[error("OpenPGP error: {0}")]
    Pgp(#[from] pgp::errors::Error),

    #[error("Armored data is not valid UTF-8")]
    InvalidArmor,

    #[error("Keyring contains no secret keys")]
    EmptyKeyring,

    #[error("Public key has no encryption-capable key")]
    NoEncryptionKey,
}

/// The startup round trip did not reproduce the sentinel text.
#[derive(Debug, Error)]
pub enum CryptoVerificationError {
    #[error("Could not prepare crypto test file '{}': {source}", .path.display())]
    TestFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret material unavailable: {0}")]
    Secrets(#[from] SecretStoreError),

    #[error("{reason}. Checksum failure means the password is incorrect.")]
    RoundTrip { reason: String },
}

impl CryptoVerificationError {
    pub(crate) fn round_trip(reason: impl Into<String>) -> Self {
        Self::RoundTrip {
            reason: reason.into(),
        }
    }
}

/// Everything that can stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Required file or directory is absent
    #[error("{what} not present at '{}'.{}", .path.display(), .hint.map(|h| format!(" {h}")).unwrap_or_default())]
    MissingResource {
        what: &'static str,
        path: PathBuf,
        hint: Option<&'static str>,
    },

    #[error("Could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Secrets(#[from] SecretStoreError),

    #[error("Crypto verification failed: {0}")]
    Verification(#[from] CryptoVerificationError),
}
