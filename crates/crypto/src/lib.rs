//! Crypto environment verification for the Errata error-reporting backend.
//!
//! Before the service accepts traffic it must prove that its PGP key material
//! works end to end: the private keyring unlocks with the operator password,
//! and a payload encrypted to the served public key decrypts back to the
//! sentinel text.
//!
//! # Core Capabilities
//!
//! - **Secret material**: write-once store handing out zeroizing copies
//! - **Directory layout**: `gpg/secring.gpg`, `gpg/public-key.asc`, `gpg/test.txt`
//! - **Round-trip verification**: encrypt the sentinel, decrypt, compare
//! - **Crypto files health check**: key material still present on disk
//!
//! # Security Principles
//!
//! - Secrets are never logged
//! - Canonical secret buffers are never lent out, only copied
//! - Every buffer holding secret material is zeroized on drop
//! - Verification failures are returned, never turned into process exits

pub mod directory;
pub mod environment;
pub mod error;
pub mod health;
pub mod openpgp;
pub mod secret;
pub mod verifier;

pub use directory::{CryptoDirectory, ServicePublicKey};
pub use environment::CryptoEnvironment;
pub use error::{CryptoVerificationError, PgpError, SecretStoreError, StartupError};
pub use health::CryptoFilesHealthCheck;
pub use secret::SecretMaterialStore;
pub use verifier::{verify_crypto_environment, CryptoRoundTripVerifier, SENTINEL};
