//! Startup round-trip verification.
//!
//! The sentinel file is encrypted to the service public key and decrypted
//! with the secret keyring and password from the [`SecretMaterialStore`].
//! Only an exact match with [`SENTINEL`] passes. A wrong password is the
//! usual cause of failure: rPGP rejects the unlocked key material on its
//! checksum instead of producing garbage plaintext.

use tracing::{info, warn};

use crate::directory::CryptoDirectory;
use crate::error::CryptoVerificationError;
use crate::openpgp;
use crate::secret::SecretMaterialStore;

/// Expected content of `gpg/test.txt`
pub const SENTINEL: &str = "OK";

/// Encrypt→decrypt self-test over the production key pair
pub struct CryptoRoundTripVerifier<'a> {
    directory: &'a CryptoDirectory,
    secrets: &'a SecretMaterialStore,
}

impl<'a> CryptoRoundTripVerifier<'a> {
    pub fn new(directory: &'a CryptoDirectory, secrets: &'a SecretMaterialStore) -> Self {
        Self { directory, secrets }
    }

    pub fn verify(&self) -> Result<(), CryptoVerificationError> {
        let test_file = self.directory.test_file_path();
        let plaintext =
            self.directory
                .ensure_test_file()
                .map_err(|source| CryptoVerificationError::TestFile {
                    path: test_file.to_path_buf(),
                    source,
                })?;

        let armored_public_key = self
            .directory
            .read_public_key()
            .map_err(|e| CryptoVerificationError::round_trip(e.to_string()))?;
        let public_key = openpgp::parse_public_key(armored_public_key.as_str())
            .map_err(|e| CryptoVerificationError::round_trip(format!("public key: {e}")))?;
        let ciphertext = openpgp::encrypt_armored(&public_key, &plaintext)
            .map_err(|e| CryptoVerificationError::round_trip(format!("encrypt: {e}")))?;

        let keyring = self.secrets.keyring_copy()?;
        let password = self.secrets.password_copy()?;
        let keys = openpgp::parse_keyring(&keyring)
            .map_err(|e| CryptoVerificationError::round_trip(format!("secret keyring: {e}")))?;
        let decrypted = openpgp::decrypt_armored(&ciphertext, &keys, &password)
            .map_err(|e| CryptoVerificationError::round_trip(format!("decrypt: {e}")))?;

        if decrypted != SENTINEL.as_bytes() {
            warn!(
                path = %test_file.display(),
                "Decrypted crypto test file does not match sentinel"
            );
            return Err(CryptoVerificationError::round_trip(
                "Incorrect message in test crypto file",
            ));
        }

        info!(base_dir = %self.directory.base_dir().display(), "Crypto keys OK");
        Ok(())
    }
}

/// Run the startup round trip once. Callers treat any error as fatal.
pub fn verify_crypto_environment(
    directory: &CryptoDirectory,
    secrets: &SecretMaterialStore,
) -> Result<(), CryptoVerificationError> {
    CryptoRoundTripVerifier::new(directory, secrets).verify()
}
