//! Write-once store for the unlocked private keyring and its password.
//!
//! The canonical buffers never leave the store. Every read hands back a
//! freshly allocated copy wrapped in [`Zeroizing`], so a caller mutating its
//! copy cannot affect the store or another caller, and the copy is wiped
//! when the caller drops it.

use std::fmt;
use std::sync::OnceLock;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::SecretStoreError;

#[derive(ZeroizeOnDrop)]
struct SecretMaterial {
    keyring: Vec<u8>,
    password: String,
}

/// Holder for the PGP secret keyring and password.
///
/// Shared by `Arc` with the few components that need it.
#[derive(Default)]
pub struct SecretMaterialStore {
    material: OnceLock<SecretMaterial>,
}

impl SecretMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyring and password. Succeeds exactly once; the material
    /// passed to any later call is zeroized and rejected.
    pub fn initialize(&self, keyring: Vec<u8>, password: String) -> Result<(), SecretStoreError> {
        self.material
            .set(SecretMaterial { keyring, password })
            .map_err(|_rejected| SecretStoreError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.material.get().is_some()
    }

    /// A fresh copy of the keyring bytes.
    pub fn keyring_copy(&self) -> Result<Zeroizing<Vec<u8>>, SecretStoreError> {
        let material = self.material.get().ok_or(SecretStoreError::NotInitialized)?;
        Ok(Zeroizing::new(material.keyring.clone()))
    }

    /// A fresh copy of the keyring password.
    pub fn password_copy(&self) -> Result<Zeroizing<String>, SecretStoreError> {
        let material = self.material.get().ok_or(SecretStoreError::NotInitialized)?;
        Ok(Zeroizing::new(material.password.clone()))
    }
}

impl fmt::Debug for SecretMaterialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterialStore")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SecretMaterialStore {
        let store = SecretMaterialStore::new();
        store
            .initialize(vec![1, 2, 3, 4], "correct horse".to_string())
            .unwrap();
        store
    }

    #[test]
    fn test_copies_before_initialize_fail() {
        let store = SecretMaterialStore::new();
        assert!(!store.is_initialized());
        assert_eq!(store.keyring_copy().unwrap_err(), SecretStoreError::NotInitialized);
        assert_eq!(store.password_copy().unwrap_err(), SecretStoreError::NotInitialized);
    }

    #[test]
    fn test_second_initialize_is_rejected() {
        let store = store();
        let err = store
            .initialize(vec![9, 9], "other".to_string())
            .unwrap_err();
        assert_eq!(err, SecretStoreError::AlreadyInitialized);

        // Original material is untouched
        assert_eq!(store.keyring_copy().unwrap().as_slice(), &[1, 2, 3, 4]);
        assert_eq!(store.password_copy().unwrap().as_str(), "correct horse");
    }

    #[test]
    fn test_keyring_copies_are_independent() {
        let store = store();
        let mut first = store.keyring_copy().unwrap();
        let second = store.keyring_copy().unwrap();

        assert_eq!(*first, *second);
        assert_ne!(first.as_ptr(), second.as_ptr());

        first[0] = 0xff;
        first.push(0xee);
        assert_eq!(second.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(store.keyring_copy().unwrap().as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_password_copies_are_independent() {
        let store = store();
        let mut first = store.password_copy().unwrap();
        let second = store.password_copy().unwrap();

        assert_eq!(*first, *second);
        assert_ne!(first.as_ptr(), second.as_ptr());

        first.push_str(" battery");
        assert_eq!(second.as_str(), "correct horse");
        assert_eq!(store.password_copy().unwrap().as_str(), "correct horse");
    }

    #[test]
    fn test_debug_does_not_leak_secrets() {
        let rendered = format!("{:?}", store());
        assert!(!rendered.contains("correct horse"));
        assert!(rendered.contains("initialized: true"));
    }
}
