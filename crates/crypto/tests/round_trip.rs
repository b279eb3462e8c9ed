//! Startup round trip against the fixture key pair.
//!
//! The fixture keyring under `fixtures/error-reporting` is unlocked with the
//! password `password`.

use std::fs;
use std::path::{Path, PathBuf};

use errata_crypto::{
    verify_crypto_environment, CryptoDirectory, CryptoEnvironment, CryptoVerificationError,
    SecretMaterialStore, StartupError,
};
use tempfile::TempDir;
use zeroize::Zeroizing;

const FIXTURE_PASSWORD: &str = "password";

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

/// Copy the example error-reporting structure into a scratch directory.
fn scratch_base_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let gpg = dir.path().join("gpg");
    fs::create_dir_all(&gpg).unwrap();
    for name in ["secring.gpg", "public-key.asc"] {
        fs::copy(fixtures().join("error-reporting/gpg").join(name), gpg.join(name)).unwrap();
    }
    dir
}

fn password(value: &str) -> Zeroizing<String> {
    Zeroizing::new(value.to_string())
}

#[test]
fn test_bootstrap_with_correct_password() {
    let dir = scratch_base_dir();

    let env = CryptoEnvironment::bootstrap(dir.path(), password(FIXTURE_PASSWORD)).unwrap();

    let on_disk = fs::read_to_string(dir.path().join("gpg/public-key.asc")).unwrap();
    assert_eq!(env.service_public_key().as_str(), on_disk);
    assert_eq!(
        env.secrets().password_copy().unwrap().as_str(),
        FIXTURE_PASSWORD
    );
}

#[test]
fn test_missing_test_file_is_created_then_verified() {
    let dir = scratch_base_dir();
    let test_file = dir.path().join("gpg/test.txt");
    assert!(!test_file.exists());

    CryptoEnvironment::bootstrap(dir.path(), password(FIXTURE_PASSWORD)).unwrap();

    assert_eq!(fs::read_to_string(test_file).unwrap(), "OK");
}

#[test]
fn test_wrong_password_fails_verification() {
    let dir = scratch_base_dir();

    let err = CryptoEnvironment::bootstrap(dir.path(), password("hunter2")).unwrap_err();
    match err {
        StartupError::Verification(CryptoVerificationError::RoundTrip { .. }) => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_password_fails_verification_on_protected_keyring() {
    let dir = scratch_base_dir();

    let err = CryptoEnvironment::bootstrap(dir.path(), password("")).unwrap_err();
    assert!(matches!(err, StartupError::Verification(_)));
}

#[test]
fn test_failure_message_points_at_password() {
    let dir = scratch_base_dir();

    let err = CryptoEnvironment::bootstrap(dir.path(), password("hunter2")).unwrap_err();
    assert!(err.to_string().contains("password is incorrect"));
}

#[test]
fn test_unrelated_public_key_fails_verification() {
    let dir = scratch_base_dir();
    fs::copy(
        fixtures().join("keys/unrelated-public-key.asc"),
        dir.path().join("gpg/public-key.asc"),
    )
    .unwrap();

    let err = CryptoEnvironment::bootstrap(dir.path(), password(FIXTURE_PASSWORD)).unwrap_err();
    assert!(matches!(err, StartupError::Verification(_)));
}

#[test]
fn test_tampered_test_file_fails_verification() {
    let dir = scratch_base_dir();
    fs::write(dir.path().join("gpg/test.txt"), "OK\n").unwrap();

    let err = CryptoEnvironment::bootstrap(dir.path(), password(FIXTURE_PASSWORD)).unwrap_err();
    match err {
        StartupError::Verification(CryptoVerificationError::RoundTrip { reason }) => {
            assert!(reason.contains("Incorrect message"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_armored_keyring_is_accepted() {
    let dir = scratch_base_dir();
    fs::copy(
        fixtures().join("keys/secring.asc"),
        dir.path().join("gpg/secring.gpg"),
    )
    .unwrap();

    CryptoEnvironment::bootstrap(dir.path(), password(FIXTURE_PASSWORD)).unwrap();
}

#[test]
fn test_missing_base_dir_is_missing_resource() {
    let dir = TempDir::new().unwrap();
    let base_dir = dir.path().join("absent");

    let err = CryptoEnvironment::bootstrap(&base_dir, password(FIXTURE_PASSWORD)).unwrap_err();
    assert!(matches!(err, StartupError::MissingResource { .. }));
}

#[test]
fn test_verification_requires_initialized_store() {
    let dir = scratch_base_dir();
    let directory = CryptoDirectory::open(dir.path()).unwrap();
    let store = SecretMaterialStore::new();

    let err = verify_crypto_environment(&directory, &store).unwrap_err();
    assert!(matches!(err, CryptoVerificationError::Secrets(_)));
}

#[test]
fn test_verification_is_repeatable() {
    let dir = scratch_base_dir();
    let directory = CryptoDirectory::open(dir.path()).unwrap();
    let store = SecretMaterialStore::new();
    store
        .initialize(
            directory.read_keyring().unwrap(),
            FIXTURE_PASSWORD.to_string(),
        )
        .unwrap();

    verify_crypto_environment(&directory, &store).unwrap();
    verify_crypto_environment(&directory, &store).unwrap();
}
