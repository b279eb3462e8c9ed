//! Operator password acquisition.

use std::io::IsTerminal;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

/// Environment variable that supplies the keyring password non-interactively
pub const PASSWORD_ENV: &str = "ERRATA_PASSWORD";

/// Password of the example keyring under `fixtures/error-reporting`
pub const DEVELOPMENT_PASSWORD: &str = "password";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Could not read the password: {0}")]
    Read(#[from] std::io::Error),
}

/// Read the keyring password from `ERRATA_PASSWORD`, the terminal, or, when
/// there is no terminal, fall back to the development password.
///
/// An empty password is returned as is. Keyrings without a passphrase unlock
/// with it, and any other keyring fails the startup round trip.
pub fn read_password() -> Result<Zeroizing<String>, PasswordError> {
    resolve_password(
        std::env::var(PASSWORD_ENV).ok(),
        std::io::stdin().is_terminal(),
        || rpassword::prompt_password("Enter password: "),
    )
}

pub(crate) fn resolve_password<F>(
    from_env: Option<String>,
    interactive: bool,
    prompt: F,
) -> Result<Zeroizing<String>, PasswordError>
where
    F: FnOnce() -> std::io::Result<String>,
{
    if let Some(password) = from_env {
        return Ok(Zeroizing::new(password));
    }

    if !interactive {
        warn!("Could not obtain a console. Assuming an IDE and test data.");
        return Ok(Zeroizing::new(DEVELOPMENT_PASSWORD.to_string()));
    }

    Ok(Zeroizing::new(prompt()?))
}
