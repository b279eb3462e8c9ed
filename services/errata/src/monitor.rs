//! Public-key identity probe.
//!
//! Fetches the public key the running service is actually serving and
//! checks it is not the development key bundled with the example directory
//! structure. A test public key paired with its test keyring passes the
//! startup round trip, so this is the only place that mistake shows up.

use async_trait::async_trait;
use errata_core::{HealthCheck, HealthStatus};
use reqwest::header::ACCEPT;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Leading armor of the known development key
pub const DECOY_KEY_FINGERPRINT: &str =
    "mQENBFMxpmwBCADAypURRQTJuxAk1CcTVE5fg3vFmts8O2+VQwILCkhJHJ1wwZEO";

/// Classify served public-key text. Unhealthy iff it contains the decoy key.
pub fn classify_served_key(served: &str, base_dir: &Path) -> HealthStatus {
    if served.contains(DECOY_KEY_FINGERPRINT) {
        HealthStatus::unhealthy(format!(
            "Public key is TEST key. Check {} contents carefully.",
            base_dir.display()
        ))
    } else {
        HealthStatus::Healthy
    }
}

pub struct PublicKeyIdentityMonitor {
    client: reqwest::Client,
    url: String,
    base_dir: PathBuf,
}

impl PublicKeyIdentityMonitor {
    /// `url` is the public-key endpoint; `base_dir` only appears in the
    /// unhealthy message.
    pub fn new(url: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            base_dir: base_dir.into(),
        }
    }

    async fn fetch(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(&self.url)
            .header(ACCEPT, "text/plain")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl HealthCheck for PublicKeyIdentityMonitor {
    fn name(&self) -> &str {
        "Public key health check"
    }

    async fn check(&self) -> HealthStatus {
        match self.fetch().await {
            Ok(served) => classify_served_key(&served, &self.base_dir),
            Err(err) => {
                debug!(url = %self.url, error = %err, "Public key probe failed");
                HealthStatus::unhealthy(format!("Public key probe failed: {err}"))
            }
        }
    }
}
