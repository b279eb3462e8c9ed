use std::sync::Arc;

use errata_core::SharedHealthReport;
use errata_crypto::{SecretMaterialStore, ServicePublicKey};

pub struct AppState {
    pub public_key: ServicePublicKey,
    /// Handed to the handlers that decrypt client submissions
    pub secrets: Arc<SecretMaterialStore>,
    pub health: SharedHealthReport,
}

impl AppState {
    pub fn new(
        public_key: ServicePublicKey,
        secrets: Arc<SecretMaterialStore>,
        health: SharedHealthReport,
    ) -> Self {
        AppState {
            public_key,
            secrets,
            health,
        }
    }
}
