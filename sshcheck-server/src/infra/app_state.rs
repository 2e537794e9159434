use std::{fmt, sync::Arc};

use sshcheck_core::registry::CredentialRegistry;

use crate::infra::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CredentialRegistry>,
    pub config: Arc<ServerConfig>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("entries", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Fresh, empty registry using the configured staleness threshold.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(CredentialRegistry::new(config.staleness)),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
