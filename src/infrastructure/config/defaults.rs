//! Compiled-in baseline for both settings documents.

use crate::domain::models::{AppConfig, TransportSettings};

/// Baseline values an overlay is layered on top of.
///
/// `Default` yields the compiled-in values; deployments that ship a
/// different baseline can replace either document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsRegistry {
    transport: TransportSettings,
    app: AppConfig,
}

impl DefaultsRegistry {
    pub const fn new(transport: TransportSettings, app: AppConfig) -> Self {
        Self { transport, app }
    }

    pub fn with_transport(mut self, transport: TransportSettings) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_app(mut self, app: AppConfig) -> Self {
        self.app = app;
        self
    }

    pub const fn transport(&self) -> &TransportSettings {
        &self.transport
    }

    pub const fn app(&self) -> &AppConfig {
        &self.app
    }
}
