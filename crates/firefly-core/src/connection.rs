//! Gateway connection state.
//!
//! The host bridge may attach after the UI has started rendering. Until then
//! every store operation is a silent no-op rather than an error.

use crate::gateway::BackendGateway;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Availability of the backend gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    /// No gateway attached yet.
    Disconnected,
    /// A gateway is attached and calls are forwarded to it.
    Connected,
}

/// Shared handle through which both stores reach the gateway.
///
/// Transitions only from `Disconnected` to `Connected`; attaching again swaps
/// the gateway but stays connected.
pub struct GatewayConnection {
    gateway: RwLock<Option<Arc<dyn BackendGateway>>>,
}

impl GatewayConnection {
    /// Creates a connection with no gateway attached.
    pub fn disconnected() -> Self {
        Self {
            gateway: RwLock::new(None),
        }
    }

    /// Creates a connection that is already attached.
    pub fn connected(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway: RwLock::new(Some(gateway)),
        }
    }

    /// Attaches the gateway, moving to `Connected`.
    pub fn attach(&self, gateway: Arc<dyn BackendGateway>) {
        let mut slot = self.gateway.write().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            tracing::debug!("[GatewayConnection] Replacing attached gateway");
        } else {
            tracing::info!("[GatewayConnection] Gateway attached");
        }
        *slot = Some(gateway);
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.gateway().is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Returns the attached gateway, if any.
    pub fn gateway(&self) -> Option<Arc<dyn BackendGateway>> {
        self.gateway
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for GatewayConnection {
    fn default() -> Self {
        Self::disconnected()
    }
}
