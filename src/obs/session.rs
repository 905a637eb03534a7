//! OBS session lifetime
//!
//! One `ObsSession` owns one WebSocket connection for the duration of an
//! invocation.

use obws::Client as ObsClient;
use tracing::{debug, info, warn};

use crate::config::ToggleConfig;
use crate::error::{Result, ToggleError};

/// A single connection to OBS Studio
pub struct ObsSession {
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) password: Option<String>,

    // None until connect() succeeds, and again after disconnect()
    pub(super) client: Option<ObsClient>,
}

impl ObsSession {
    /// Create a disconnected session
    pub fn new(host: String, port: u16, password: Option<String>) -> Self {
        Self {
            host,
            port,
            password,
            client: None,
        }
    }

    /// Create from config
    pub fn from_config(config: &ToggleConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.password.clone())
    }

    /// Whether `connect()` has succeeded and `disconnect()` has not been called
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Get the connected OBS client, or an error if not connected
    pub(super) fn connected_client(&self) -> Result<&ObsClient> {
        self.client.as_ref().ok_or(ToggleError::NotConnected)
    }

    /// Connect to OBS WebSocket
    pub async fn connect(&mut self) -> Result<()> {
        info!("🎬 Connecting to OBS at {}:{}", self.host, self.port);

        let client = ObsClient::connect(self.host.clone(), self.port, self.password.clone())
            .await
            .map_err(|source| ToggleError::Connection {
                host: self.host.clone(),
                port: self.port,
                source,
            })?;

        match client.general().version().await {
            Ok(version) => {
                info!("OBS Studio version: {}", version.obs_version);
                debug!("obs-websocket version: {}", version.obs_web_socket_version);
            },
            Err(e) => warn!("Failed to query OBS version: {}", e),
        }

        self.client = Some(client);
        info!("✅ OBS WebSocket connected");
        Ok(())
    }

    /// Close the connection. Safe to call repeatedly or when never connected.
    pub async fn disconnect(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.disconnect().await;
            debug!("OBS WebSocket disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obs::SceneControl;

    fn session() -> ObsSession {
        ObsSession::new("localhost".to_string(), 4455, None)
    }

    #[test]
    fn test_new_session_is_disconnected() {
        assert!(!session().is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_is_noop() {
        let mut session = session();
        session.disconnect().await;
        session.disconnect().await;
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let session = session();

        assert!(matches!(
            session.active_scene().await,
            Err(ToggleError::NotConnected)
        ));
        assert!(matches!(
            session.set_active_scene("Main").await,
            Err(ToggleError::NotConnected)
        ));
        assert!(matches!(
            session.find_item_id("Main", "Cam").await,
            Err(ToggleError::NotConnected)
        ));
    }
}
