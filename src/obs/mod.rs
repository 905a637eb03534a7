//! OBS Studio WebSocket client adapter
//!
//! Provides the remote operations a toggle needs:
//! - Reading and switching the program scene
//! - Listing scenes and the items placed in them
//! - Resolving an item id by source name and toggling its visibility

mod scenes;
mod session;

use async_trait::async_trait;

use crate::error::Result;

pub use scenes::find_item_id_in;
pub use session::ObsSession;

/// The remote operations the toggle policy drives.
///
/// `ObsSession` is the real implementation; anything else implementing it
/// (test fakes, dry runs) sees exactly the calls a live run would make.
#[async_trait]
pub trait SceneControl: Send + Sync {
    /// Name of the scene currently on program output
    async fn active_scene(&self) -> Result<String>;

    /// Switch program output to `scene`
    async fn set_active_scene(&self, scene: &str) -> Result<()>;

    /// Show or hide the item sourced from `item` inside `scene`
    async fn set_item_enabled(&self, scene: &str, item: &str, enabled: bool) -> Result<()>;
}
