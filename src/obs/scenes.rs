//! Scene and scene item operations

use async_trait::async_trait;
use tracing::{debug, info};

use super::session::ObsSession;
use super::SceneControl;
use crate::error::{Result, ToggleError};

/// Find the id of the first item named `source_name` among `(id, name)` pairs.
///
/// Absence is `None`; no id value is reserved to mean "missing".
pub fn find_item_id_in<'a, I>(items: I, source_name: &str) -> Option<i64>
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    items
        .into_iter()
        .find(|(_, name)| *name == source_name)
        .map(|(id, _)| id)
}

impl ObsSession {
    /// List scene names in the order the OBS scene dock shows them.
    ///
    /// The API reports scenes bottom-up, so the list is reversed.
    pub async fn list_scenes(&self) -> Result<Vec<String>> {
        let client = self.connected_client()?;

        let scenes = client
            .scenes()
            .list()
            .await
            .map_err(|source| ToggleError::Query {
                what: "get scene list".to_string(),
                source,
            })?;

        let mut names: Vec<String> = scenes.scenes.into_iter().map(|s| s.name).collect();
        names.reverse();
        Ok(names)
    }

    /// List the source names of the items in `scene`, top of the source dock first.
    pub async fn list_scene_items(&self, scene: &str) -> Result<Vec<String>> {
        let client = self.connected_client()?;

        let items = client
            .scene_items()
            .list(scene)
            .await
            .map_err(|source| ToggleError::Query {
                what: format!("get scene item list for '{}'", scene),
                source,
            })?;

        let mut names: Vec<String> = items.into_iter().map(|i| i.source_name).collect();
        names.reverse();
        Ok(names)
    }

    /// Resolve the id of the item sourced from `source_name` in `scene`.
    pub async fn find_item_id(&self, scene: &str, source_name: &str) -> Result<Option<i64>> {
        let client = self.connected_client()?;

        debug!(
            "Resolving OBS item ID: scene='{}' source='{}'",
            scene, source_name
        );

        let items = client
            .scene_items()
            .list(scene)
            .await
            .map_err(|source| ToggleError::Query {
                what: format!("get scene item list for '{}'", scene),
                source,
            })?;

        let id = find_item_id_in(
            items.iter().map(|i| (i.id, i.source_name.as_str())),
            source_name,
        );
        debug!("OBS item ID for '{}/{}': {:?}", scene, source_name, id);
        Ok(id)
    }
}

#[async_trait]
impl SceneControl for ObsSession {
    async fn active_scene(&self) -> Result<String> {
        let client = self.connected_client()?;

        client
            .scenes()
            .current_program_scene()
            .await
            .map_err(|source| ToggleError::Query {
                what: "get active scene".to_string(),
                source,
            })
    }

    async fn set_active_scene(&self, scene: &str) -> Result<()> {
        let client = self.connected_client()?;

        info!("🎬 OBS: Switching program scene to '{}'", scene);
        client
            .scenes()
            .set_current_program_scene(scene)
            .await
            .map_err(|source| ToggleError::Command {
                what: format!("set active scene to '{}'", scene),
                source,
            })
    }

    async fn set_item_enabled(&self, scene: &str, item: &str, enabled: bool) -> Result<()> {
        let item_id = self
            .find_item_id(scene, item)
            .await?
            .ok_or_else(|| ToggleError::ItemNotFound {
                scene: scene.to_string(),
                item: item.to_string(),
            })?;

        let client = self.connected_client()?;

        info!(
            "🎬 OBS: Setting '{}' enabled={} in scene '{}'",
            item, enabled, scene
        );
        client
            .scene_items()
            .set_enabled(obws::requests::scene_items::SetEnabled {
                scene,
                item_id,
                enabled,
            })
            .await
            .map_err(|source| ToggleError::Command {
                what: format!(
                    "set item '{}' enabled={} in scene '{}'",
                    item, enabled, scene
                ),
                source,
            })
    }
}
