//! Toggle policy
//!
//! Turns the active scene plus a configured group into the remote changes
//! for one toggle, then applies them through a [`SceneControl`].
//!
//! Planning is pure; applying is strictly sequential and stops at the first
//! failure without undoing anything already applied.

use tracing::{debug, info, warn};

use crate::config::{GroupConfig, GroupKind, ToggleConfig};
use crate::error::Result;
use crate::obs::SceneControl;

/// One remote change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetActiveScene(String),
    SetItemEnabled {
        scene: String,
        item: String,
        enabled: bool,
    },
}

/// Outcome of a completed toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    /// Program scene before anything was changed
    pub previous_scene: String,
    /// Mutations issued, in order
    pub applied: Vec<Mutation>,
}

/// Scene following `current` in `scenes`, wrapping at the end.
///
/// A `current` not in the list restarts the cycle at `scenes[0]`. Returns
/// `None` only for an empty list.
pub fn next_scene<'a>(scenes: &'a [String], current: &str) -> Option<&'a str> {
    let first = scenes.first()?;
    let next = match scenes.iter().position(|s| s == current) {
        Some(i) => scenes.get(i + 1).unwrap_or(first),
        None => first,
    };
    Some(next.as_str())
}

/// Plan the mutations for a single group.
pub fn plan(group: &GroupConfig, current: &str) -> Vec<Mutation> {
    match group.kind {
        GroupKind::Scene => match next_scene(&group.scenes, current) {
            Some(target) => {
                debug!(
                    "Group '{}': '{}' -> '{}' (cycle {:?})",
                    group.name, current, target, group.scenes
                );
                vec![Mutation::SetActiveScene(target.to_string())]
            },
            None => Vec::new(),
        },
        GroupKind::Source => {
            let (Some(scene), Some(source)) = (group.scenes.first(), group.sources.first()) else {
                return Vec::new();
            };
            debug!(
                "Group '{}': reveal '{}' in '{}' (sources {:?})",
                group.name, source, scene, group.sources
            );

            // Already on the reveal scene: nothing to do
            if current == scene {
                return Vec::new();
            }

            vec![
                Mutation::SetActiveScene(scene.clone()),
                Mutation::SetItemEnabled {
                    scene: scene.clone(),
                    item: source.clone(),
                    enabled: true,
                },
            ]
        },
        GroupKind::Unknown => {
            debug!("Group '{}' has an unrecognized type, skipping", group.name);
            Vec::new()
        },
    }
}

/// Plan every group named `group_name`, in configuration order.
///
/// Each matching group is planned against the same `current` scene.
pub fn plan_for(config: &ToggleConfig, group_name: &str, current: &str) -> Vec<Mutation> {
    config
        .groups_named(group_name)
        .flat_map(|group| plan(group, current))
        .collect()
}

/// Group selected by the command-line positionals.
///
/// Exactly one positional names the group; none, or more than one, falls
/// back to the first configured group.
pub fn select_group<'a>(config: &'a ToggleConfig, positionals: &'a [String]) -> Option<&'a str> {
    match positionals {
        [group] => Some(group.as_str()),
        _ => config.default_group_name(),
    }
}

/// Issue `mutations` in order, stopping at the first failure.
pub async fn apply<C>(control: &C, mutations: &[Mutation]) -> Result<()>
where
    C: SceneControl + ?Sized,
{
    for mutation in mutations {
        match mutation {
            Mutation::SetActiveScene(scene) => control.set_active_scene(scene).await?,
            Mutation::SetItemEnabled {
                scene,
                item,
                enabled,
            } => control.set_item_enabled(scene, item, *enabled).await?,
        }
    }
    Ok(())
}

/// Run one toggle of `group_name`: read the active scene, plan, apply.
pub async fn run<C>(control: &C, config: &ToggleConfig, group_name: &str) -> Result<ToggleReport>
where
    C: SceneControl + ?Sized,
{
    let current = control.active_scene().await?;
    info!("Current scene: {}", current);

    let mut matched = config.groups_named(group_name).peekable();
    if matched.peek().is_none() {
        warn!("No group named '{}' in configuration, nothing to do", group_name);
    }
    for group in matched {
        if let Some(reason) = group.inactive_reason() {
            warn!("Group '{}' cannot be toggled: {}", group.name, reason);
        }
    }

    let mutations = plan_for(config, group_name, &current);
    if mutations.is_empty() {
        info!("Group '{}': no change needed", group_name);
    }

    apply(control, &mutations).await?;

    Ok(ToggleReport {
        previous_scene: current,
        applied: mutations,
    })
}
