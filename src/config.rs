//! Configuration management for OBS Toggle
//!
//! Handles loading, parsing and validation of the YAML configuration file,
//! plus `OBS_*` environment overrides for the connection fields.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Result, ToggleError};

/// Environment variable overriding `host`
pub const ENV_HOST: &str = "OBS_HOST";
/// Environment variable overriding `port`
pub const ENV_PORT: &str = "OBS_PORT";
/// Environment variable overriding `password`
pub const ENV_PASSWORD: &str = "OBS_PASSWORD";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToggleConfig {
    #[serde(default = "default_obs_host")]
    pub host: String,
    #[serde(default = "default_obs_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// A named, ordered set of scenes (and sources) toggled as one unit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    #[serde(default)]
    pub scenes: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// How a group is toggled
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Advance the program scene through `scenes`, wrapping at the end
    Scene,
    /// Switch to `scenes[0]` and make `sources[0]` visible in it
    Source,
    /// Any other tag; such groups are never acted upon
    #[serde(other)]
    Unknown,
}

impl GroupConfig {
    /// Why toggling this group would do nothing, or `None` if it can be toggled
    pub fn inactive_reason(&self) -> Option<&'static str> {
        match self.kind {
            GroupKind::Scene if self.scenes.is_empty() => Some("scene group lists no scenes"),
            GroupKind::Source if self.scenes.is_empty() => {
                Some("source group lists no scene to reveal in")
            },
            GroupKind::Source if self.sources.is_empty() => Some("source group lists no sources"),
            GroupKind::Unknown => Some("unrecognized type"),
            _ => None,
        }
    }
}

impl ToggleConfig {
    /// Load configuration from file, apply environment overrides and validate
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|source| ToggleError::ConfigLoad {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::parse(&contents, path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;

        // Validate the loaded configuration
        config.validate()?;

        Ok(config)
    }

    /// Parse YAML contents; `path` is only used for error reporting
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let mut config: ToggleConfig =
            serde_yaml::from_str(contents).map_err(|source| ToggleError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        // An empty password in YAML means "no authentication"
        if config.password.as_deref() == Some("") {
            config.password = None;
        }

        Ok(config)
    }

    /// Override connection fields from `OBS_HOST`, `OBS_PORT` and `OBS_PASSWORD`.
    ///
    /// `lookup` resolves a variable name to its value, normally `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            debug!("{} overrides host: {}", ENV_HOST, host);
            self.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| {
                ToggleError::InvalidConfig(format!("{} is not a valid port: '{}'", ENV_PORT, port))
            })?;
            debug!("{} overrides port: {}", ENV_PORT, self.port);
        }

        if let Some(password) = lookup(ENV_PASSWORD) {
            debug!("{} overrides password", ENV_PASSWORD);
            self.password = if password.is_empty() {
                None
            } else {
                Some(password)
            };
        }

        Ok(())
    }

    /// Validate configuration for correctness and consistency.
    ///
    /// Only problems that stop every invocation are errors. A group that
    /// cannot be acted upon is reported and left alone, so the other groups
    /// stay usable.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(invalid("host cannot be empty"));
        }

        let Some(first) = self.groups.first() else {
            return Err(invalid("At least one group must be defined"));
        };
        if first.name.is_empty() {
            return Err(invalid("The first group is the default and needs a name"));
        }

        let mut seen = HashSet::new();
        for (idx, group) in self.groups.iter().enumerate() {
            if group.name.is_empty() {
                warn!("Group {} has no name and can never be selected", idx);
                continue;
            }

            if !seen.insert(group.name.as_str()) {
                warn!(
                    "Group '{}' is defined more than once; every definition will be applied in order",
                    group.name
                );
            }

            if let Some(reason) = group.inactive_reason() {
                warn!("Group '{}' will be ignored: {}", group.name, reason);
            }
        }

        Ok(())
    }

    /// Name of the group used when none is given on the command line
    pub fn default_group_name(&self) -> Option<&str> {
        self.groups.first().map(|g| g.name.as_str())
    }

    /// All groups with the given name, in configuration order
    pub fn groups_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GroupConfig> + 'a {
        self.groups.iter().filter(move |g| g.name == name)
    }
}

fn invalid(message: impl Into<String>) -> ToggleError {
    ToggleError::InvalidConfig(message.into())
}

// Default value functions
fn default_obs_host() -> String { "localhost".to_string() }
fn default_obs_port() -> u16 { 4455 }

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = r#"
host: 192.168.1.20
port: 4460
password: secret
groups:
  - name: cams
    type: scene
    scenes: [Wide, Close, Screen]
  - name: guest
    type: source
    scenes: [Interview]
    sources: [Guest Cam, Host Cam]
"#;

    fn parse(yaml: &str) -> Result<ToggleConfig> {
        ToggleConfig::parse(yaml, Path::new("config.yaml"))
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(SAMPLE).unwrap();

        assert_eq!(config.host, "192.168.1.20");
        assert_eq!(config.port, 4460);
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[0].kind, GroupKind::Scene);
        assert_eq!(config.groups[0].scenes, vec!["Wide", "Close", "Screen"]);
        assert!(config.groups[0].sources.is_empty());
        assert_eq!(config.groups[1].kind, GroupKind::Source);
        assert_eq!(config.groups[1].sources[0], "Guest Cam");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse("groups:\n  - name: a\n    type: scene\n    scenes: [One]\n").unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 4455);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_empty_password_means_none() {
        let config = parse("password: ''\ngroups: []\n").unwrap();
        assert!(config.password.is_none());
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let config = parse("groups:\n  - name: odd\n    type: filter\n    scenes: [One]\n").unwrap();

        assert_eq!(config.groups[0].kind, GroupKind::Unknown);
        config.validate().unwrap();
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse("groups: [name: {").unwrap_err();
        assert!(matches!(err, ToggleError::ConfigParse { .. }));
    }

    #[test]
    fn test_validate_rejects_missing_groups() {
        let err = parse("host: localhost\n").unwrap().validate().unwrap_err();
        assert!(matches!(err, ToggleError::InvalidConfig(_)));
    }

    #[test]
    fn test_incomplete_group_does_not_block_others() {
        let yaml = "groups:\n  - {name: cams, type: scene, scenes: [A, B]}\n  - {name: wip, type: source, scenes: [S]}\n";
        let config = parse(yaml).unwrap();

        config.validate().unwrap();
        assert_eq!(config.groups[0].inactive_reason(), None);
        assert_eq!(
            config.groups[1].inactive_reason(),
            Some("source group lists no sources")
        );
    }

    #[test]
    fn test_empty_scene_list_is_inactive_not_invalid() {
        let config = parse("groups:\n  - name: a\n    type: scene\n    scenes: []\n").unwrap();

        config.validate().unwrap();
        assert!(config.groups[0].inactive_reason().is_some());
    }

    #[test]
    fn test_unnamed_later_group_is_tolerated() {
        let yaml = "groups:\n  - {name: cams, type: scene, scenes: [A]}\n  - {name: '', type: scene, scenes: [B]}\n";
        parse(yaml).unwrap().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_unnamed_default_group() {
        let yaml = "groups:\n  - {name: '', type: scene, scenes: [A]}\n  - {name: cams, type: scene, scenes: [B]}\n";
        let err = parse(yaml).unwrap().validate().unwrap_err();

        assert!(matches!(err, ToggleError::InvalidConfig(_)));
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let yaml = "groups:\n  - {name: a, type: scene, scenes: [X]}\n  - {name: a, type: scene, scenes: [Y]}\n";
        let config = parse(yaml).unwrap();

        config.validate().unwrap();
        assert_eq!(config.groups_named("a").count(), 2);
    }

    #[test]
    fn test_default_group_is_first() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.default_group_name(), Some("cams"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let mut config = parse(SAMPLE).unwrap();
        let env: HashMap<&str, &str> = [(ENV_HOST, "studio.local"), (ENV_PORT, " 4471 "), (ENV_PASSWORD, "")]
            .into_iter()
            .collect();

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.host, "studio.local");
        assert_eq!(config.port, 4471);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_override_rejects_bad_port() {
        let mut config = parse(SAMPLE).unwrap();
        let err = config
            .apply_overrides(|key| (key == ENV_PORT).then(|| "not-a-port".to_string()))
            .unwrap_err();

        assert!(matches!(err, ToggleError::InvalidConfig(_)));
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let mut config = parse(SAMPLE).unwrap();
        config.apply_overrides(no_env).unwrap();

        assert_eq!(config.host, "192.168.1.20");
        assert_eq!(config.port, 4460);
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        std::env::remove_var(ENV_HOST);
        std::env::remove_var(ENV_PASSWORD);
        std::env::set_var(ENV_PORT, "4999");
        let result = ToggleConfig::load(file.path()).await;
        std::env::remove_var(ENV_PORT);

        let config = result.unwrap();
        assert_eq!(config.port, 4999);
        assert_eq!(config.host, "192.168.1.20");
    }

    #[tokio::test]
    #[serial]
    async fn test_load_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToggleConfig::load(&dir.path().join("config.yaml"))
            .await
            .unwrap_err();

        assert!(matches!(err, ToggleError::ConfigLoad { .. }));
    }
}
