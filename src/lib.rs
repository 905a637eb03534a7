//! OBS Toggle
//!
//! Cycle OBS Studio scenes, or reveal a source, from a single command driven
//! by groups defined in a YAML config file.

pub mod config;
pub mod error;
pub mod obs;
pub mod paths;
pub mod toggle;

pub use config::{GroupConfig, GroupKind, ToggleConfig};
pub use error::ToggleError;
pub use obs::{ObsSession, SceneControl};
pub use toggle::{Mutation, ToggleReport};
