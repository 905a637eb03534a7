//! Configuration file location.
//!
//! The config lives next to the executable so the tool can be launched from
//! a hotkey daemon or a stream deck without a working directory. Lookup order:
//!
//! 1. An explicit path (`--config` / `OBS_TOGGLE_CONFIG`).
//! 2. **Debug builds only**: `config.yaml` in the current working directory,
//!    so `cargo run` picks up the project's file.
//! 3. The executable's directory. When the executable sits inside a macOS
//!    bundle (`Foo.app/Contents/MacOS`), the directory holding the bundle is
//!    used instead.
//! 4. `<user config dir>/obs-toggle/config.yaml`, if that file exists.
//!
//! When nothing exists, the path from step 3 is returned so error messages
//! point at where the file is expected.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory name under the per-user config dir
const APP_DIR_NAME: &str = "obs-toggle";

/// Marker of an executable living inside a macOS application bundle
const APP_BUNDLE_MARKER: &str = ".app/Contents/MacOS";

/// Resolve the configuration file path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        debug!("Using explicit config path: {}", path.display());
        return path.to_path_buf();
    }

    // In debug builds, prefer config.yaml in the current working directory
    #[cfg(debug_assertions)]
    {
        let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
        if cwd_config.exists() {
            debug!("Using config from working directory (debug build)");
            return cwd_config;
        }
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let beside_exe = config_dir_for_exe(&exe_dir).join(CONFIG_FILE_NAME);
    if beside_exe.exists() {
        return beside_exe;
    }

    if let Some(user_config) = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)) {
        if user_config.exists() {
            debug!("Using per-user config: {}", user_config.display());
            return user_config;
        }
    }

    beside_exe
}

/// Directory expected to hold the config for an executable in `exe_dir`.
///
/// For `/Applications/Tools/OBS Toggle.app/Contents/MacOS` this is
/// `/Applications/Tools`.
pub fn config_dir_for_exe(exe_dir: &Path) -> PathBuf {
    if exe_dir.to_string_lossy().contains(APP_BUNDLE_MARKER) {
        // MacOS -> Contents -> Foo.app -> parent
        if let Some(outside) = exe_dir.ancestors().nth(3) {
            return outside.to_path_buf();
        }
    }
    exe_dir.to_path_buf()
}
