//! Toolkit configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) gives the stock behaviour.
//!
//! ```toml
//! default_frame_rate = 60
//! resize_poll_interval_ms = 20
//!
//! [menu]
//! use_auto_print = false
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Frame rate value meaning "use the manager's default".
pub const DEFAULT_FRAME_RATE: i32 = -1;

/// Lowest frame rate the auto-print thread will run at.
pub const MINIMUM_FRAME_RATE: i32 = 1;

/// Manager default when a menu asks for `DEFAULT_FRAME_RATE`.
pub const STOCK_FRAME_RATE: i32 = 30;

// =============================================================================
// MENU OPTIONS
// =============================================================================

/// Per-menu display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    /// Paint the menu once when it is entered.
    pub print_on_enter: bool,
    /// Paint the root container in transparent mode.
    pub background_transparent: bool,
    /// Paint through the write buffer instead of immediate writes.
    pub use_buffering: bool,
    /// Let the manager's background thread repaint this menu.
    pub use_auto_print: bool,
    /// Auto-print rate in frames per second, or `DEFAULT_FRAME_RATE`.
    pub frame_rate: i32,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            print_on_enter: true,
            background_transparent: false,
            use_buffering: true,
            use_auto_print: true,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

// =============================================================================
// TOOLKIT CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Rate used for menus that ask for `DEFAULT_FRAME_RATE`.
    pub default_frame_rate: i32,
    /// Floor applied to every requested rate.
    pub minimum_frame_rate: i32,
    /// How often the resize watcher samples the window size.
    pub resize_poll_interval_ms: u64,
    /// Options given to newly created menus.
    pub menu: MenuOptions,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            default_frame_rate: STOCK_FRAME_RATE,
            minimum_frame_rate: MINIMUM_FRAME_RATE,
            resize_poll_interval_ms: 10,
            menu: MenuOptions::default(),
        }
    }
}

impl ToolkitConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ToolkitConfig = toml::from_str(contents)?;
        Ok(config.normalized())
    }

    /// Load from disk. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn resize_poll_interval(&self) -> Duration {
        Duration::from_millis(self.resize_poll_interval_ms.max(1))
    }

    /// Clamp nonsensical values instead of rejecting the file.
    fn normalized(mut self) -> Self {
        self.minimum_frame_rate = self.minimum_frame_rate.max(MINIMUM_FRAME_RATE);
        self.default_frame_rate = self.default_frame_rate.max(self.minimum_frame_rate);
        self
    }
}
