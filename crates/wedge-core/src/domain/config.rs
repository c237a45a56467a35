//! Framing and routing settings of a reader.
//!
//! Loaded from the `[reader]` table of the application config file:
//!
//! ```toml
//! [reader]
//! prefix = "F12"
//! suffix = "Enter"
//! notify_only_active_event = true
//! ```
//!
//! Every field has a serde default, so an empty table is a valid config.

use serde::{Deserialize, Serialize};

use crate::keymap::Key;

/// Framing and routing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Key the scanner emits before the payload.  `None` until learned when
    /// prefix discovery is running.
    #[serde(default = "default_prefix", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Key>,
    /// Key the scanner emits after the payload.
    #[serde(default = "default_suffix")]
    pub suffix: Key,
    /// Deliver to element callbacks only; event subscriptions are skipped.
    #[serde(default)]
    pub notify_callbacks_only: bool,
    /// Deliver to the active event subscription only, not to all of them.
    #[serde(default)]
    pub notify_only_active_event: bool,
    /// Learn the prefix from the first keystroke of the next scan.
    #[serde(default)]
    pub detect_prefix: bool,
}

fn default_prefix() -> Option<Key> {
    Some(Key::F12)
}
fn default_suffix() -> Key {
    Key::Enter
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            suffix: default_suffix(),
            notify_callbacks_only: false,
            notify_only_active_event: false,
            detect_prefix: false,
        }
    }
}
