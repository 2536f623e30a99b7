// src/config.rs

//! Defines the configuration structures for `waytri`.
//!
//! The program reads no configuration file (there is nothing worth
//! configuring at runtime for a fixed-scene demo), but the settings that do
//! exist — window geometry, colors, the quit keybinding — are grouped here
//! with sensible defaults so they live in one place instead of being
//! scattered as magic constants.

use serde::{Deserialize, Serialize};

use crate::keys::{KeySymbol, Modifiers};

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the demo.
///
/// Groups settings into logical categories. All fields have defaults; the
/// program currently runs on `Config::default()`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// Window-related settings.
    pub window: WindowConfig,
    /// Colors used by the fixed scene.
    pub colors: ColorConfig,
    /// Keybinding configurations.
    pub keybindings: KeybindingsConfig,
}

// --- Window Configuration ---

/// Defines the initial window geometry and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title shown by the compositor's decorations.
    pub title: String,
    /// Application id used for window-manager matching rules.
    pub app_id: String,
    /// Initial window width in pixels. The compositor may override this
    /// through configure events.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "waytri".to_string(),
            app_id: "waytri".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

// --- Color Configuration ---

/// Colors for the fixed scene, as RGBA components in the 0.0..=1.0 range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Color the framebuffer is cleared to every frame.
    pub clear: [f32; 4],
    /// Fill color of the triangle.
    pub fill: [f32; 4],
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            clear: [0.0, 0.0, 0.0, 1.0],
            fill: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

// --- Keybinding Configuration ---

/// Represents a combination of a key and modifiers for keybindings.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct KeyCombination {
    #[serde(default)]
    pub symbol: KeySymbol,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Defines keybindings for the few actions the demo supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    /// Key that terminates the main loop.
    pub quit: KeyCombination,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        KeybindingsConfig {
            quit: KeyCombination {
                symbol: KeySymbol::Char('q'),
                modifiers: Modifiers::empty(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.window.title, "waytri");
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 1080);
        assert_eq!(config.colors.clear, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.colors.fill, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.keybindings.quit.symbol, KeySymbol::Char('q'));
        assert!(config.keybindings.quit.modifiers.is_empty());
    }
}
