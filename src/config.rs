use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transition::{Easing, Timing};
use crate::ui::theme::{serde_color, Theme};
use ratatui::style::Color;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub animation: AnimationConfig,
    pub content: ContentConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset name
    pub theme: String,
    /// Force 24-bit colour on or off. Unset means detect from `COLORTERM`.
    pub truecolor: Option<bool>,
    /// Maximum card width in columns
    pub card_width: u16,
    /// Per-colour overrides on top of the preset
    pub colors: ColorOverrides,
}

/// Hex colour overrides, e.g. `accent = "#fc7614"`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    #[serde(deserialize_with = "serde_color::deserialize_option", skip_serializing)]
    pub background: Option<Color>,
    #[serde(deserialize_with = "serde_color::deserialize_option", skip_serializing)]
    pub foreground: Option<Color>,
    #[serde(deserialize_with = "serde_color::deserialize_option", skip_serializing)]
    pub accent: Option<Color>,
    #[serde(deserialize_with = "serde_color::deserialize_option", skip_serializing)]
    pub surface: Option<Color>,
    #[serde(deserialize_with = "serde_color::deserialize_option", skip_serializing)]
    pub dimmed: Option<Color>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Animate card swaps at all
    pub enabled: bool,
    /// Length of one enter or exit motion
    pub duration_ms: u64,
    pub easing: Easing,
    /// Redraw rate while a motion is running
    pub fps: u32,
}

/// Text shown on the two cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub title: String,
    pub description: String,
    pub thanks_title: String,
    pub thanks_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Draw the star and illustration as real images when the terminal can
    pub graphics: bool,
    /// Rasterization size in pixels for the illustration (the star uses a quarter)
    pub size: u32,
    /// Query for graphics support even over SSH (normally skipped)
    pub force_over_ssh: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "amber".to_string(),
            truecolor: None,
            card_width: 52,
            colors: ColorOverrides::default(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 300,
            easing: Easing::EaseOut,
            fps: 60,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            title: "How did we do?".to_string(),
            description: "Please let us know how we did with your support request. \
                All feedback is appreciated to help us improve our offering!"
                .to_string(),
            thanks_title: "Thank you!".to_string(),
            thanks_message: "We appreciate you taking the time to give a rating. \
                If you ever need more support, don't hesitate to get in touch!"
                .to_string(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            graphics: true,
            size: 256,
            force_over_ssh: false,
        }
    }
}

impl AnimationConfig {
    /// Timing handed to the presence engine
    pub fn timing(&self) -> Timing {
        if self.enabled && self.duration_ms > 0 {
            Timing::new(Duration::from_millis(self.duration_ms), self.easing)
        } else {
            Timing::instant()
        }
    }

    /// Delay between redraws while animating
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.clamp(1, 240)))
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/rating-card/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rating-card")
            .join("config.toml")
    }

    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config = Self::parse(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the theme: preset, then overrides, then colour depth fallback
    pub fn resolve_theme(&self) -> Theme {
        let appearance = &self.appearance;
        let mut theme = Theme::from_preset(&appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", appearance.theme);
            Theme::default()
        });

        let colors = &appearance.colors;
        if let Some(c) = colors.background {
            theme.background = c;
        }
        if let Some(c) = colors.foreground {
            theme.foreground = c;
        }
        if let Some(c) = colors.accent {
            theme.accent = c;
        }
        if let Some(c) = colors.surface {
            theme.surface = c;
        }
        if let Some(c) = colors.dimmed {
            theme.dimmed = c;
        }

        let truecolor = appearance.truecolor.unwrap_or_else(detect_truecolor);
        if truecolor {
            theme
        } else {
            tracing::debug!("Terminal lacks truecolor, approximating theme with 256 colours");
            theme.to_256_color()
        }
    }
}

fn detect_truecolor() -> bool {
    std::env::var("COLORTERM")
        .map(|v| matches!(v.to_lowercase().as_str(), "truecolor" | "24bit"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.appearance.theme, "amber");
        assert!(config.animation.enabled);
        assert_eq!(config.animation.duration_ms, 300);
        assert_eq!(config.content.title, "How did we do?");
        assert!(config.assets.graphics);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r##"
            [appearance]
            theme = "nord"
            truecolor = true

            [appearance.colors]
            accent = "#ff0000"

            [animation]
            duration_ms = 120
            easing = "cubic-out"

            [content]
            title = "Rate us"
            "##,
        )
        .unwrap();

        assert_eq!(config.appearance.theme, "nord");
        assert_eq!(config.appearance.card_width, 52);
        assert_eq!(config.animation.duration_ms, 120);
        assert_eq!(config.animation.easing, Easing::CubicOut);
        assert_eq!(config.content.title, "Rate us");
        assert_eq!(config.content.thanks_title, "Thank you!");

        let theme = config.resolve_theme();
        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.background, Theme::nord().background);
    }

    #[test]
    fn test_bad_color_is_error() {
        let err = Config::parse("[appearance.colors]\naccent = \"#zz\"").unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let mut config = Config::default();
        config.appearance.theme = "does-not-exist".to_string();
        config.appearance.truecolor = Some(true);
        assert_eq!(config.resolve_theme().accent, Theme::default().accent);
    }

    #[test]
    fn test_no_truecolor_approximates() {
        let mut config = Config::default();
        config.appearance.truecolor = Some(false);
        assert!(matches!(config.resolve_theme().accent, Color::Indexed(_)));
    }

    #[test]
    fn test_disabled_animation_is_instant() {
        let mut config = AnimationConfig::default();
        assert_eq!(config.timing().duration, Duration::from_millis(300));
        config.enabled = false;
        assert!(config.timing().duration.is_zero());
    }

    #[test]
    fn test_frame_interval() {
        let config = AnimationConfig::default();
        assert_eq!(config.frame_interval().as_micros(), 16_666);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/rating-card/config.toml").unwrap();
        assert_eq!(config.appearance.card_width, 52);
    }
}
