//! Colour themes for the rating card
//!
//! Provides:
//! - Theme struct with every colour the cards use
//! - Built-in presets (amber, nord, gruvbox, catppuccin)
//! - Hex colour parsing
//! - 256-colour fallback
//! - Blending, used to fade cards in and out

use ratatui::style::Color;
use thiserror::Error;

/// Theme colours for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Page background behind the card
    pub background: Color,
    /// Card gradient, top row
    pub card_top: Color,
    /// Card gradient, bottom row
    pub card_bottom: Color,
    /// Badge, button and pill fill
    pub surface: Color,
    /// Primary text
    pub foreground: Color,
    /// Secondary text and idle button labels
    pub dimmed: Color,
    /// Selected rating, submit button, confirmation text
    pub accent: Color,
    /// Text drawn on top of the accent or hover fill
    pub on_accent: Color,
    /// Fill of a control under the pointer
    pub hover: Color,
    /// Focus ring around the control holding keyboard focus
    pub focus: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::amber()
    }
}

impl Theme {
    /// Amber on slate - the default look
    pub fn amber() -> Self {
        Self {
            background: Color::Rgb(0, 0, 0),          // #000000
            card_top: Color::Rgb(35, 42, 52),         // #232a34
            card_bottom: Color::Rgb(24, 30, 39),      // #181e27
            surface: Color::Rgb(38, 46, 56),          // #262e38
            foreground: Color::Rgb(255, 255, 255),    // #ffffff
            dimmed: Color::Rgb(156, 163, 175),        // #9ca3af (gray-400)
            accent: Color::Rgb(217, 119, 6),          // #d97706 (amber-600)
            on_accent: Color::Rgb(3, 7, 18),          // #030712 (gray-950)
            hover: Color::Rgb(255, 255, 255),         // #ffffff
            focus: Color::Rgb(255, 251, 235),         // #fffbeb (amber-50)
        }
    }

    /// Catppuccin Mocha theme
    pub fn catppuccin_mocha() -> Self {
        Self {
            background: Color::Rgb(17, 17, 27),       // #11111b (crust)
            card_top: Color::Rgb(49, 50, 68),         // #313244 (surface0)
            card_bottom: Color::Rgb(30, 30, 46),      // #1e1e2e (base)
            surface: Color::Rgb(69, 71, 90),          // #45475a (surface1)
            foreground: Color::Rgb(205, 214, 244),    // #cdd6f4 (text)
            dimmed: Color::Rgb(166, 173, 200),        // #a6adc8 (subtext0)
            accent: Color::Rgb(250, 179, 135),        // #fab387 (peach)
            on_accent: Color::Rgb(17, 17, 27),        // #11111b (crust)
            hover: Color::Rgb(205, 214, 244),         // #cdd6f4 (text)
            focus: Color::Rgb(245, 224, 220),         // #f5e0dc (rosewater)
        }
    }

    /// Nord theme
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(36, 41, 51),       // #242933
            card_top: Color::Rgb(59, 66, 82),         // #3b4252 (nord1)
            card_bottom: Color::Rgb(46, 52, 64),      // #2e3440 (nord0)
            surface: Color::Rgb(67, 76, 94),          // #434c5e (nord2)
            foreground: Color::Rgb(236, 239, 244),    // #eceff4 (nord6)
            dimmed: Color::Rgb(216, 222, 233),        // #d8dee9 (nord4)
            accent: Color::Rgb(136, 192, 208),        // #88c0d0 (nord8)
            on_accent: Color::Rgb(46, 52, 64),        // #2e3440 (nord0)
            hover: Color::Rgb(236, 239, 244),         // #eceff4 (nord6)
            focus: Color::Rgb(235, 203, 139),         // #ebcb8b (nord13)
        }
    }

    /// Gruvbox dark theme
    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(29, 32, 33),       // #1d2021 (bg0_h)
            card_top: Color::Rgb(60, 56, 54),         // #3c3836 (bg1)
            card_bottom: Color::Rgb(40, 40, 40),      // #282828 (bg)
            surface: Color::Rgb(80, 73, 69),          // #504945 (bg2)
            foreground: Color::Rgb(235, 219, 178),    // #ebdbb2 (fg)
            dimmed: Color::Rgb(168, 153, 132),        // #a89984 (gray)
            accent: Color::Rgb(254, 128, 25),         // #fe8019 (orange)
            on_accent: Color::Rgb(29, 32, 33),        // #1d2021
            hover: Color::Rgb(235, 219, 178),         // #ebdbb2 (fg)
            focus: Color::Rgb(250, 189, 47),          // #fabd2f (bright yellow)
        }
    }

    /// Load theme from preset name
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "amber" | "default" => Some(Self::amber()),
            "catppuccin-mocha" | "catppuccin_mocha" | "catppuccin" => Some(Self::catppuccin_mocha()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" | "gruvbox_dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }

    /// Card fill for row `row` of a card `height` rows tall
    pub fn card_gradient(&self, row: u16, height: u16) -> Color {
        if height <= 1 {
            return self.card_top;
        }
        let t = f64::from(row) / f64::from(height - 1);
        blend(self.card_top, self.card_bottom, t)
    }

    /// Convert to 256-color approximation for limited terminals
    pub fn to_256_color(&self) -> Self {
        Self {
            background: approximate_256(self.background),
            card_top: approximate_256(self.card_top),
            card_bottom: approximate_256(self.card_bottom),
            surface: approximate_256(self.surface),
            foreground: approximate_256(self.foreground),
            dimmed: approximate_256(self.dimmed),
            accent: approximate_256(self.accent),
            on_accent: approximate_256(self.on_accent),
            hover: approximate_256(self.hover),
            focus: approximate_256(self.focus),
        }
    }
}

/// Mix `from` toward `to` by `t` (0.0 keeps `from`, 1.0 gives `to`).
///
/// Only RGB colours can be mixed; anything else snaps at the halfway point.
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

/// Parse hex color string to Color
/// Supports: #rrggbb, #rgb, rrggbb, rgb
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or(ColorError::InvalidHex)
    };

    match s.len() {
        // #rgb -> #rrggbb
        3 => Ok(Color::Rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        // #rrggbb, or #rrggbbaa with alpha ignored
        6 | 8 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}

/// Color parsing error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("invalid color length (expected 3, 6, or 8 hex chars)")]
    InvalidLength,
    #[error("invalid hex character")]
    InvalidHex,
}

/// Approximate RGB color to nearest 256-color palette entry
fn approximate_256(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            // 6x6x6 color cube starts at index 16
            // Each axis: 0, 95, 135, 175, 215, 255 -> indices 0-5
            let r_idx = if r < 48 { 0 } else { (r - 35) / 40 };
            let g_idx = if g < 48 { 0 } else { (g - 35) / 40 };
            let b_idx = if b < 48 { 0 } else { (b - 35) / 40 };
            let idx = 16 + 36 * r_idx + 6 * g_idx + b_idx;
            Color::Indexed(idx)
        }
        c => c,
    }
}

/// Serde deserializer for hex colors
pub mod serde_color {
    use super::*;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            Some(s) => parse_hex_color(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
