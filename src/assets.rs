//! Image assets: the star badge and the thank-you illustration.
//!
//! Both ship embedded as SVG and are rasterized with resvg. When the terminal
//! speaks a graphics protocol they are shown as real images:
//! - Kitty graphics protocol (kitty terminal)
//! - Sixel graphics (foot, mlterm, xterm)
//! - iTerm2 protocol (iTerm2, WezTerm)
//!
//! Otherwise the cards draw their text stand-ins.

use image::{DynamicImage, Rgba, RgbaImage};
use parking_lot::Mutex;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AssetsConfig;

const STAR_SVG: &[u8] = include_bytes!("../assets/icon-star.svg");
const ILLUSTRATION_SVG: &[u8] = include_bytes!("../assets/illustration-thank-you.svg");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Star,
    Illustration,
}

impl Asset {
    pub const ALL: [Asset; 2] = [Asset::Star, Asset::Illustration];

    fn svg(self) -> &'static [u8] {
        match self {
            Self::Star => STAR_SVG,
            Self::Illustration => ILLUSTRATION_SVG,
        }
    }

    /// Target raster width for a configured base size
    fn pixel_width(self, size: u32) -> u32 {
        match self {
            Self::Star => (size / 4).max(8),
            Self::Illustration => size.max(16),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to parse svg: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
}

/// Render an embedded SVG to an RGBA image `width_px` pixels wide
pub fn rasterize(asset: Asset, width_px: u32) -> Result<DynamicImage, AssetError> {
    let tree = usvg::Tree::from_data(asset.svg(), &usvg::Options::default())?;
    let size = tree.size();
    let scale = width_px as f32 / size.width();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(AssetError::Canvas { width, height })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha, image wants straight alpha
    let mut rgba = RgbaImage::new(width, height);
    for (dst, src) in rgba.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Asset manager - owns the graphics picker and the ready-to-draw protocols
/// Must be created before entering raw mode
pub struct AssetManager {
    /// The picker determines the graphics protocol and font size
    picker: Option<Picker>,
    /// Loaded image protocols
    cache: HashMap<Asset, Arc<Mutex<StatefulProtocol>>>,
    /// Base raster size in pixels
    size: u32,
}

impl AssetManager {
    /// Query the terminal for graphics support, unless configured off or
    /// running over SSH
    pub fn new(config: &AssetsConfig) -> Self {
        let picker = if !config.graphics {
            tracing::debug!("Graphics disabled by config");
            None
        } else if is_ssh() && !config.force_over_ssh {
            tracing::debug!("SSH session detected, skipping graphics query");
            None
        } else {
            match Picker::from_query_stdio() {
                Ok(p) => {
                    tracing::info!("Graphics protocol detected: {:?}", p.protocol_type());
                    Some(p)
                }
                Err(e) => {
                    tracing::debug!("No graphics protocol available: {}", e);
                    None
                }
            }
        };

        Self {
            picker,
            cache: HashMap::new(),
            size: config.size,
        }
    }

    /// Check if images can be drawn at all
    pub fn supports_graphics(&self) -> bool {
        self.picker.is_some()
    }

    /// Rasterize and encode every asset. Slow; run off the UI task.
    pub fn preload(&mut self) {
        for asset in Asset::ALL {
            self.load(asset);
        }
    }

    fn load(&mut self, asset: Asset) -> Option<Arc<Mutex<StatefulProtocol>>> {
        if let Some(cached) = self.cache.get(&asset) {
            return Some(cached.clone());
        }

        let picker = self.picker.as_mut()?;
        let image = match rasterize(asset, asset.pixel_width(self.size)) {
            Ok(img) => img,
            Err(e) => {
                tracing::debug!("Failed to rasterize {:?}: {}", asset, e);
                return None;
            }
        };

        let protocol = Arc::new(Mutex::new(picker.new_resize_protocol(image)));
        self.cache.insert(asset, protocol.clone());
        Some(protocol)
    }

    /// Get a loaded protocol without doing any work
    pub fn get_cached(&self, asset: Asset) -> Option<Arc<Mutex<StatefulProtocol>>> {
        self.cache.get(&asset).cloned()
    }
}

fn is_ssh() -> bool {
    std::env::var_os("SSH_CONNECTION").is_some() || std::env::var_os("SSH_TTY").is_some()
}
