//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw/` - Frame composition for the form and thank-you cards
//! - `card.rs` - Card wrapper: surface, scaling and fading
//! - `rating_button.rs` - Rating and submit button widgets
//! - `layout.rs` - Card geometry and hit regions
//! - `theme.rs` - Color themes and presets

mod draw;
pub mod card;
pub mod layout;
pub mod rating_button;
pub mod theme;

// Re-export main draw function
pub use draw::draw;
