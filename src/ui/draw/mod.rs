//! Drawing functions for the TUI
//!
//! One card is on screen at a time, picked by the presence engine:
//! - `form` - the rating form (star badge, copy, five buttons, submit)
//! - `thanks` - the confirmation card

mod form;
mod thanks;

use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Block, Paragraph},
    Frame,
};
use ratatui_image::{Resize, StatefulImage};
use std::sync::Arc;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::assets::{Asset, AssetManager};
use crate::state::{CardKey, ViewState};
use crate::transition::{Phase, PresenceFrame};
use crate::ui::layout::HitMap;
use crate::ui::theme::Theme;

use form::draw_form;
use thanks::draw_thanks;

/// Main draw function
pub fn draw(
    f: &mut Frame,
    app: &mut App,
    assets: Option<&Arc<Mutex<AssetManager>>>,
    now: Instant,
) {
    let theme = app.theme().clone();
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let [body, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let hit_map = match app.presence_frame(now) {
        Some(frame) => match frame.key {
            CardKey::Form => draw_form(f, app, body, &frame, assets, &theme),
            CardKey::ThankYou => {
                draw_thanks(f, app, body, &frame, assets, &theme);
                HitMap::default()
            }
        },
        None => HitMap::default(),
    };
    app.set_hit_map(hit_map);

    draw_status_bar(f, app, status, &theme);
}

/// Draw the key hints
fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let status = match app.view() {
        ViewState::Submitted { .. } => " q: quit".to_string(),
        ViewState::Collecting { rating } => {
            let selected = rating.map_or_else(|| "-".to_string(), |r| r.to_string());
            format!(
                " {}/5 | 1-5: rate | ←→: move | Tab: focus | Space: press | Enter: submit | q: quit",
                selected
            )
        }
    };

    let status_bar =
        Paragraph::new(status).style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}

/// Loaded image for `asset`, only while the card is settled on screen.
/// Images cannot be scaled or faded, so moving cards use their text stand-ins.
/// Never waits on the manager: while a preload holds it, the stand-ins stay.
fn settled_image(
    frame: &PresenceFrame<CardKey>,
    assets: Option<&Arc<Mutex<AssetManager>>>,
    asset: Asset,
) -> Option<Arc<Mutex<ratatui_image::protocol::StatefulProtocol>>> {
    if frame.phase != Phase::Visible {
        return None;
    }
    assets.and_then(|mgr| mgr.try_lock()?.get_cached(asset))
}

fn render_image(
    f: &mut Frame,
    area: Rect,
    protocol: &Arc<Mutex<ratatui_image::protocol::StatefulProtocol>>,
) {
    if area.is_empty() {
        return;
    }
    let image = StatefulImage::new(None).resize(Resize::Fit(None));
    let mut proto = protocol.lock();
    f.render_stateful_widget(image, area, &mut *proto);
}

/// Write lines top to bottom inside `area`, optionally centered. Keeps the
/// background already in the buffer.
fn put_lines<S: AsRef<str>>(buf: &mut Buffer, area: Rect, lines: &[S], style: Style, centered: bool) {
    for (line, y) in lines.iter().zip(area.y..area.y + area.height) {
        let line = line.as_ref();
        let x = if centered {
            area.x + area.width.saturating_sub(line.width() as u16) / 2
        } else {
            area.x
        };
        buf.set_stringn(x, y, line, area.width as usize, style);
    }
}
