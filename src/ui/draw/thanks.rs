//! Thank-you card shown after submission

use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

use super::{put_lines, render_image, settled_image};
use crate::app::App;
use crate::assets::{Asset, AssetManager};
use crate::state::CardKey;
use crate::transition::PresenceFrame;
use crate::ui::card::CardWrapper;
use crate::ui::layout::{ThanksLayout, ILLUSTRATION};
use crate::ui::theme::Theme;

pub(crate) fn draw_thanks(
    f: &mut Frame,
    app: &App,
    area: Rect,
    frame: &PresenceFrame<CardKey>,
    assets: Option<&Arc<Mutex<AssetManager>>>,
    theme: &Theme,
) {
    let content = &app.config().content;
    let layout = ThanksLayout::compute(area, app.config().appearance.card_width, content);
    let illustration = settled_image(frame, assets, Asset::Illustration);

    let wrapper = CardWrapper::new(frame.appearance, theme);
    let mut canvas = wrapper.canvas(layout.card);

    if illustration.is_none() {
        draw_illustration(&mut canvas, layout.illustration, theme);
    }

    if let Some(rating) = app.selected_rating() {
        draw_pill(&mut canvas, layout.pill, &rating.summary(), theme);
    }

    put_lines(
        &mut canvas,
        layout.title,
        &[content.thanks_title.as_str()],
        Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD),
        true,
    );
    put_lines(
        &mut canvas,
        layout.message,
        &layout.message_lines,
        Style::default().fg(theme.dimmed),
        true,
    );

    wrapper.composite(&canvas, f.buffer_mut());

    if let Some(illustration) = illustration {
        render_image(f, layout.illustration, &illustration);
    }
}

/// Text art: outline dimmed, the check and receipt lines in the accent
fn draw_illustration(buf: &mut Buffer, area: Rect, theme: &Theme) {
    let art_width = ILLUSTRATION[0].width() as u16;
    let x0 = area.x + area.width.saturating_sub(art_width) / 2;

    for (line, y) in ILLUSTRATION.iter().zip(area.y..area.y + area.height) {
        let mut x = x0;
        for ch in line.chars() {
            if x >= area.x + area.width {
                break;
            }
            let fg = match ch {
                '✓' | '▂' => theme.accent,
                _ => theme.dimmed,
            };
            let mut tmp = [0u8; 4];
            buf.set_string(x, y, ch.encode_utf8(&mut tmp), Style::default().fg(fg));
            x += 1;
        }
    }
}

/// Rounded-looking label on the surface colour, centered in its row
fn draw_pill(buf: &mut Buffer, area: Rect, text: &str, theme: &Theme) {
    if area.is_empty() {
        return;
    }
    let label = format!(" {text} ");
    let width = (label.width() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_stringn(
        x,
        area.y,
        &label,
        width as usize,
        Style::default().fg(theme.accent).bg(theme.surface),
    );
}
