//! Form card: star badge, title, description, rating buttons, submit

use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
    Frame,
};
use std::sync::Arc;

use super::{put_lines, render_image, settled_image};
use crate::app::{App, Control};
use crate::assets::{Asset, AssetManager};
use crate::rating::Rating;
use crate::state::CardKey;
use crate::transition::{Phase, PresenceFrame};
use crate::ui::card::CardWrapper;
use crate::ui::layout::{FormLayout, HitMap};
use crate::ui::rating_button::{RatingButton, SubmitButton};
use crate::ui::theme::Theme;

/// Draw the form card. Returns its clickable regions, which only exist
/// once the card has settled at full size.
pub(crate) fn draw_form(
    f: &mut Frame,
    app: &App,
    area: Rect,
    frame: &PresenceFrame<CardKey>,
    assets: Option<&Arc<Mutex<AssetManager>>>,
    theme: &Theme,
) -> HitMap {
    let config = app.config();
    let content = &config.content;
    let layout = FormLayout::compute(area, config.appearance.card_width, content);
    let star = settled_image(frame, assets, Asset::Star);

    let wrapper = CardWrapper::new(frame.appearance, theme);
    let mut canvas = wrapper.canvas(layout.card);

    draw_badge(&mut canvas, layout.badge, theme, star.is_none());

    put_lines(
        &mut canvas,
        layout.title,
        &[content.title.as_str()],
        Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD),
        false,
    );
    put_lines(
        &mut canvas,
        layout.description,
        &layout.description_lines,
        Style::default().fg(theme.dimmed),
        false,
    );

    let selected = app.selected_rating();
    for (&rating, &rect) in Rating::ALL.iter().zip(layout.buttons.iter()) {
        let control = Some(Control::Rating(rating));
        RatingButton::new(rating, selected, theme)
            .focused(app.focus() == control)
            .hovered(app.hover() == control)
            .render(rect, &mut canvas);
    }

    SubmitButton::new(theme)
        .focused(app.focus() == Some(Control::Submit))
        .hovered(app.hover() == Some(Control::Submit))
        .render(layout.submit, &mut canvas);

    wrapper.composite(&canvas, f.buffer_mut());

    if frame.phase != Phase::Visible {
        return HitMap::default();
    }
    if let Some(star) = star {
        render_image(f, inset(layout.badge), &star);
    }
    HitMap::for_form(&layout)
}

/// Round surface badge holding the star
fn draw_badge(buf: &mut Buffer, area: Rect, theme: &Theme, with_glyph: bool) {
    buf.set_style(area, Style::default().bg(theme.surface));
    if with_glyph && area.width > 0 && area.height > 0 {
        let x = area.x + area.width.saturating_sub(1) / 2;
        let y = area.y + area.height.saturating_sub(1) / 2;
        buf.set_string(x, y, "★", Style::default().fg(theme.accent).bg(theme.surface));
    }
}

/// Inner area of the badge, one cell in from the sides
fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}
