use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::config::Config;
use crate::rating::Rating;
use crate::state::{CardKey, ViewState};
use crate::transition::{Presence, PresenceFrame};
use crate::ui::layout::HitMap;
use crate::ui::theme::Theme;

/// A control on the form that can hold focus or sit under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Rating(Rating),
    Submit,
}

/// User intent, already decoded from raw terminal input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick a rating directly (digit keys)
    Select(Rating),
    /// Tab
    FocusNext,
    /// Shift+Tab
    FocusPrev,
    /// Arrow right/down inside the rating group
    MoveNext,
    /// Arrow left/up inside the rating group
    MovePrev,
    /// Press the focused control
    Activate,
    /// Implicit form submission
    Submit,
    /// Left click at a cell
    Click { column: u16, row: u16 },
    /// Pointer moved to a cell
    Hover { column: u16, row: u16 },
    Quit,
}

/// Final state of the session, reported on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub submitted: bool,
    pub rating: Option<Rating>,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rating {
            Some(rating) if self.submitted => f.write_str(&rating.summary()),
            _ => write!(f, "No rating submitted"),
        }
    }
}

/// Root controller: owns the view state and everything that decides what
/// the next frame looks like
pub struct App {
    /// Selected rating and submission status
    view: ViewState,
    /// Control holding keyboard focus
    focus: Option<Control>,
    /// Control under the mouse pointer
    hover: Option<Control>,
    /// False until the first frame has been drawn
    has_mounted: bool,
    /// Enter/exit animation between the two cards
    presence: Presence<CardKey>,
    /// Clickable regions from the last frame
    hit_map: HitMap,
    theme: Theme,
    config: Config,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = config.resolve_theme();
        let presence = Presence::new(config.animation.timing());
        Self {
            view: ViewState::default(),
            focus: None,
            hover: None,
            has_mounted: false,
            presence,
            hit_map: HitMap::default(),
            theme,
            config,
            should_quit: false,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn selected_rating(&self) -> Option<Rating> {
        self.view.rating()
    }

    pub fn is_submitted(&self) -> bool {
        self.view.is_submitted()
    }

    /// Whether the button for `value` shows as active
    pub fn is_active(&self, value: Rating) -> bool {
        self.selected_rating() == Some(value)
    }

    pub fn focus(&self) -> Option<Control> {
        self.focus
    }

    pub fn hover(&self) -> Option<Control> {
        self.hover
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn outcome(&self) -> Outcome {
        match self.view {
            ViewState::Submitted { rating } => Outcome {
                submitted: true,
                rating: Some(rating),
            },
            ViewState::Collecting { .. } => Outcome {
                submitted: false,
                rating: None,
            },
        }
    }

    /// Replace the selected rating (last write wins)
    pub fn select(&mut self, value: Rating) {
        if self.is_active(value) {
            return;
        }
        if self.view.select(value) {
            tracing::debug!(rating = value.value(), "Rating selected");
        }
    }

    /// Submit the form. Without a rating this silently does nothing.
    pub fn submit(&mut self) {
        if self.view.submit() {
            tracing::info!(rating = ?self.view.rating().map(Rating::value), "Rating submitted");
            self.focus = None;
            self.hover = None;
            self.hit_map = HitMap::default();
        } else if !self.view.is_submitted() {
            tracing::debug!("Submit ignored, no rating selected");
        }
    }

    /// Apply one user command
    pub fn handle(&mut self, command: Command) {
        if command == Command::Quit {
            self.should_quit = true;
            return;
        }
        if self.view.is_submitted() {
            return;
        }

        match command {
            Command::Select(value) => {
                self.select(value);
                self.focus = Some(Control::Rating(value));
            }
            Command::FocusNext => {
                self.focus = Some(match self.focus {
                    Some(Control::Rating(_)) => Control::Submit,
                    None | Some(Control::Submit) => self.group_entry(),
                });
            }
            Command::FocusPrev => {
                self.focus = Some(match self.focus {
                    None | Some(Control::Rating(_)) => Control::Submit,
                    Some(Control::Submit) => self.group_entry(),
                });
            }
            // The five buttons form a single radio group for arrow keys
            Command::MoveNext => self.move_in_group(Rating::next),
            Command::MovePrev => self.move_in_group(Rating::prev),
            Command::Activate => match self.focus {
                Some(Control::Rating(value)) => self.select(value),
                Some(Control::Submit) => self.submit(),
                None => {}
            },
            Command::Submit => self.submit(),
            Command::Click { column, row } => match self.hit_map.hit(column, row) {
                Some(Control::Rating(value)) => {
                    self.select(value);
                    self.focus = Some(Control::Rating(value));
                }
                Some(Control::Submit) => {
                    self.focus = Some(Control::Submit);
                    self.submit();
                }
                None => {}
            },
            Command::Hover { column, row } => {
                self.hover = self.hit_map.hit(column, row);
            }
            Command::Quit => {}
        }
    }

    /// Where focus lands when entering the rating group
    fn group_entry(&self) -> Control {
        Control::Rating(self.selected_rating().unwrap_or(Rating::ALL[0]))
    }

    /// Arrow keys: radio semantics inside the group, enter it from outside
    fn move_in_group(&mut self, step: fn(Rating) -> Rating) {
        match self.focus {
            Some(Control::Rating(current)) => {
                let next = step(current);
                self.focus = Some(Control::Rating(next));
                self.select(next);
            }
            None | Some(Control::Submit) => self.focus = Some(self.group_entry()),
        }
    }

    /// Bring the presence engine in line with the view state
    pub fn tick(&mut self, now: Instant) {
        self.presence.sync(self.view.card(), self.has_mounted, now);
    }

    /// Record that the first frame is on screen
    pub fn mark_mounted(&mut self) {
        if !self.has_mounted {
            tracing::debug!("First frame drawn");
            self.has_mounted = true;
        }
    }

    pub fn presence_frame(&self, now: Instant) -> Option<PresenceFrame<CardKey>> {
        self.presence.frame(now)
    }

    pub fn is_animating(&self) -> bool {
        self.presence.is_animating()
    }

    /// Update clickable regions after drawing a frame
    pub fn set_hit_map(&mut self, hit_map: HitMap) {
        if self.view.is_submitted() {
            self.hit_map = HitMap::default();
        } else {
            self.hit_map = hit_map;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{Appearance, Phase};
    use crate::ui::layout::FormLayout;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn r(v: u8) -> Rating {
        Rating::try_from(v).unwrap()
    }

    fn app() -> App {
        let mut config = Config::default();
        config.appearance.truecolor = Some(true);
        App::new(config)
    }

    #[test]
    fn test_initial_state() {
        let app = app();
        assert_eq!(app.view(), ViewState::Collecting { rating: None });
        assert!(Rating::ALL.iter().all(|&v| !app.is_active(v)));
        assert_eq!(app.focus(), None);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_select_marks_exactly_one_active() {
        for v in 1..=5 {
            let mut app = app();
            app.handle(Command::Select(r(v)));
            assert_eq!(app.selected_rating(), Some(r(v)));
            for other in Rating::ALL {
                assert_eq!(app.is_active(other), other == r(v));
            }
        }
    }

    #[test]
    fn test_submit_without_rating_stays_on_form() {
        let mut app = app();
        app.handle(Command::Submit);
        assert!(!app.is_submitted());
        app.handle(Command::FocusPrev);
        app.handle(Command::Activate);
        assert!(!app.is_submitted());
    }

    #[test]
    fn test_submit_with_rating() {
        let mut app = app();
        app.handle(Command::Select(r(4)));
        app.handle(Command::Submit);
        assert!(app.is_submitted());
        assert_eq!(app.outcome().to_string(), "You selected 4 out of 5");
    }

    #[test]
    fn test_last_write_wins() {
        let mut app = app();
        app.handle(Command::Select(r(3)));
        app.handle(Command::Select(r(5)));
        assert!(!app.is_active(r(3)));
        assert!(app.is_active(r(5)));
        app.handle(Command::Submit);
        assert_eq!(app.view(), ViewState::Submitted { rating: r(5) });
    }

    #[test]
    fn test_no_way_back_after_submit() {
        let mut app = app();
        app.handle(Command::Select(r(2)));
        app.handle(Command::Submit);

        for command in [
            Command::Select(r(5)),
            Command::FocusNext,
            Command::FocusPrev,
            Command::MoveNext,
            Command::MovePrev,
            Command::Activate,
            Command::Submit,
            Command::Click { column: 0, row: 0 },
            Command::Hover { column: 0, row: 0 },
        ] {
            app.handle(command);
            assert_eq!(app.view(), ViewState::Submitted { rating: r(2) });
        }

        app.handle(Command::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_tab_cycles_group_and_submit() {
        let mut app = app();
        app.handle(Command::FocusNext);
        assert_eq!(app.focus(), Some(Control::Rating(r(1))));
        app.handle(Command::FocusNext);
        assert_eq!(app.focus(), Some(Control::Submit));
        app.handle(Command::FocusNext);
        assert_eq!(app.focus(), Some(Control::Rating(r(1))));

        // Entering the group lands on the selected rating
        app.handle(Command::Select(r(4)));
        app.handle(Command::FocusPrev);
        app.handle(Command::FocusPrev);
        assert_eq!(app.focus(), Some(Control::Rating(r(4))));
    }

    #[test]
    fn test_arrows_move_and_select_with_wrap() {
        let mut app = app();
        // From outside the group: focus only
        app.handle(Command::MoveNext);
        assert_eq!(app.focus(), Some(Control::Rating(r(1))));
        assert_eq!(app.selected_rating(), None);

        app.handle(Command::MovePrev);
        assert_eq!(app.focus(), Some(Control::Rating(r(5))));
        assert_eq!(app.selected_rating(), Some(r(5)));

        app.handle(Command::MoveNext);
        assert_eq!(app.selected_rating(), Some(r(1)));
    }

    #[test]
    fn test_activate_focused_control() {
        let mut app = app();
        app.handle(Command::FocusNext);
        app.handle(Command::Activate);
        assert_eq!(app.selected_rating(), Some(r(1)));

        app.handle(Command::FocusNext);
        app.handle(Command::Activate);
        assert!(app.is_submitted());
        assert_eq!(app.focus(), None);
    }

    #[test]
    fn test_mouse_uses_hit_map() {
        let mut app = app();
        let layout = FormLayout::compute(Rect::new(0, 0, 80, 30), 52, &app.config().content);
        app.set_hit_map(HitMap::for_form(&layout));

        let button = layout.buttons[1];
        app.handle(Command::Hover {
            column: button.x,
            row: button.y,
        });
        assert_eq!(app.hover(), Some(Control::Rating(r(2))));

        app.handle(Command::Click {
            column: button.x,
            row: button.y,
        });
        assert_eq!(app.selected_rating(), Some(r(2)));

        app.handle(Command::Click {
            column: layout.submit.x,
            row: layout.submit.y,
        });
        assert!(app.is_submitted());
        assert_eq!(app.hover(), None);
        assert!(app.hit_map.is_empty());

        // Late frames of the exiting form cannot bring the regions back
        app.set_hit_map(HitMap::for_form(&layout));
        assert!(app.hit_map.is_empty());
    }

    #[test]
    fn test_click_without_hit_map_does_nothing() {
        let mut app = app();
        app.handle(Command::Click { column: 10, row: 10 });
        assert_eq!(app.selected_rating(), None);
    }

    #[test]
    fn test_first_frame_static_then_swap_animates() {
        let mut app = app();
        let start = Instant::now();
        app.tick(start);
        let frame = app.presence_frame(start).unwrap();
        assert_eq!(frame.key, CardKey::Form);
        assert_eq!(frame.appearance, Appearance::SHOWN);
        app.mark_mounted();

        app.handle(Command::Select(r(3)));
        app.handle(Command::Submit);
        app.tick(start);
        let frame = app.presence_frame(start).unwrap();
        assert_eq!(frame.key, CardKey::Form);
        assert_eq!(frame.phase, Phase::Exiting);
        assert!(app.is_animating());

        let later = start + Duration::from_secs(2);
        app.tick(later);
        let frame = app.presence_frame(later).unwrap();
        assert_eq!(frame.key, CardKey::ThankYou);
        assert_eq!(frame.phase, Phase::Visible);
        assert!(!app.is_animating());
    }

    #[test]
    fn test_outcome_json() {
        let mut app = app();
        assert_eq!(
            serde_json::to_string(&app.outcome()).unwrap(),
            r#"{"submitted":false,"rating":null}"#
        );
        assert_eq!(app.outcome().to_string(), "No rating submitted");

        app.handle(Command::Select(r(1)));
        app.handle(Command::Submit);
        assert_eq!(
            serde_json::to_string(&app.outcome()).unwrap(),
            r#"{"submitted":true,"rating":1}"#
        );
    }
}
