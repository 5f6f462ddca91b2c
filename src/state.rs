//! Which card is showing and what the user has chosen so far.
//!
//! ```text
//!   Collecting { rating: None }
//!        │ select(v)
//!        ▼
//!   Collecting { rating: Some(v) } ──select(w)──▶ Collecting { rating: Some(w) }
//!        │ submit()
//!        ▼
//!   Submitted { rating: v }      (terminal for the session)
//! ```

use crate::rating::Rating;

/// View state of the feedback card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// The form is shown, waiting for a rating and a submit
    Collecting { rating: Option<Rating> },
    /// Confirmation is shown. Nothing leads back to the form.
    Submitted { rating: Rating },
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Collecting { rating: None }
    }
}

/// Stable identity of each card, used by the presence engine to tell the two
/// views apart instead of morphing one into the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKey {
    Form = 1,
    ThankYou = 2,
}

impl ViewState {
    /// Replace the current rating. Last write wins; ignored once submitted.
    /// Returns true if the state changed.
    pub fn select(&mut self, value: Rating) -> bool {
        match self {
            Self::Collecting { rating } if *rating != Some(value) => {
                *rating = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Move to `Submitted` if a rating is held. Any other state is left as is.
    /// Returns true if the transition happened.
    pub fn submit(&mut self) -> bool {
        match *self {
            Self::Collecting {
                rating: Some(rating),
            } => {
                *self = Self::Submitted { rating };
                true
            }
            _ => false,
        }
    }

    /// The current rating, whether still being chosen or already submitted
    pub fn rating(&self) -> Option<Rating> {
        match *self {
            Self::Collecting { rating } => rating,
            Self::Submitted { rating } => Some(rating),
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// Card that should be mounted for this state
    pub fn card(&self) -> CardKey {
        match self {
            Self::Collecting { .. } => CardKey::Form,
            Self::Submitted { .. } => CardKey::ThankYou,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(v: u8) -> Rating {
        Rating::try_from(v).unwrap()
    }

    #[test]
    fn test_default_is_empty_form() {
        let state = ViewState::default();
        assert_eq!(state, ViewState::Collecting { rating: None });
        assert_eq!(state.card(), CardKey::Form);
        assert_eq!(state.rating(), None);
    }

    #[test]
    fn test_submit_without_rating_is_noop() {
        let mut state = ViewState::default();
        assert!(!state.submit());
        assert_eq!(state, ViewState::Collecting { rating: None });
    }

    #[test]
    fn test_submit_with_rating() {
        for v in 1..=5 {
            let mut state = ViewState::default();
            state.select(r(v));
            assert!(state.submit());
            assert_eq!(state, ViewState::Submitted { rating: r(v) });
            assert_eq!(state.card(), CardKey::ThankYou);
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut state = ViewState::default();
        assert!(state.select(r(3)));
        assert!(state.select(r(5)));
        assert_eq!(state.rating(), Some(r(5)));
        state.submit();
        assert_eq!(state.rating(), Some(r(5)));
    }

    #[test]
    fn test_reselect_same_value_reports_no_change() {
        let mut state = ViewState::default();
        assert!(state.select(r(2)));
        assert!(!state.select(r(2)));
    }

    #[test]
    fn test_submitted_is_terminal() {
        let mut state = ViewState::default();
        state.select(r(4));
        state.submit();

        assert!(!state.select(r(1)));
        assert!(!state.submit());
        assert_eq!(state, ViewState::Submitted { rating: r(4) });
    }

    #[test]
    fn test_card_keys_are_distinct() {
        assert_eq!(CardKey::Form as u8, 1);
        assert_eq!(CardKey::ThankYou as u8, 2);
    }
}
