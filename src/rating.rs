//! The rating value a user can pick.
//!
//! Ratings form a fixed, closed set: 1 through 5, always presented in that
//! order. There is no configurable range.

use std::fmt;

use thiserror::Error;

/// Highest rating a user can give. Also the denominator in "N out of 5".
pub const MAX_RATING: u8 = 5;

/// A user-chosen satisfaction score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating {0} is out of range (expected 1..=5)")]
    OutOfRange(u8),
}

impl Rating {
    /// Every rating, in display order.
    pub const ALL: [Rating; MAX_RATING as usize] =
        [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)];

    pub fn value(self) -> u8 {
        self.0
    }

    /// Position of this rating within [`Rating::ALL`]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Next rating, wrapping 5 -> 1
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous rating, wrapping 1 -> 5
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Confirmation line shown once this rating is submitted
    pub fn summary(self) -> String {
        format!("You selected {self} out of {MAX_RATING}")
    }

    /// Map a digit key to a rating, if it is one of `1`..`5`.
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(|d| Self::try_from(d).ok())
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Rating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}
