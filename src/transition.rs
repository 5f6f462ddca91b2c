//! Presence transitions between keyed cards.
//!
//! A [`Presence`] holds at most one child. When the wanted key changes, the
//! current child plays its exit animation and is removed; only then does the
//! new child start entering ("wait" mode). Each child walks through
//!
//! ```text
//! Entering ──▶ Visible ──▶ Exiting ──▶ Removed
//! ```
//!
//! Time is always passed in, so the engine has no clock of its own and the
//! caller decides the frame rate.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Easing curves for enter/exit motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    CubicOut,
}

impl Easing {
    /// Apply the curve to a progress value, clamped to 0.0..=1.0
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Visual state of a child: how opaque and how large it is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub opacity: f64,
    pub scale: f64,
}

impl Appearance {
    /// Invisible and collapsed
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        scale: 0.0,
    };
    /// Fully visible at full size
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        scale: 1.0,
    };

    fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

/// Lifecycle phase of a presence child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Exiting,
    Removed,
}

/// Duration and curve shared by all motions
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// No animation: every change lands on its final state immediately
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }
}

#[derive(Debug, Clone, Copy)]
struct Motion {
    from: Appearance,
    to: Appearance,
    started: Instant,
}

impl Motion {
    fn ends_at(&self, timing: &Timing) -> Instant {
        self.started + timing.duration
    }

    fn at(&self, now: Instant, timing: &Timing) -> Appearance {
        if timing.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let progress = elapsed.as_secs_f64() / timing.duration.as_secs_f64();
        self.from.lerp(self.to, timing.easing.apply(progress))
    }
}

#[derive(Debug)]
struct Child<K> {
    key: K,
    phase: Phase,
    motion: Option<Motion>,
}

impl<K: Copy + Debug> Child<K> {
    fn appearance(&self, now: Instant, timing: &Timing) -> Appearance {
        match (&self.motion, self.phase) {
            (Some(motion), _) => motion.at(now, timing),
            (None, Phase::Visible) => Appearance::SHOWN,
            (None, _) => Appearance::HIDDEN,
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(key = ?self.key, from = ?self.phase, to = ?phase, "presence phase change");
        self.phase = phase;
    }
}

/// What should be drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenceFrame<K> {
    pub key: K,
    pub phase: Phase,
    pub appearance: Appearance,
}

/// Keyed presence container running one child at a time
#[derive(Debug)]
pub struct Presence<K> {
    timing: Timing,
    current: Option<Child<K>>,
    pending: Option<K>,
}

impl<K: Copy + Eq + Debug> Presence<K> {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            current: None,
            pending: None,
        }
    }

    /// Declare which child should be present.
    ///
    /// `has_mounted` picks the initial style for a child mounted with nothing
    /// to replace: before the first frame it appears at full size without
    /// animation, afterwards it grows in from [`Appearance::HIDDEN`].
    pub fn sync(&mut self, key: K, has_mounted: bool, now: Instant) {
        let timing = self.timing;
        match self.current.as_mut() {
            None => {
                self.current = Some(Self::mount(key, has_mounted, now, &timing));
                self.pending = None;
            }
            Some(child) if child.key == key => {
                if child.phase == Phase::Exiting {
                    // Wanted again before it finished leaving: grow back from where it is
                    let from = child.appearance(now, &timing);
                    child.motion = Some(Motion {
                        from,
                        to: Appearance::SHOWN,
                        started: now,
                    });
                    child.set_phase(Phase::Entering);
                }
                self.pending = None;
            }
            Some(child) => {
                if child.phase != Phase::Exiting {
                    let from = child.appearance(now, &timing);
                    child.motion = Some(Motion {
                        from,
                        to: Appearance::HIDDEN,
                        started: now,
                    });
                    child.set_phase(Phase::Exiting);
                }
                self.pending = Some(key);
            }
        }
        self.advance(now);
    }

    fn mount(key: K, has_mounted: bool, now: Instant, timing: &Timing) -> Child<K> {
        let mut child = Child {
            key,
            phase: Phase::Entering,
            motion: None,
        };
        if has_mounted && !timing.duration.is_zero() {
            child.motion = Some(Motion {
                from: Appearance::HIDDEN,
                to: Appearance::SHOWN,
                started: now,
            });
            tracing::debug!(key = ?key, "presence child entering");
        } else {
            child.set_phase(Phase::Visible);
        }
        child
    }

    /// Finish any motion whose time is up. Returns true if a phase changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let timing = self.timing;
        let mut changed = false;

        while let Some(child) = self.current.as_mut() {
            let Some(motion) = child.motion else {
                break;
            };
            let ends_at = motion.ends_at(&timing);
            if now < ends_at {
                break;
            }

            changed = true;
            child.motion = None;
            match child.phase {
                Phase::Entering => child.set_phase(Phase::Visible),
                Phase::Exiting => {
                    child.set_phase(Phase::Removed);
                    self.current = None;
                    if let Some(next) = self.pending.take() {
                        // The next child starts exactly when the previous one left
                        self.current = Some(Self::mount(next, true, ends_at, &timing));
                    }
                }
                Phase::Visible | Phase::Removed => {}
            }
        }

        changed
    }

    /// The child to draw at `now`, if any
    pub fn frame(&self, now: Instant) -> Option<PresenceFrame<K>> {
        self.current.as_ref().map(|child| PresenceFrame {
            key: child.key,
            phase: child.phase,
            appearance: child.appearance(now, &self.timing),
        })
    }

    /// Whether a motion is in flight or a child is waiting to enter
    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
            || self
                .current
                .as_ref()
                .is_some_and(|child| child.motion.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn timing() -> Timing {
        Timing::new(100 * MS, Easing::Linear)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicOut,
        ] {
            assert!(approx(easing.apply(0.0), 0.0), "{easing:?} at 0");
            assert!(approx(easing.apply(1.0), 1.0), "{easing:?} at 1");
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(approx(Easing::Linear.apply(1.5), 1.0));
    }

    #[test]
    fn test_first_mount_is_static() {
        let now = Instant::now();
        let mut presence = Presence::new(timing());
        presence.sync(1, false, now);

        let frame = presence.frame(now).unwrap();
        assert_eq!(frame.key, 1);
        assert_eq!(frame.phase, Phase::Visible);
        assert_eq!(frame.appearance, Appearance::SHOWN);
        assert!(!presence.is_animating());
    }

    #[test]
    fn test_later_mount_grows_in() {
        let now = Instant::now();
        let mut presence = Presence::new(timing());
        presence.sync(1, true, now);

        let frame = presence.frame(now).unwrap();
        assert_eq!(frame.phase, Phase::Entering);
        assert_eq!(frame.appearance, Appearance::HIDDEN);

        let mid = presence.frame(now + 50 * MS).unwrap().appearance;
        assert!(approx(mid.opacity, 0.5));
        assert!(approx(mid.scale, 0.5));

        assert!(presence.advance(now + 100 * MS));
        let frame = presence.frame(now + 100 * MS).unwrap();
        assert_eq!(frame.phase, Phase::Visible);
        assert_eq!(frame.appearance, Appearance::SHOWN);
    }

    #[test]
    fn test_swap_waits_for_exit() {
        let start = Instant::now();
        let mut presence = Presence::new(timing());
        presence.sync(1, false, start);
        presence.sync(2, true, start);

        // Outgoing child is still the one present while it shrinks away
        let frame = presence.frame(start + 40 * MS).unwrap();
        assert_eq!(frame.key, 1);
        assert_eq!(frame.phase, Phase::Exiting);
        assert!(approx(frame.appearance.opacity, 0.6));
        assert!(presence.is_animating());

        // Exit done: the new child starts entering from nothing
        presence.sync(2, true, start + 100 * MS);
        let frame = presence.frame(start + 100 * MS).unwrap();
        assert_eq!(frame.key, 2);
        assert_eq!(frame.phase, Phase::Entering);
        assert_eq!(frame.appearance, Appearance::HIDDEN);

        presence.sync(2, true, start + 200 * MS);
        let frame = presence.frame(start + 200 * MS).unwrap();
        assert_eq!(frame.key, 2);
        assert_eq!(frame.phase, Phase::Visible);
        assert!(!presence.is_animating());
    }

    #[test]
    fn test_late_tick_catches_up() {
        let start = Instant::now();
        let mut presence = Presence::new(timing());
        presence.sync(1, false, start);
        presence.sync(2, true, start);

        // One tick long after both motions would have finished
        presence.advance(start + 500 * MS);
        let frame = presence.frame(start + 500 * MS).unwrap();
        assert_eq!(frame.key, 2);
        assert_eq!(frame.phase, Phase::Visible);
    }

    #[test]
    fn test_instant_timing_swaps_immediately() {
        let now = Instant::now();
        let mut presence = Presence::new(Timing::instant());
        presence.sync(1, false, now);
        presence.sync(2, true, now);

        let frame = presence.frame(now).unwrap();
        assert_eq!(frame.key, 2);
        assert_eq!(frame.phase, Phase::Visible);
        assert_eq!(frame.appearance, Appearance::SHOWN);
    }

    #[test]
    fn test_reclaiming_exiting_child() {
        let start = Instant::now();
        let mut presence = Presence::new(timing());
        presence.sync(1, false, start);
        presence.sync(2, true, start);
        presence.sync(1, true, start + 50 * MS);

        let frame = presence.frame(start + 50 * MS).unwrap();
        assert_eq!(frame.key, 1);
        assert_eq!(frame.phase, Phase::Entering);
        assert!(approx(frame.appearance.opacity, 0.5));

        presence.advance(start + 150 * MS);
        assert_eq!(presence.frame(start + 150 * MS).unwrap().phase, Phase::Visible);
    }

    #[test]
    fn test_easing_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrap {
            easing: Easing,
        }
        let wrap: Wrap = toml::from_str("easing = \"ease-in-out\"").unwrap();
        assert_eq!(wrap.easing, Easing::EaseInOut);
    }
}
