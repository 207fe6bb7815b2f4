//! Per marker animation state.
//!
//! A [`Marker`] only knows how far along its path it is.
//! Which path that is, how long it is and how fast to move are supplied on every
//! [`Marker::advance`] so a marker can switch paths between two frames.

use crate::config::AnimatorOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative slack on reaching the path's end, covers rounding in the summed steps
const END_TOLERANCE: f64 = 1e-9;

/// Timestamp of a display frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Frame {
    /// Time since an arbitrary but fixed origin
    pub now: Duration,
}

impl Frame {
    /// Frame at `now`
    pub fn at(now: Duration) -> Frame {
        Frame { now }
    }

    /// Frame from a `requestAnimationFrame` style timestamp in milliseconds.
    ///
    /// Negative and non finite timestamps map to zero.
    pub fn from_millis(millis: f64) -> Frame {
        let secs = if millis.is_finite() && millis > 0.0 {
            millis / 1000.0
        } else {
            0.0
        };
        Frame {
            now: Duration::from_secs_f64(secs),
        }
    }
}

/// How far a marker moves per frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Stepping {
    /// Move by the rate on every frame regardless of the time passed
    Fixed,

    /// Scale the rate by the time passed since the previous frame.
    ///
    /// The rate is interpreted as "per frame at `reference_fps`",
    /// i.e. both modes move equally fast on a display refreshing at `reference_fps`.
    /// The very first frame doesn't move.
    Elapsed {
        /// Refresh rate the rate was tuned for
        reference_fps: f64,
    },
}

impl Default for Stepping {
    fn default() -> Self {
        Stepping::Fixed
    }
}

impl Stepping {
    /// Distance to move given the per frame `rate` and the time since the previous frame
    pub fn step(&self, rate: f64, elapsed: Option<Duration>) -> f64 {
        let step = match self {
            Stepping::Fixed => rate,
            Stepping::Elapsed { reference_fps } => match elapsed {
                Some(elapsed) => rate * elapsed.as_secs_f64() * reference_fps,
                None => 0.0,
            },
        };
        step.max(0.0)
    }
}

/// What happens when a marker reaches its path's end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum WrapPolicy {
    /// Jump back to the start on the same frame
    Reset,

    /// Hide the marker, jump back to the start after `hide_ms`
    /// and show it again `reveal_ms` later.
    Fade {
        /// Milliseconds between hiding and resetting
        hide_ms: u64,
        /// Milliseconds between resetting and showing
        reveal_ms: u64,
    },
}

impl Default for WrapPolicy {
    fn default() -> Self {
        WrapPolicy::Reset
    }
}

impl WrapPolicy {
    /// The dashboard's fade: 300ms hidden before the reset, 200ms more before showing
    pub const fn fade() -> WrapPolicy {
        WrapPolicy::Fade {
            hide_ms: 300,
            reveal_ms: 200,
        }
    }

    fn reveal(&self) -> Duration {
        match self {
            WrapPolicy::Reset => Duration::ZERO,
            WrapPolicy::Fade { reveal_ms, .. } => Duration::from_millis(*reveal_ms),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Visible,
    /// Hidden at the path's end until the reset
    Hiding { reset_at: Duration },
    /// Moving again but still hidden
    Revealing { show_at: Duration },
}

/// What to do with the marker's display node after an [`advance`](Marker::advance).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Advance {
    /// Arc length offset to place the marker at, `None` if it shouldn't be moved
    pub render: Option<f64>,
    /// New opacity, `None` if it didn't change
    pub opacity: Option<f64>,
}

/// Position of a marker along a path.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    progress: f64,
    laps: u64,
    last_frame: Option<Duration>,
    phase: Phase,
}

impl Default for Marker {
    fn default() -> Self {
        Marker::new()
    }
}

impl Marker {
    /// A visible marker at the start of its path
    pub fn new() -> Marker {
        Marker {
            progress: 0.0,
            laps: 0,
            last_frame: None,
            phase: Phase::Visible,
        }
    }

    /// Current arc length offset
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Number of times the marker wrapped back to the start
    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Whether the marker is currently faded out
    pub fn is_hidden(&self) -> bool {
        self.phase != Phase::Visible
    }

    /// Moves the marker for a new frame.
    ///
    /// `rate` is the distance per frame (see [`Stepping`]) and `total` the length of the path
    /// the marker is on right now.
    /// Afterwards `0 <= progress <= total` holds.
    pub fn advance(
        &mut self,
        frame: Frame,
        rate: f64,
        total: f64,
        options: &AnimatorOptions,
    ) -> Advance {
        let elapsed = self.last_frame.map(|last| frame.now.saturating_sub(last));
        self.last_frame = Some(frame.now);

        let mut opacity = None;
        match self.phase {
            Phase::Hiding { reset_at } if frame.now < reset_at => {
                self.progress = total.max(0.0);
                return Advance {
                    render: None,
                    opacity: None,
                };
            }
            Phase::Hiding { reset_at } => {
                self.progress = 0.0;
                self.laps += 1;
                self.phase = Phase::Revealing {
                    show_at: reset_at + options.wrap.reveal(),
                };
            }
            _ => {}
        }
        if let Phase::Revealing { show_at } = self.phase {
            if frame.now >= show_at {
                self.phase = Phase::Visible;
                opacity = Some(1.0);
            }
        }

        if total <= 0.0 {
            self.progress = 0.0;
            return Advance {
                render: Some(0.0),
                opacity,
            };
        }

        self.progress += options.stepping.step(rate, elapsed);
        if self.progress >= total * (1.0 - END_TOLERANCE) {
            match options.wrap {
                WrapPolicy::Reset => {
                    self.progress = 0.0;
                    self.laps += 1;
                }
                WrapPolicy::Fade { hide_ms, .. } => {
                    self.progress = total;
                    self.phase = Phase::Hiding {
                        reset_at: frame.now + Duration::from_millis(hide_ms),
                    };
                    return Advance {
                        render: None,
                        opacity: Some(0.0),
                    };
                }
            }
        }

        Advance {
            render: Some(self.progress),
            opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Frame {
        Frame::at(Duration::from_millis(millis))
    }

    #[test]
    fn reset_renders_at_the_start() {
        let options = AnimatorOptions::default();
        let mut marker = Marker::new();
        for i in 1..=3 {
            let advance = marker.advance(ms(i * 16), 30.0, 100.0, &options);
            assert_eq!(advance.render, Some(30.0 * i as f64));
        }
        let advance = marker.advance(ms(64), 30.0, 100.0, &options);
        assert_eq!(advance.render, Some(0.0));
        assert_eq!(advance.opacity, None);
        assert_eq!(marker.laps(), 1);
    }

    #[test]
    fn exact_multiple_wraps() {
        let options = AnimatorOptions::default();
        let mut marker = Marker::new();
        for i in 1..=4 {
            marker.advance(ms(i), 25.0, 100.0, &options);
        }
        assert_eq!(marker.progress(), 0.0);
        assert_eq!(marker.laps(), 1);
    }

    #[test]
    fn summed_fractional_steps_wrap() {
        let options = AnimatorOptions::default();
        for (rate, total, frames) in [(0.1, 1.0, 10), (0.3, 3.0, 10), (0.1, 100.0, 1000)] {
            let mut marker = Marker::new();
            for i in 0..frames {
                marker.advance(ms(i), rate, total, &options);
            }
            assert_eq!(marker.laps(), 1, "{} over {}", rate, total);
            assert_eq!(marker.progress(), 0.0);
        }
    }

    #[test]
    fn fade_hides_resets_and_reveals() {
        let options = AnimatorOptions {
            wrap: WrapPolicy::fade(),
            ..AnimatorOptions::default()
        };
        let mut marker = Marker::new();
        assert_eq!(marker.advance(ms(0), 60.0, 100.0, &options).render, Some(60.0));

        // Overflow hides
        let advance = marker.advance(ms(16), 60.0, 100.0, &options);
        assert_eq!(advance, Advance { render: None, opacity: Some(0.0) });
        assert!(marker.is_hidden());
        assert_eq!(marker.progress(), 100.0);

        // Held at the end until the reset
        let advance = marker.advance(ms(300), 60.0, 100.0, &options);
        assert_eq!(advance, Advance { render: None, opacity: None });
        assert_eq!(marker.progress(), 100.0);
        assert_eq!(marker.laps(), 0);

        // Reset, moving but still hidden
        let advance = marker.advance(ms(316), 60.0, 100.0, &options);
        assert_eq!(advance, Advance { render: Some(60.0), opacity: None });
        assert_eq!(marker.laps(), 1);
        assert!(marker.is_hidden());

        // Revealed 200ms after the reset was due
        let advance = marker.advance(ms(400), 10.0, 100.0, &options);
        assert_eq!(advance.opacity, None);
        let advance = marker.advance(ms(516), 10.0, 100.0, &options);
        assert_eq!(advance, Advance { render: Some(80.0), opacity: Some(1.0) });
        assert!(!marker.is_hidden());
    }

    #[test]
    fn elapsed_stepping() {
        let options = AnimatorOptions {
            stepping: Stepping::Elapsed { reference_fps: 60.0 },
            ..AnimatorOptions::default()
        };
        let mut marker = Marker::new();
        assert_eq!(marker.advance(ms(1000), 2.0, 1000.0, &options).render, Some(0.0));
        // Half a second at 60fps are 30 frames
        let progress = marker.advance(ms(1500), 2.0, 1000.0, &options).render.unwrap();
        assert!((progress - 60.0).abs() < 1e-9);
    }

    #[test]
    fn progress_from_a_longer_path_wraps() {
        let options = AnimatorOptions::default();
        let mut marker = Marker::new();
        marker.advance(ms(0), 150.0, 500.0, &options);
        let advance = marker.advance(ms(16), 1.0, 100.0, &options);
        assert_eq!(advance.render, Some(0.0));
        assert!(marker.progress() <= 100.0);
    }

    #[test]
    fn empty_path_stays_at_zero() {
        let options = AnimatorOptions::default();
        let mut marker = Marker::new();
        assert_eq!(marker.advance(ms(0), 5.0, 0.0, &options).render, Some(0.0));
        assert_eq!(marker.laps(), 0);
    }

    #[test]
    fn frames_from_millis() {
        assert_eq!(Frame::from_millis(1500.0), ms(1500));
        assert_eq!(Frame::from_millis(-3.0), Frame::default());
        assert_eq!(Frame::from_millis(f64::NAN), Frame::default());
    }
}
