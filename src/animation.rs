//! Host-driven animation primitives
//!
//! Nothing in here owns a clock. Hosts feed elapsed time through `advance`,
//! which keeps playback deterministic and lets the UI thread decide when a
//! frame happens.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Linear interpolation between two values
pub trait Lerp: Sized {
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

/// Timing curve applied to a tween's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Result of advancing an animation by some amount of time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<T> {
    pub value: T,
    pub finished: bool,
    /// Time left over after the animation reached its end
    pub leftover: Duration,
}

fn progress_of(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
    }
}

/// A single value animated from one state to another
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Lerp + Clone> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    /// Replace the end value without restarting the clock
    pub fn set_target(&mut self, to: T) {
        self.to = to;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated value. A finished tween is exactly at its target.
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to.clone();
        }
        let t = self.easing.apply(progress_of(self.elapsed, self.duration));
        self.from.lerp(&self.to, t)
    }

    pub fn advance(&mut self, dt: Duration) -> Step<T> {
        let remaining = self.duration.saturating_sub(self.elapsed);
        if dt >= remaining {
            self.elapsed = self.duration;
            Step {
                value: self.to.clone(),
                finished: true,
                leftover: dt - remaining,
            }
        } else {
            self.elapsed += dt;
            Step {
                value: self.value(),
                finished: false,
                leftover: Duration::ZERO,
            }
        }
    }
}

/// One stop on a keyframe timeline, in fractions of the total duration
#[derive(Debug, Clone)]
pub struct Keyframe<T> {
    pub relative_start: f64,
    pub relative_duration: f64,
    pub value: T,
}

/// A timeline of keyframes. Each keyframe interpolates from wherever the
/// previous one left off.
#[derive(Debug, Clone)]
pub struct Keyframes<T> {
    from: T,
    keyframes: Vec<Keyframe<T>>,
    duration: Duration,
    elapsed: Duration,
}

impl<T: Lerp + Clone> Keyframes<T> {
    pub fn new(from: T, duration: Duration) -> Self {
        Self {
            from,
            keyframes: Vec::new(),
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Add a keyframe; times are clamped to the timeline
    pub fn keyframe(mut self, relative_start: f64, relative_duration: f64, value: T) -> Self {
        let relative_start = relative_start.clamp(0.0, 1.0);
        let relative_duration = relative_duration.clamp(0.0, 1.0 - relative_start);
        self.keyframes.push(Keyframe {
            relative_start,
            relative_duration,
            value,
        });
        self.keyframes
            .sort_by(|a, b| a.relative_start.total_cmp(&b.relative_start));
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// Value at a fraction of the timeline
    pub fn value_at(&self, progress: f64) -> T {
        let mut current = self.from.clone();
        for keyframe in &self.keyframes {
            if progress < keyframe.relative_start {
                return current;
            }
            let end = keyframe.relative_start + keyframe.relative_duration;
            if keyframe.relative_duration <= 0.0 || progress >= end {
                current = keyframe.value.clone();
                continue;
            }
            let local = (progress - keyframe.relative_start) / keyframe.relative_duration;
            return current.lerp(&keyframe.value, local);
        }
        current
    }

    pub fn value(&self) -> T {
        self.value_at(progress_of(self.elapsed, self.duration))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: Duration) -> Step<T> {
        let remaining = self.duration.saturating_sub(self.elapsed);
        if dt >= remaining {
            self.elapsed = self.duration;
            Step {
                value: self.value_at(1.0),
                finished: true,
                leftover: dt - remaining,
            }
        } else {
            self.elapsed += dt;
            Step {
                value: self.value(),
                finished: false,
                leftover: Duration::ZERO,
            }
        }
    }
}

/// What a repeating timeline did during one `advance`
#[derive(Debug, Clone, PartialEq)]
pub enum LoopStep<T> {
    /// Mid-iteration
    Running(T),
    /// An iteration just ended. The owner decides whether to `repeat` or `cancel`.
    Boundary {
        value: T,
        iteration: u64,
        leftover: Duration,
    },
    /// Cancelled, or waiting for the next iteration to be supplied
    Stopped,
}

/// Runs keyframe timelines back to back until cancelled.
///
/// Each iteration is supplied by the owner at the boundary so it can be built
/// from the geometry current at that moment.
#[derive(Debug, Clone)]
pub struct RepeatingTimeline<T> {
    current: Option<Keyframes<T>>,
    iterations: u64,
    cancelled: bool,
}

impl<T: Lerp + Clone> RepeatingTimeline<T> {
    pub fn new(first: Keyframes<T>) -> Self {
        Self {
            current: Some(first),
            iterations: 0,
            cancelled: false,
        }
    }

    /// Completed iterations so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Current value of the running iteration, if any
    pub fn value(&self) -> Option<T> {
        self.current.as_ref().map(Keyframes::value)
    }

    /// Start the next iteration. Ignored once cancelled.
    pub fn repeat(&mut self, next: Keyframes<T>) {
        if !self.cancelled {
            self.current = Some(next);
        }
    }

    /// Swap the running iteration for one built from new geometry, keeping
    /// its elapsed time
    pub fn reshape(&mut self, next: Keyframes<T>) {
        if let Some(current) = self.current.as_mut() {
            let elapsed = current.elapsed.min(next.duration);
            *current = Keyframes { elapsed, ..next };
        }
    }

    /// Count iterations that elapsed without being played
    pub fn skip(&mut self, count: u64) {
        self.iterations = self.iterations.saturating_add(count);
    }

    /// Stop immediately. No further boundary is ever reported.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.current = None;
    }

    pub fn advance(&mut self, dt: Duration) -> LoopStep<T> {
        if self.cancelled {
            return LoopStep::Stopped;
        }
        let Some(timeline) = self.current.as_mut() else {
            return LoopStep::Stopped;
        };

        let step = timeline.advance(dt);
        if !step.finished {
            return LoopStep::Running(step.value);
        }

        self.current = None;
        self.iterations += 1;
        LoopStep::Boundary {
            value: step.value,
            iteration: self.iterations,
            leftover: step.leftover,
        }
    }
}
