//! Indeterminate linear progress indicator
//!
//! The indicator grows its height into view, loops a sweep of its fill across
//! the container until told to stop, then shrinks back out:
//!
//! ```text
//! Idle -> GrowingIn -> Sweeping (repeats) -> ShrinkingOut -> Idle
//! ```
//!
//! It is driven entirely by the host: `start`/`stop` calls and `tick` with the
//! time elapsed since the previous frame.

use crate::animation::{Easing, Keyframes, LoopStep, RepeatingTimeline, Tween};
use crate::config::{BarColors, ProgressBarConfig};
use crate::ui::geometry::{Frame, Orientation, Size};
use crate::ui::host::{ContainerId, ViewHierarchy, ViewId};
use ratatui::style::Color;
use std::time::Duration;
use tracing::{debug, warn};

/// Fraction of the bar width the fill reaches in the first half of a sweep
pub const SWEEP_FILL_RATIO: f64 = 0.7;

/// Shortest sweep iteration accepted by the setters
pub const MIN_SWEEP_DURATION: Duration = Duration::from_millis(1);

/// Observable phase of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Idle,
    GrowingIn,
    Sweeping,
    ShrinkingOut,
}

/// Things that happened during a `tick`, or since the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorEvent {
    Attached(ContainerId),
    GrowCompleted,
    SweepIterationCompleted { iteration: u64 },
    ShrinkCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Attachment {
    container: ContainerId,
    size: Size,
}

/// The moving rectangle, positioned relative to the bar
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fill {
    frame: Frame,
    inserted: bool,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    GrowingIn(Tween<Frame>),
    Sweeping(RepeatingTimeline<Frame>),
    ShrinkingOut { bar: Tween<Frame>, fill: Tween<Frame> },
}

/// A horizontal bar that signals indeterminate background activity.
///
/// Only the configuration is deserializable; build an indicator from a
/// [`ProgressBarConfig`].
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    id: ViewId,
    config: ProgressBarConfig,
    applied_colors: Option<BarColors>,
    frame: Frame,
    fill: Fill,
    bar_width: f64,
    attachment: Option<Attachment>,
    orientation: Option<Orientation>,
    running: bool,
    phase: Phase,
    generation: u64,
    sweep_iterations: u64,
    pending_events: Vec<IndicatorEvent>,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator {
    /// Create an indicator with default configuration
    pub fn new() -> Self {
        Self::with_config(ProgressBarConfig::default())
    }

    /// Create an indicator from a configuration. The bar starts collapsed at
    /// the configured top offset and takes its width on the first layout.
    pub fn with_config(config: ProgressBarConfig) -> Self {
        let frame = Frame::new(0.0, config.top_offset, config.bar_width, 0.0);
        Self::build(config, frame)
    }

    /// Create an indicator with an explicit initial frame
    pub fn with_frame(frame: Frame) -> Self {
        Self::build(ProgressBarConfig::default(), frame)
    }

    fn build(config: ProgressBarConfig, frame: Frame) -> Self {
        let fill = Fill {
            frame: Frame::new(0.0, 0.0, 0.0, config.bar_height),
            inserted: false,
        };
        Self {
            id: ViewId::new(),
            bar_width: config.bar_width,
            config,
            applied_colors: None,
            frame,
            fill,
            attachment: None,
            orientation: None,
            running: false,
            phase: Phase::Idle,
            generation: 0,
            sweep_iterations: 0,
            pending_events: Vec::new(),
        }
    }

    // Observers ---------------------------------------------------------

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn config(&self) -> &ProgressBarConfig {
        &self.config
    }

    pub fn state(&self) -> IndicatorState {
        match self.phase {
            Phase::Idle => IndicatorState::Idle,
            Phase::GrowingIn(_) => IndicatorState::GrowingIn,
            Phase::Sweeping(_) => IndicatorState::Sweeping,
            Phase::ShrinkingOut { .. } => IndicatorState::ShrinkingOut,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The bar's frame inside its container
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The fill's frame, relative to the bar
    pub fn fill_frame(&self) -> Frame {
        self.fill.frame
    }

    /// Whether the fill has been inserted into the bar
    pub fn fill_visible(&self) -> bool {
        self.fill.inserted
    }

    /// Resolved bar width
    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    pub fn attached_container(&self) -> Option<ContainerId> {
        self.attachment.map(|attachment| attachment.container)
    }

    pub fn container_size(&self) -> Option<Size> {
        self.attachment.map(|attachment| attachment.size)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Colors captured by the most recent `start`
    pub fn applied_colors(&self) -> Option<BarColors> {
        self.applied_colors
    }

    /// Total sweep iterations completed since construction
    pub fn sweep_iterations(&self) -> u64 {
        self.sweep_iterations
    }

    /// Bumped whenever a new grow or shrink supersedes the running animation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // Configuration -----------------------------------------------------

    pub fn set_track_color(&mut self, color: Color) {
        self.config.colors.track = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.config.colors.fill = color;
    }

    /// Set the bar height. A visible bar and its running animations pick up
    /// the new height immediately.
    pub fn set_bar_height(&mut self, height: f64) {
        let height = non_negative("bar_height", height);
        self.config.bar_height = height;

        if let Phase::GrowingIn(tween) = &mut self.phase {
            let target = tween.target().with_height(height);
            tween.set_target(target);
        } else if matches!(self.phase, Phase::Sweeping(_)) {
            self.frame.height = height;
            self.reshape_sweep();
        }
    }

    /// Set an explicit width, or 0 to track the container width
    pub fn set_bar_width(&mut self, width: f64) {
        let width = non_negative("bar_width", width);
        self.config.bar_width = width;
        self.bar_width = match self.attachment {
            Some(attachment) if width == 0.0 => attachment.size.width,
            _ => width,
        };
    }

    pub fn set_grow_duration(&mut self, duration: Duration) {
        self.config.grow_duration = duration;
    }

    pub fn set_sweep_duration(&mut self, duration: Duration) {
        if duration < MIN_SWEEP_DURATION {
            warn!(
                "Sweep duration {:?} is too short, using {:?}",
                duration, MIN_SWEEP_DURATION
            );
        }
        self.config.sweep_duration = duration.max(MIN_SWEEP_DURATION);
    }

    pub fn set_grow_easing(&mut self, easing: Easing) {
        self.config.grow_easing = easing;
    }

    // Public operations -------------------------------------------------

    /// Grow the bar into view and begin sweeping.
    ///
    /// Colors are applied and the bar is attached to the host's top-most
    /// container on every call; the grow itself only happens when the
    /// indicator is not already running. `None` uses the configured grow
    /// duration, and a zero duration applies the final geometry immediately.
    pub fn start(&mut self, host: &mut impl ViewHierarchy, duration: Option<Duration>) {
        let duration = duration.unwrap_or(self.config.grow_duration);
        self.applied_colors = Some(self.config.colors);
        self.attach(host);

        if self.running {
            debug!("{} already running, ignoring start", self.id);
            return;
        }

        self.running = true;
        self.cancel_phase();
        self.generation += 1;

        let target = Frame::new(0.0, self.frame.y, self.bar_width, self.config.bar_height);
        debug!(
            "{} growing to {}x{} over {:?} (generation {})",
            self.id, target.width, target.height, duration, self.generation
        );

        if duration.is_zero() {
            self.frame = target;
            self.phase = Phase::Idle;
            self.grow_completed();
        } else {
            self.phase = Phase::GrowingIn(Tween::new(
                self.frame,
                target,
                duration,
                self.config.grow_easing,
            ));
        }
    }

    /// Shrink the fill and the bar to zero height, whatever the current phase.
    ///
    /// `None` uses the configured grow duration; zero applies immediately.
    pub fn stop(&mut self, duration: Option<Duration>) {
        let duration = duration.unwrap_or(self.config.grow_duration);
        self.running = false;
        self.cancel_phase();
        self.generation += 1;

        let fill_target = Frame::new(0.0, 0.0, self.bar_width, 0.0);
        let bar_target = Frame::new(0.0, self.frame.y, self.bar_width, 0.0);
        debug!(
            "{} shrinking out over {:?} (generation {})",
            self.id, duration, self.generation
        );

        if duration.is_zero() {
            self.fill.frame = fill_target;
            self.frame = bar_target;
            self.phase = Phase::Idle;
            self.pending_events.push(IndicatorEvent::ShrinkCompleted);
        } else {
            self.phase = Phase::ShrinkingOut {
                bar: Tween::new(self.frame, bar_target, duration, self.config.grow_easing),
                fill: Tween::new(self.fill.frame, fill_target, duration, self.config.grow_easing),
            };
        }
    }

    /// Let the current sweep iteration finish, then shrink out
    pub fn stop_after_completion(&mut self) {
        debug!("{} will stop after the current sweep", self.id);
        self.running = false;
    }

    /// Attach to the top-most container of `host`. Does nothing if already
    /// attached or if the host has no container to offer.
    pub fn attach(&mut self, host: &mut impl ViewHierarchy) -> bool {
        if self.attachment.is_some() {
            return false;
        }

        let Some(top) = host.top_container() else {
            debug!("{} found no container to attach to", self.id);
            return false;
        };

        host.add_subview(top.id, self.id);
        self.attachment = Some(Attachment {
            container: top.id,
            size: top.size,
        });
        debug!("{} attached to {}", self.id, top.id);
        self.pending_events.push(IndicatorEvent::Attached(top.id));
        self.layout(top.size);
        true
    }

    /// Re-read the attached container's size from the host and lay out.
    /// Detaches if the container no longer exists.
    pub fn layout_in(&mut self, host: &impl ViewHierarchy) {
        let Some(attachment) = self.attachment else {
            return;
        };
        match host.container_size(attachment.container) {
            Some(size) => self.layout(size),
            None => {
                debug!("{} lost {}, detaching", self.id, attachment.container);
                self.attachment = None;
            }
        }
    }

    /// Respond to a layout pass with the container's current size
    pub fn layout(&mut self, size: Size) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.size = size;
        }

        // Auto width tracks the container; an explicit width equal to the new
        // height means the device rotated under a previously resolved width.
        if self.config.bar_width == 0.0 || self.bar_width == 0.0 || self.bar_width == size.height {
            self.bar_width = size.width;
        }

        let orientation = Orientation::of(size);
        if self.orientation != Some(orientation) {
            debug!("{} laid out in {:?}", self.id, orientation);
            self.orientation = Some(orientation);
        }

        self.frame.width = self.bar_width;
        let bar_width = self.bar_width;
        match &mut self.phase {
            Phase::GrowingIn(tween) => {
                let target = tween.target().with_width(bar_width);
                tween.set_target(target);
            }
            Phase::ShrinkingOut { bar, .. } => {
                let target = bar.target().with_width(bar_width);
                bar.set_target(target);
            }
            Phase::Idle | Phase::Sweeping(_) => {}
        }
        if matches!(self.phase, Phase::Sweeping(_)) {
            self.reshape_sweep();
        }
    }

    /// Advance animations by `dt` and report what happened.
    ///
    /// Leftover time after a phase completes flows into the next phase.
    pub fn tick(&mut self, dt: Duration) -> Vec<IndicatorEvent> {
        let mut remaining = dt;

        loop {
            match &mut self.phase {
                Phase::Idle => break,
                Phase::GrowingIn(tween) => {
                    let step = tween.advance(remaining);
                    self.frame = step.value;
                    if !step.finished {
                        break;
                    }
                    remaining = step.leftover;
                    self.phase = Phase::Idle;
                    self.grow_completed();
                }
                Phase::Sweeping(timeline) => match timeline.advance(remaining) {
                    LoopStep::Running(value) => {
                        self.fill.frame = value;
                        break;
                    }
                    LoopStep::Boundary {
                        value, leftover, ..
                    } => {
                        self.fill.frame = value;
                        remaining = self.sweep_boundary(leftover);
                    }
                    LoopStep::Stopped => {
                        self.phase = Phase::Idle;
                        break;
                    }
                },
                Phase::ShrinkingOut { bar, fill } => {
                    let bar_step = bar.advance(remaining);
                    let fill_step = fill.advance(remaining);
                    self.frame = bar_step.value;
                    self.fill.frame = fill_step.value;
                    if !(bar_step.finished && fill_step.finished) {
                        break;
                    }
                    debug!("{} shrink completed", self.id);
                    self.phase = Phase::Idle;
                    self.pending_events.push(IndicatorEvent::ShrinkCompleted);
                    break;
                }
            }
        }

        std::mem::take(&mut self.pending_events)
    }

    // Internals ---------------------------------------------------------

    fn cancel_phase(&mut self) {
        if let Phase::Sweeping(timeline) = &mut self.phase {
            timeline.cancel();
        }
        self.phase = Phase::Idle;
    }

    fn grow_completed(&mut self) {
        debug!("{} grow completed", self.id);
        self.pending_events.push(IndicatorEvent::GrowCompleted);
        self.fill.inserted = true;
        self.begin_sweep(None);
    }

    /// Start the first sweep iteration, or the next one on an existing loop
    fn begin_sweep(&mut self, existing: Option<RepeatingTimeline<Frame>>) {
        let Some(attachment) = self.attachment else {
            warn!("{} has no container to sweep across, stopping", self.id);
            self.stop(None);
            return;
        };

        let iteration = self.sweep_iteration(attachment.size.width);
        self.fill.frame = iteration.value_at(0.0);

        let timeline = match existing {
            Some(mut timeline) => {
                timeline.repeat(iteration);
                timeline
            }
            None => RepeatingTimeline::new(iteration),
        };
        self.phase = Phase::Sweeping(timeline);
    }

    /// One sweep across a container of the given width. The fill grows at
    /// the left edge, then slides off the right edge, never leaving the
    /// container.
    fn sweep_iteration(&self, container_width: f64) -> Keyframes<Frame> {
        let bar_height = self.config.bar_height;
        let reach = (self.bar_width * SWEEP_FILL_RATIO).min(container_width);
        Keyframes::new(Frame::new(0.0, 0.0, 0.0, bar_height), self.sweep_period())
            .keyframe(0.0, 0.5, Frame::new(0.0, 0.0, reach, bar_height))
            .keyframe(0.5, 0.5, Frame::new(container_width, 0.0, 0.0, bar_height))
    }

    /// Rebuild the running sweep iteration from the current geometry
    fn reshape_sweep(&mut self) {
        let Some(attachment) = self.attachment else {
            return;
        };
        let iteration = self.sweep_iteration(attachment.size.width);
        if let Phase::Sweeping(timeline) = &mut self.phase {
            timeline.reshape(iteration);
            if let Some(value) = timeline.value() {
                self.fill.frame = value;
            }
        }
    }

    fn sweep_period(&self) -> Duration {
        self.config.sweep_duration.max(MIN_SWEEP_DURATION)
    }

    /// Handle the end of a sweep iteration and return the time left to play.
    /// Whole iterations that fit in the leftover are counted, not played.
    fn sweep_boundary(&mut self, leftover: Duration) -> Duration {
        let Phase::Sweeping(mut timeline) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return leftover;
        };

        let mut leftover = leftover;
        let mut completed: u64 = 1;
        if self.running && self.attachment.is_some() {
            let period = self.sweep_period().as_nanos();
            let skipped = leftover.as_nanos() / period;
            if skipped > 0 {
                let skipped = u64::try_from(skipped).unwrap_or(u64::MAX);
                timeline.skip(skipped);
                completed = completed.saturating_add(skipped);
                leftover = Duration::from_nanos(
                    u64::try_from(leftover.as_nanos() % period).unwrap_or(u64::MAX),
                );
            }
        }

        self.sweep_iterations = self.sweep_iterations.saturating_add(completed);
        self.pending_events.push(IndicatorEvent::SweepIterationCompleted {
            iteration: timeline.iterations(),
        });

        if self.running {
            self.begin_sweep(Some(timeline));
        } else if self.fill.frame.height >= self.config.bar_height {
            debug!("{} observed stop at sweep boundary", self.id);
            self.stop(None);
        }
        leftover
    }
}

fn non_negative(name: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("{} must be a non-negative number, got {}; using 0", name, value);
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::host::HostWindow;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn host() -> HostWindow {
        HostWindow::new(Size::new(100.0, 40.0))
    }

    #[test]
    fn test_new_indicator_is_idle() {
        let indicator = ProgressIndicator::new();
        assert_eq!(indicator.state(), IndicatorState::Idle);
        assert!(!indicator.is_running());
        assert!(!indicator.fill_visible());
        assert_eq!(indicator.frame().height, 0.0);
        assert!(indicator.attached_container().is_none());
        assert!(indicator.applied_colors().is_none());
    }

    #[test]
    fn test_start_attaches_and_grows() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, None);

        assert_eq!(indicator.state(), IndicatorState::GrowingIn);
        assert!(indicator.is_running());
        assert_eq!(indicator.attached_container(), host.root_id());
        assert_eq!(indicator.bar_width(), 100.0);
        assert_eq!(host.subviews(host.root_id().unwrap()), vec![indicator.id()]);

        let events = indicator.tick(ms(250));
        assert_eq!(events, vec![IndicatorEvent::Attached(host.root_id().unwrap())]);
        assert!(indicator.frame().height > 0.0 && indicator.frame().height < 5.0);

        let events = indicator.tick(ms(250));
        assert_eq!(events, vec![IndicatorEvent::GrowCompleted]);
        assert_eq!(indicator.frame().height, 5.0);
        assert_eq!(indicator.state(), IndicatorState::Sweeping);
        assert!(indicator.fill_visible());
    }

    #[test]
    fn test_zero_duration_start_sweeps_immediately() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));

        assert_eq!(indicator.state(), IndicatorState::Sweeping);
        assert_eq!(indicator.frame(), Frame::new(0.0, 0.0, 100.0, 5.0));
        assert_eq!(indicator.fill_frame(), Frame::new(0.0, 0.0, 0.0, 5.0));
    }

    #[test]
    fn test_start_while_running_does_not_regrow() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, None);
        indicator.tick(ms(100));
        let generation = indicator.generation();
        let frame = indicator.frame();

        indicator.start(&mut host, None);
        assert_eq!(indicator.generation(), generation);
        assert_eq!(indicator.frame(), frame);
        assert_eq!(indicator.state(), IndicatorState::GrowingIn);
    }

    #[test]
    fn test_sweep_keyframes() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));

        indicator.tick(ms(500));
        assert_eq!(indicator.fill_frame(), Frame::new(0.0, 0.0, 70.0, 5.0));

        indicator.tick(ms(250));
        let fill = indicator.fill_frame();
        assert_eq!(fill.x, 50.0);
        assert_eq!(fill.width, 35.0);

        let events = indicator.tick(ms(250));
        assert_eq!(
            events,
            vec![IndicatorEvent::SweepIterationCompleted { iteration: 1 }]
        );
        // Next iteration restarts from the left edge
        assert_eq!(indicator.fill_frame(), Frame::new(0.0, 0.0, 0.0, 5.0));
        assert_eq!(indicator.state(), IndicatorState::Sweeping);
    }

    #[test]
    fn test_stop_during_sweep_shrinks_out() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));
        indicator.tick(ms(300));

        indicator.stop(None);
        assert!(!indicator.is_running());
        assert_eq!(indicator.state(), IndicatorState::ShrinkingOut);

        let events = indicator.tick(ms(500));
        assert_eq!(events, vec![IndicatorEvent::ShrinkCompleted]);
        assert_eq!(indicator.state(), IndicatorState::Idle);
        assert_eq!(indicator.frame().height, 0.0);
        assert_eq!(indicator.fill_frame().height, 0.0);
    }

    #[test]
    fn test_stop_during_grow_never_sweeps() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, None);
        indicator.tick(ms(100));

        indicator.stop(Some(ms(200)));
        let events = indicator.tick(ms(1000));
        assert_eq!(events, vec![IndicatorEvent::ShrinkCompleted]);
        assert!(!indicator.fill_visible());
        assert_eq!(indicator.frame().height, 0.0);
        assert_eq!(indicator.sweep_iterations(), 0);
    }

    #[test]
    fn test_stop_after_completion_waits_for_boundary() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));
        indicator.tick(ms(400));

        indicator.stop_after_completion();
        indicator.tick(ms(400));
        assert_eq!(indicator.state(), IndicatorState::Sweeping);

        let events = indicator.tick(ms(200));
        assert_eq!(
            events,
            vec![IndicatorEvent::SweepIterationCompleted { iteration: 1 }]
        );
        assert_eq!(indicator.state(), IndicatorState::ShrinkingOut);

        let events = indicator.tick(ms(500));
        assert_eq!(events, vec![IndicatorEvent::ShrinkCompleted]);
        assert_eq!(indicator.frame().height, 0.0);
        assert_eq!(indicator.fill_frame().height, 0.0);
    }

    #[test]
    fn test_start_without_container_falls_back_to_stop() {
        let mut host = HostWindow::empty();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));

        assert!(indicator.attached_container().is_none());
        assert!(!indicator.is_running());
        assert_eq!(indicator.state(), IndicatorState::ShrinkingOut);
    }

    #[test]
    fn test_setters_clamp_invalid_values() {
        let mut indicator = ProgressIndicator::new();
        indicator.set_bar_height(-3.0);
        assert_eq!(indicator.config().bar_height, 0.0);
        indicator.set_bar_width(f64::NAN);
        assert_eq!(indicator.config().bar_width, 0.0);
        indicator.set_sweep_duration(Duration::ZERO);
        assert_eq!(indicator.config().sweep_duration, MIN_SWEEP_DURATION);
    }

    #[test]
    fn test_with_frame_keeps_vertical_offset() {
        let mut host = host();
        let mut indicator = ProgressIndicator::with_frame(Frame::new(0.0, 20.0, 100.0, 0.0));
        indicator.start(&mut host, Some(Duration::ZERO));
        assert_eq!(indicator.frame(), Frame::new(0.0, 20.0, 100.0, 5.0));
    }

    #[test]
    fn test_colors_apply_on_start() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.set_fill_color(Color::Red);
        indicator.start(&mut host, None);
        assert_eq!(indicator.applied_colors().unwrap().fill, Color::Red);

        indicator.set_fill_color(Color::Green);
        assert_eq!(indicator.applied_colors().unwrap().fill, Color::Red);
    }

    #[test]
    fn test_stop_after_completion_during_grow_sweeps_once() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, None);
        indicator.tick(ms(100));

        indicator.stop_after_completion();
        let events = indicator.tick(ms(400));
        assert_eq!(events, vec![IndicatorEvent::GrowCompleted]);
        assert_eq!(indicator.state(), IndicatorState::Sweeping);
        assert!(indicator.fill_visible());

        let events = indicator.tick(ms(1000));
        assert_eq!(
            events,
            vec![IndicatorEvent::SweepIterationCompleted { iteration: 1 }]
        );
        assert_eq!(indicator.state(), IndicatorState::ShrinkingOut);

        let events = indicator.tick(ms(500));
        assert_eq!(events, vec![IndicatorEvent::ShrinkCompleted]);
        assert_eq!(indicator.sweep_iterations(), 1);
        assert_eq!(indicator.frame().height, 0.0);
    }

    #[test]
    fn test_bar_height_change_applies_to_running_sweep() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));
        indicator.tick(ms(100));

        indicator.set_bar_height(2.0);
        assert_eq!(indicator.frame().height, 2.0);
        assert_eq!(indicator.fill_frame().height, 2.0);

        indicator.tick(ms(100));
        let fill = indicator.fill_frame();
        assert_eq!(fill.height, 2.0);
        // Progress through the iteration is kept
        assert!((fill.width - 28.0).abs() < 1e-9);

        indicator.stop_after_completion();
        let events = indicator.tick(ms(800));
        assert_eq!(
            events,
            vec![IndicatorEvent::SweepIterationCompleted { iteration: 1 }]
        );
        assert_eq!(indicator.state(), IndicatorState::ShrinkingOut);
    }

    #[test]
    fn test_bar_height_change_retargets_grow() {
        let mut host = host();
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, None);
        indicator.tick(ms(100));

        indicator.set_bar_height(8.0);
        indicator.tick(ms(400));
        assert_eq!(indicator.frame().height, 8.0);
        assert_eq!(indicator.fill_frame().height, 8.0);
    }

    #[test]
    fn test_long_tick_counts_whole_sweeps_without_playing_them() {
        let mut host = host();
        let mut config = ProgressBarConfig::default();
        config.sweep_duration = ms(1);
        let mut indicator = ProgressIndicator::with_config(config);
        indicator.start(&mut host, Some(Duration::ZERO));

        let events = indicator.tick(Duration::from_secs(3600));
        assert_eq!(
            events,
            vec![
                IndicatorEvent::Attached(host.root_id().unwrap()),
                IndicatorEvent::GrowCompleted,
                IndicatorEvent::SweepIterationCompleted { iteration: 3_600_000 },
            ]
        );
        assert_eq!(indicator.sweep_iterations(), 3_600_000);
        assert_eq!(indicator.state(), IndicatorState::Sweeping);
        assert_eq!(indicator.fill_frame(), Frame::new(0.0, 0.0, 0.0, 5.0));
    }
}
