//! Tween engine — the animation collaborator every feature drives.
//!
//! A tween moves one [`Prop`] of one element from a starting value to a
//! target over a duration with an easing curve, after an optional delay,
//! optionally repeating (and reversing on alternate passes with `yoyo`).
//! The host calls [`Engine::tick`] once per frame; that is the only place
//! values are written while animating.
//!
//! # Invariants
//!
//! 1. At most one tween per `(element, prop)`: starting a new one kills the
//!    old one *and its completion callback* (overwrite).
//! 2. The start value is read from the surface when the tween is created.
//! 3. A tween with zero duration and zero delay is applied immediately and
//!    never registered, so no frames are spent on it.
//! 4. Completion callbacks run after the final value is written, once.
//! 5. Timeline steps start in order of their offsets as the timeline's clock
//!    passes them; a timeline whose steps all sit at zero plays out inside
//!    [`Engine::play`].

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use super::easing::Ease;
use super::error::MotionError;
use super::geometry::Lerp;
use super::surface::{ElementId, Prop, PropValue, Surface};
use super::timeline::{Step, StepAction, Timeline};

/// Callback fired when a tween reaches its target.
pub type Completion = Box<dyn FnOnce(&mut dyn Surface)>;

/// Duration, start delay, easing and repetition of one tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub duration: Duration,
    pub delay: Duration,
    pub ease: Ease,
    /// Extra passes after the first.
    pub repeat: u32,
    /// Run every other pass backwards.
    pub yoyo: bool,
}

impl Timing {
    pub const fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            ease,
            repeat: 0,
            yoyo: false,
        }
    }

    /// Zero duration, zero delay.
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO, Ease::Linear)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_repeat(mut self, repeat: u32, yoyo: bool) -> Self {
        self.repeat = repeat;
        self.yoyo = yoyo;
        self
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero() && self.delay.is_zero()
    }

    /// Time spent animating, every pass included, delay excluded.
    pub fn active(&self) -> Duration {
        self.duration.saturating_mul(self.repeat.saturating_add(1))
    }

    /// The value a tween from `from` to `to` rests on.  An odd number of
    /// repeats with `yoyo` ends on the way back.
    fn rest(&self, from: PropValue, to: PropValue) -> PropValue {
        if self.yoyo && self.repeat % 2 == 1 {
            from
        } else {
            to
        }
    }
}

/// Where a stagger cascade starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerFrom {
    /// First item goes first.
    Start,
    /// Both ends go first, meeting in the middle.
    Edges,
}

/// Start delay for item `index` of `count` in a cascade of `each` steps.
pub fn stagger_delay(index: usize, count: usize, each: Duration, from: StaggerFrom) -> Duration {
    let step = match from {
        StaggerFrom::Start => index,
        StaggerFrom::Edges => index.min(count.saturating_sub(1).saturating_sub(index)),
    };
    each * step as u32
}

struct Tween {
    target: ElementId,
    from: PropValue,
    to: PropValue,
    timing: Timing,
    elapsed: Duration,
    finished: bool,
    on_complete: Option<Completion>,
}

impl Tween {
    fn prop(&self) -> Prop {
        self.to.prop()
    }

    /// Advance by `dt` and return the value to write, if any.
    fn advance(&mut self, dt: Duration) -> Option<PropValue> {
        self.elapsed += dt;
        if self.elapsed < self.timing.delay {
            return None;
        }
        let local = self.elapsed - self.timing.delay;
        if self.timing.duration.is_zero() || local >= self.timing.active() {
            self.finished = true;
            return Some(self.timing.rest(self.from, self.to));
        }
        let passes = local.as_secs_f64() / self.timing.duration.as_secs_f64();
        let pass = passes.floor();
        let mut t = passes - pass;
        if self.timing.yoyo && pass as u64 % 2 == 1 {
            t = 1.0 - t;
        }
        Some(self.from.lerp(self.to, self.timing.ease.apply(t)))
    }
}

/// Handle to a playing timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineId(u64);

/// A timeline handed to the engine: its clock and the steps not yet started.
struct Playing {
    id: TimelineId,
    clock: Duration,
    pending: VecDeque<Step>,
}

/// Frame-driven tween scheduler.
pub struct Engine {
    tweens: Vec<Tween>,
    timelines: Vec<Playing>,
    next_timeline: u64,
    frame_interval: Duration,
    frames: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("active_tweens", &self.tweens.len())
            .field("timelines", &self.timelines.len())
            .field("frame_interval", &self.frame_interval)
            .field("frames", &self.frames)
            .finish()
    }
}

impl Engine {
    /// Create an engine that expects to be ticked `fps` times a second.
    pub fn new(fps: u32) -> Result<Self, MotionError> {
        if fps == 0 {
            return Err(MotionError::EngineUnavailable { fps });
        }
        Ok(Self {
            tweens: Vec::new(),
            timelines: Vec::new(),
            next_timeline: 0,
            frame_interval: Duration::from_secs(1) / fps,
            frames: 0,
        })
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of ticks that advanced at least one tween.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether any tween or timeline step is still pending.
    pub fn is_active(&self) -> bool {
        !self.tweens.is_empty() || !self.timelines.is_empty()
    }

    pub fn is_tweening(&self, target: ElementId) -> bool {
        self.tweens.iter().any(|t| t.target == target)
    }

    /// Tween `target` from its current value to `to`.
    pub fn to(
        &mut self,
        surface: &mut dyn Surface,
        target: ElementId,
        to: PropValue,
        timing: Timing,
    ) {
        self.to_then(surface, target, to, timing, None);
    }

    /// Like [`Engine::to`], with a completion callback.
    pub fn to_then(
        &mut self,
        surface: &mut dyn Surface,
        target: ElementId,
        to: PropValue,
        timing: Timing,
        on_complete: Option<Completion>,
    ) {
        let Some(from) = surface.read(target, to.prop()) else {
            tracing::debug!(?target, prop = ?to.prop(), "tween target missing; skipped");
            return;
        };
        self.from_to(surface, target, from, to, timing, on_complete);
    }

    /// Set `from` now, then tween to `to`.
    pub fn from_to(
        &mut self,
        surface: &mut dyn Surface,
        target: ElementId,
        from: PropValue,
        to: PropValue,
        timing: Timing,
        on_complete: Option<Completion>,
    ) {
        self.kill(target, Some(to.prop()));
        if timing.is_instant() {
            surface.write(target, timing.rest(from, to));
            if let Some(done) = on_complete {
                done(surface);
            }
            return;
        }
        surface.write(target, from);
        self.tweens.push(Tween {
            target,
            from,
            to,
            timing,
            elapsed: Duration::ZERO,
            finished: false,
            on_complete,
        });
    }

    /// Kill any tween on `target` and write `value` immediately.
    pub fn set(&mut self, surface: &mut dyn Surface, target: ElementId, value: PropValue) {
        self.kill(target, Some(value.prop()));
        surface.write(target, value);
    }

    /// Drop tweens on `target` (one property, or all with `None`) without
    /// running their completions.
    pub fn kill(&mut self, target: ElementId, prop: Option<Prop>) {
        self.tweens
            .retain(|t| !(t.target == target && prop.is_none_or(|p| p == t.prop())));
    }

    /// Start playing `timeline`.  The first step on each `(element, prop)`
    /// that has an explicit start value shows it straight away, and steps at
    /// offset zero start now.
    pub fn play(&mut self, surface: &mut dyn Surface, timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.next_timeline);
        self.next_timeline += 1;

        let mut steps: VecDeque<Step> = timeline.into_steps().into();
        let mut shown = HashSet::new();
        for step in &steps {
            if let StepAction::Tween { target, from, to, .. } = &step.action {
                if shown.insert((*target, to.prop())) {
                    if let Some(from) = from {
                        surface.write(*target, *from);
                    }
                }
            }
        }

        while steps.front().is_some_and(|s| s.at.is_zero()) {
            if let Some(step) = steps.pop_front() {
                self.start(surface, step.action, Duration::ZERO);
            }
        }
        if !steps.is_empty() {
            self.timelines.push(Playing {
                id,
                clock: Duration::ZERO,
                pending: steps,
            });
        }
        id
    }

    /// Drop the steps of a timeline that have not started yet.  Tweens it
    /// already started keep running.
    pub fn kill_timeline(&mut self, id: TimelineId) {
        self.timelines.retain(|t| t.id != id);
    }

    pub fn is_playing(&self, id: TimelineId) -> bool {
        self.timelines.iter().any(|t| t.id == id)
    }

    /// Start one timeline step whose offset passed `elapsed` ago.
    fn start(&mut self, surface: &mut dyn Surface, action: StepAction, elapsed: Duration) {
        match action {
            StepAction::Tween {
                target,
                from,
                to,
                timing,
            } => {
                match from {
                    Some(from) => self.from_to(surface, target, from, to, timing, None),
                    None => self.to(surface, target, to, timing),
                }
                if !elapsed.is_zero() {
                    self.catch_up(surface, target, to.prop(), elapsed);
                }
            }
            StepAction::Call(callback) => callback(surface),
        }
    }

    /// Advance the one tween on `(target, prop)` by `elapsed`.
    fn catch_up(
        &mut self,
        surface: &mut dyn Surface,
        target: ElementId,
        prop: Prop,
        elapsed: Duration,
    ) {
        let Some(index) = self
            .tweens
            .iter()
            .position(|t| t.target == target && t.prop() == prop)
        else {
            return;
        };
        let tween = &mut self.tweens[index];
        if let Some(value) = tween.advance(elapsed) {
            surface.write(target, value);
        }
        if tween.finished {
            let tween = self.tweens.remove(index);
            if let Some(done) = tween.on_complete {
                done(surface);
            }
        }
    }

    /// Move every timeline clock on by `dt` and start the steps it passes.
    fn advance_timelines(&mut self, dt: Duration, surface: &mut dyn Surface) {
        let mut due = Vec::new();
        for playing in &mut self.timelines {
            playing.clock += dt;
            while playing.pending.front().is_some_and(|s| s.at <= playing.clock) {
                if let Some(step) = playing.pending.pop_front() {
                    due.push((step.action, playing.clock - step.at));
                }
            }
        }
        self.timelines.retain(|t| !t.pending.is_empty());
        for (action, elapsed) in due {
            self.start(surface, action, elapsed);
        }
    }

    /// Advance all tweens by `dt` and write their values, then start the
    /// timeline steps that came due.  Returns `true` while something is
    /// still animating.
    pub fn tick(&mut self, dt: Duration, surface: &mut dyn Surface) -> bool {
        if !self.is_active() {
            return false;
        }
        self.frames += 1;
        for tween in &mut self.tweens {
            if let Some(value) = tween.advance(dt) {
                surface.write(tween.target, value);
            }
        }
        let (finished, active): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tweens).into_iter().partition(|t| t.finished);
        self.tweens = active;
        for tween in finished {
            if let Some(done) = tween.on_complete {
                done(surface);
            }
        }
        self.advance_timelines(dt, surface);
        self.is_active()
    }

    /// Tick at the engine's frame interval until idle, capped at `max_frames`.
    pub fn settle(&mut self, surface: &mut dyn Surface, max_frames: usize) {
        let dt = self.frame_interval;
        for _ in 0..max_frames {
            if !self.tick(dt, surface) {
                break;
            }
        }
    }
}
