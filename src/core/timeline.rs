//! Sequenced tweens.
//!
//! A [`Timeline`] lays out tweens and callbacks on one clock, each placed
//! relative to what came before it ([`Position`]).  Nothing is scheduled
//! until [`Engine::play`] hands it to the engine, which starts every step
//! when the timeline's clock reaches it.  Start values of plain `to` steps
//! are read at that moment, not when the timeline is built, so two steps on
//! the same property chain instead of fighting.
//!
//! [`Engine::play`]: super::engine::Engine::play

use std::time::Duration;

use super::engine::{Completion, Timing};
use super::surface::{ElementId, PropValue};

/// Where a step goes on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// After everything added so far (`">"`).
    #[default]
    End,
    /// A gap after the current end (`"+=gap"`).
    AfterEnd(Duration),
    /// Overlapping the current end (`">-lead"`).
    BeforeEnd(Duration),
    /// Relative to the previous step's start (`"<offset"`).
    WithPrevious(Duration),
    /// Absolute offset from the timeline's start.
    At(Duration),
}

pub(super) enum StepAction {
    Tween {
        target: ElementId,
        from: Option<PropValue>,
        to: PropValue,
        timing: Timing,
    },
    Call(Completion),
}

pub(super) struct Step {
    pub(super) at: Duration,
    pub(super) action: StepAction,
}

/// Builder for a sequence of tweens on one clock.
#[derive(Default)]
pub struct Timeline {
    steps: Vec<Step>,
    end: Duration,
    previous_start: Duration,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("steps", &self.steps.len())
            .field("duration", &self.end)
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `target` from whatever it shows when the step starts.
    pub fn to(self, target: ElementId, to: PropValue, timing: Timing, position: Position) -> Self {
        self.push(
            StepAction::Tween {
                target,
                from: None,
                to,
                timing,
            },
            timing,
            position,
        )
    }

    /// Tween `target` from `from` to `to`.  The first step on a given
    /// `(element, prop)` shows `from` as soon as the timeline plays.
    pub fn from_to(
        self,
        target: ElementId,
        from: PropValue,
        to: PropValue,
        timing: Timing,
        position: Position,
    ) -> Self {
        self.push(
            StepAction::Tween {
                target,
                from: Some(from),
                to,
                timing,
            },
            timing,
            position,
        )
    }

    /// Run `callback` when the clock reaches `position`.
    pub fn call(self, callback: Completion, position: Position) -> Self {
        self.push(StepAction::Call(callback), Timing::instant(), position)
    }

    /// Total length: where the last step ends.
    pub fn duration(&self) -> Duration {
        self.end
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Start offsets of every step, in insertion order.
    pub fn starts(&self) -> Vec<Duration> {
        self.steps.iter().map(|s| s.at).collect()
    }

    fn resolve(&self, position: Position) -> Duration {
        match position {
            Position::End => self.end,
            Position::AfterEnd(gap) => self.end + gap,
            Position::BeforeEnd(lead) => self.end.saturating_sub(lead),
            Position::WithPrevious(offset) => self.previous_start + offset,
            Position::At(at) => at,
        }
    }

    fn push(mut self, mut action: StepAction, timing: Timing, position: Position) -> Self {
        let at = self.resolve(position) + timing.delay;
        // The step's own delay is folded into its start.
        if let StepAction::Tween { timing, .. } = &mut action {
            timing.delay = Duration::ZERO;
        }
        self.end = self.end.max(at + timing.active());
        self.previous_start = at;
        self.steps.push(Step { at, action });
        self
    }

    /// Steps ordered by start; ties keep insertion order.
    pub(super) fn into_steps(mut self) -> Vec<Step> {
        self.steps.sort_by_key(|s| s.at);
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::easing::Ease;
    use crate::core::surface::Surface;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn timing(n: u64) -> Timing {
        Timing::new(ms(n), Ease::Linear)
    }

    const A: ElementId = ElementId(1);
    const B: ElementId = ElementId(2);

    #[test]
    fn positions_resolve_against_end_and_previous_start() {
        let tl = Timeline::new()
            .to(A, PropValue::Opacity(1.0), timing(450), Position::End)
            .to(B, PropValue::Opacity(1.0), timing(450), Position::WithPrevious(ms(120)))
            .to(A, PropValue::Value(1.0), timing(100), Position::AfterEnd(ms(30)))
            .to(B, PropValue::Value(1.0), timing(100), Position::BeforeEnd(ms(50)))
            .to(A, PropValue::Opacity(0.0), timing(10), Position::At(ms(5)));
        assert_eq!(tl.starts(), [ms(0), ms(120), ms(600), ms(650), ms(5)]);
        assert_eq!(tl.duration(), ms(750));
    }

    #[test]
    fn repeats_and_delay_lengthen_the_step() {
        let pulse = timing(250).with_repeat(1, true).with_delay(ms(40));
        let tl = Timeline::new()
            .to(A, PropValue::Opacity(1.0), timing(100), Position::End)
            .to(A, PropValue::Value(1.0), pulse, Position::End);
        assert_eq!(tl.starts(), [ms(0), ms(140)]);
        assert_eq!(tl.duration(), ms(640));
    }

    #[test]
    fn calls_take_no_time() {
        let tl = Timeline::new()
            .to(A, PropValue::Opacity(1.0), timing(100), Position::End)
            .call(Box::new(|_: &mut dyn Surface| {}), Position::End)
            .to(A, PropValue::Value(1.0), timing(100), Position::End);
        assert_eq!(tl.starts(), [ms(0), ms(100), ms(100)]);
        assert_eq!(tl.len(), 3);
    }
}
