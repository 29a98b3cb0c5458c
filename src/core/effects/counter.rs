//! Stat counter that counts up from zero and snaps to whole numbers.
//!
//! A counter can also slide into its slot from either side, optionally
//! landing with a short scale pop.

use std::time::Duration;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, TimelineId, Timing};
use crate::core::geometry::Transform;
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, PropValue, Surface};
use crate::core::timeline::{Position, Timeline};

pub const COUNT_DURATION: Duration = Duration::from_millis(900);
const SLIDE_DURATION: Duration = Duration::from_millis(600);
/// Cells a stat travels while sliding in.
const SLIDE_DISTANCE: f64 = 8.0;
const POP_DURATION: Duration = Duration::from_millis(350);
const POP_SCALE: f64 = 1.06;

/// Which side a stat slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Counter {
    id: ElementId,
    pub label: String,
    pub target: u64,
}

impl Counter {
    /// `id` is the element whose value channel holds the running count.
    pub fn new(id: ElementId, label: impl Into<String>, target: u64) -> Self {
        Self {
            id,
            label: label.into(),
            target,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn start(&self, surface: &mut dyn Surface, engine: &mut Engine, settings: &MotionSettings) {
        engine.from_to(
            surface,
            self.id,
            PropValue::Value(0.0),
            PropValue::Value(self.target as f64),
            Timing::new(settings.gate(COUNT_DURATION), Ease::Power1Out),
            None,
        );
    }

    /// Fade the stat in while it slides from `side` into place.  With `pop`
    /// it then swells and settles back once.  Nothing moves without motion.
    pub fn slide_in(
        &self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        settings: &MotionSettings,
        side: Side,
        pop: bool,
    ) -> Option<TimelineId> {
        if !settings.motion_enabled {
            return None;
        }
        let dx = match side {
            Side::Left => -SLIDE_DISTANCE,
            Side::Right => SLIDE_DISTANCE,
        };
        let slide = Timing::new(SLIDE_DURATION, Ease::Power2Out);
        let rest = PropValue::Transform(Transform::IDENTITY);
        let mut timeline = Timeline::new()
            .from_to(
                self.id,
                PropValue::Transform(Transform::translate(dx, 0.0)),
                rest,
                slide,
                Position::End,
            )
            .from_to(
                self.id,
                PropValue::Opacity(0.0),
                PropValue::Opacity(1.0),
                slide,
                Position::WithPrevious(Duration::ZERO),
            );
        if pop {
            let swell = Transform {
                sx: POP_SCALE,
                sy: POP_SCALE,
                ..Transform::IDENTITY
            };
            timeline = timeline.from_to(
                self.id,
                rest,
                PropValue::Transform(swell),
                Timing::new(POP_DURATION, Ease::Power1InOut).with_repeat(1, true),
                Position::End,
            );
        }
        Some(engine.play(surface, timeline))
    }

    /// Horizontal offset and scale while sliding in.
    pub fn transform(&self, surface: &dyn Surface) -> Transform {
        surface.transform(self.id).unwrap_or_default()
    }

    pub fn opacity(&self, surface: &dyn Surface) -> f64 {
        surface.opacity(self.id).unwrap_or(1.0)
    }

    /// Current count, snapped to an integer.
    pub fn display(&self, surface: &dyn Surface) -> u64 {
        surface.value(self.id).unwrap_or(0.0).round().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Bounds;
    use crate::core::surface::GridSurface;

    #[test]
    fn counts_up_to_target() {
        let mut s = GridSurface::new();
        let c = Counter::new(s.add_free(Bounds::default()), "n", 250);
        let mut e = Engine::new(60).unwrap();
        c.start(&mut s, &mut e, &MotionSettings::default());
        assert_eq!(c.display(&s), 0);
        e.tick(Duration::from_millis(300), &mut s);
        let mid = c.display(&s);
        assert!(mid > 0 && mid < 250);
        e.settle(&mut s, 200);
        assert_eq!(c.display(&s), 250);
    }

    #[test]
    fn reduced_motion_shows_target() {
        let mut s = GridSurface::new();
        let c = Counter::new(s.add_free(Bounds::default()), "n", 7);
        let mut e = Engine::new(60).unwrap();
        c.start(&mut s, &mut e, &MotionSettings::new(true));
        assert_eq!(c.display(&s), 7);
        assert!(!e.is_active());
    }

    #[test]
    fn slides_in_then_pops_and_settles() {
        let mut s = GridSurface::new();
        let c = Counter::new(s.add_free(Bounds::default()), "n", 3);
        let mut e = Engine::new(60).unwrap();
        c.slide_in(&mut s, &mut e, &MotionSettings::default(), Side::Right, true);
        assert_eq!(c.transform(&s).dx, SLIDE_DISTANCE);
        assert_eq!(c.opacity(&s), 0.0);

        e.tick(SLIDE_DURATION, &mut s);
        assert_eq!(c.transform(&s), Transform::IDENTITY);
        assert_eq!(c.opacity(&s), 1.0);
        e.tick(POP_DURATION, &mut s);
        assert!((c.transform(&s).sx - POP_SCALE).abs() < 1e-9);

        e.settle(&mut s, 200);
        assert_eq!(c.transform(&s), Transform::IDENTITY);
        assert!(!e.is_active());
    }

    #[test]
    fn no_slide_without_motion() {
        let mut s = GridSurface::new();
        let c = Counter::new(s.add_free(Bounds::default()), "n", 3);
        let mut e = Engine::new(60).unwrap();
        let played = c.slide_in(&mut s, &mut e, &MotionSettings::new(true), Side::Left, true);
        assert!(played.is_none());
        assert_eq!(c.transform(&s), Transform::IDENTITY);
        assert_eq!(c.opacity(&s), 1.0);
    }
}
