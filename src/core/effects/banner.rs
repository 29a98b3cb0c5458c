//! Title banner entrance.
//!
//! The banner drops in with an overshoot, glows through one quick swell,
//! then a shine sweeps across it.  Three elements carry the state: the
//! banner itself (transform and opacity), a shine position on a value
//! channel, and a glow flag on another value channel.

use std::time::Duration;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, TimelineId, Timing};
use crate::core::geometry::{Bounds, Transform};
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, GridSurface, PropValue, Surface};
use crate::core::timeline::{Position, Timeline};

const DROP_DURATION: Duration = Duration::from_millis(900);
const DROP_FROM: Transform = Transform {
    dx: 0.0,
    dy: -2.0,
    sx: 0.85,
    sy: 0.85,
};
const SWELL_DURATION: Duration = Duration::from_millis(250);
const SWELL_SCALE: f64 = 1.03;
const SHINE_DURATION: Duration = Duration::from_millis(800);
/// The shine starts this long before the swell ends.
const SHINE_OVERLAP: Duration = Duration::from_millis(200);
/// Shine positions run from off the left edge (-1) to off the right (+1).
const SHINE_START: f64 = -1.2;
const SHINE_END: f64 = 1.2;

#[derive(Debug, Clone, Copy)]
pub struct Banner {
    id: ElementId,
    shine: ElementId,
    glow: ElementId,
}

impl Banner {
    /// Add the banner's elements.  It starts hidden.
    pub fn new(surface: &mut GridSurface) -> Self {
        let id = surface.add_free(Bounds::default());
        let shine = surface.add_free(Bounds::default());
        let glow = surface.add_free(Bounds::default());
        surface.set_visible(id, true);
        surface.set_opacity(id, 0.0);
        surface.set_value(shine, SHINE_START);
        Self { id, shine, glow }
    }

    /// Play the entrance.  Without motion the banner just appears.
    pub fn entrance(
        &self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        settings: &MotionSettings,
    ) -> Option<TimelineId> {
        if !settings.motion_enabled {
            engine.set(surface, self.id, PropValue::Opacity(1.0));
            engine.set(surface, self.id, PropValue::Transform(Transform::IDENTITY));
            return None;
        }
        let glow = self.glow;
        let rest = PropValue::Transform(Transform::IDENTITY);
        let swell = Transform {
            sx: SWELL_SCALE,
            sy: SWELL_SCALE,
            ..Transform::IDENTITY
        };
        let timeline = Timeline::new()
            .to(self.id, PropValue::Opacity(1.0), Timing::instant(), Position::End)
            .from_to(
                self.id,
                PropValue::Transform(DROP_FROM),
                rest,
                Timing::new(DROP_DURATION, Ease::BackOut(1.8)),
                Position::End,
            )
            .call(
                Box::new(move |s: &mut dyn Surface| s.set_value(glow, 1.0)),
                Position::End,
            )
            .from_to(
                self.id,
                rest,
                PropValue::Transform(swell),
                Timing::new(SWELL_DURATION, Ease::SineInOut).with_repeat(1, true),
                Position::End,
            )
            .call(
                Box::new(move |s: &mut dyn Surface| s.set_value(glow, 0.0)),
                Position::End,
            )
            .from_to(
                self.shine,
                PropValue::Value(SHINE_START),
                PropValue::Value(SHINE_END),
                Timing::new(SHINE_DURATION, Ease::Power2Out),
                Position::BeforeEnd(SHINE_OVERLAP),
            );
        Some(engine.play(surface, timeline))
    }

    pub fn opacity(&self, surface: &dyn Surface) -> f64 {
        surface.opacity(self.id).unwrap_or(0.0)
    }

    pub fn transform(&self, surface: &dyn Surface) -> Transform {
        surface.transform(self.id).unwrap_or_default()
    }

    pub fn is_glowing(&self, surface: &dyn Surface) -> bool {
        surface.value(self.glow).is_some_and(|v| v > 0.5)
    }

    /// Column of a `width`-wide title the shine is over, if it is over it.
    pub fn shine_column(&self, surface: &dyn Surface, width: usize) -> Option<usize> {
        let at = surface.value(self.shine)?;
        if width == 0 || !(-1.0..=1.0).contains(&at) {
            return None;
        }
        Some((((at + 1.0) / 2.0) * (width - 1) as f64).round() as usize)
    }
}
