//! Three-dot demo sequence.
//!
//! Each dot eases in from its own offset, starting 120 ms after the one
//! before it.  Replaying drops whatever is left of the previous run first.

use std::time::Duration;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, TimelineId, Timing};
use crate::core::geometry::{Bounds, Transform};
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, GridSurface, PropValue, Surface};
use crate::core::timeline::{Position, Timeline};

pub const DOTS: usize = 3;
const STEP_DURATION: Duration = Duration::from_millis(450);
const STEP_OFFSET: Duration = Duration::from_millis(120);

/// Where each dot comes in from.
const ENTRANCES: [Transform; DOTS] = [
    // from below
    Transform {
        dx: 0.0,
        dy: 1.0,
        sx: 1.0,
        sy: 1.0,
    },
    // from the left
    Transform {
        dx: -2.0,
        dy: 0.0,
        sx: 1.0,
        sy: 1.0,
    },
    // slightly shrunk
    Transform {
        dx: 0.0,
        dy: 0.0,
        sx: 0.88,
        sy: 0.88,
    },
];

#[derive(Debug, Clone)]
pub struct DemoDots {
    dots: [ElementId; DOTS],
    playing: Option<TimelineId>,
}

impl DemoDots {
    /// Add the dots, shown at rest.
    pub fn new(surface: &mut GridSurface) -> Self {
        let dots = std::array::from_fn(|_| {
            let id = surface.add_free(Bounds::new(0.0, 0.0, 1.0, 1.0));
            surface.set_visible(id, true);
            id
        });
        Self {
            dots,
            playing: None,
        }
    }

    pub fn dots(&self) -> [ElementId; DOTS] {
        self.dots
    }

    /// Run the sequence from the top.  Does nothing without motion.
    pub fn replay(
        &mut self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        settings: &MotionSettings,
    ) {
        if !settings.motion_enabled {
            return;
        }
        if let Some(previous) = self.playing.take() {
            engine.kill_timeline(previous);
        }
        for &dot in &self.dots {
            engine.kill(dot, None);
        }

        let timing = Timing::new(STEP_DURATION, Ease::Power1Out);
        let rest = PropValue::Transform(Transform::IDENTITY);
        let mut timeline = Timeline::new();
        for (i, (&dot, entrance)) in self.dots.iter().zip(ENTRANCES).enumerate() {
            let position = if i == 0 {
                Position::End
            } else {
                Position::WithPrevious(STEP_OFFSET)
            };
            timeline = timeline
                .from_to(dot, PropValue::Transform(entrance), rest, timing, position)
                .from_to(
                    dot,
                    PropValue::Opacity(0.0),
                    PropValue::Opacity(1.0),
                    timing,
                    Position::WithPrevious(Duration::ZERO),
                );
        }
        self.playing = Some(engine.play(surface, timeline));
        tracing::debug!("demo replay");
    }
}
