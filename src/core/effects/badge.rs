//! "Claim badge" pop-in.

use std::time::Duration;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, Timing};
use crate::core::geometry::Transform;
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, PropValue, Surface};

pub const POP_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
pub struct Badge {
    id: ElementId,
}

impl Badge {
    /// Hide `id` at zero scale until claimed.
    pub fn new(surface: &mut dyn Surface, id: ElementId) -> Self {
        surface.set_visible(id, true);
        surface.set_opacity(id, 0.0);
        surface.set_transform(id, Self::collapsed());
        Self { id }
    }

    fn collapsed() -> Transform {
        Transform { dx: 0.0, dy: 0.0, sx: 0.0, sy: 0.0 }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn claim(&self, surface: &mut dyn Surface, engine: &mut Engine, settings: &MotionSettings) {
        let timing = Timing::new(settings.gate(POP_DURATION), Ease::BackOut(1.7));
        engine.to(surface, self.id, PropValue::Opacity(1.0), timing);
        engine.to(surface, self.id, PropValue::Transform(Transform::IDENTITY), timing);
    }

    pub fn is_claimed(&self, surface: &dyn Surface) -> bool {
        surface.opacity(self.id).is_some_and(|o| o > 0.0)
    }

    /// Horizontal scale, for drawing the label partially while it pops.
    pub fn scale(&self, surface: &dyn Surface) -> f64 {
        surface.transform(self.id).map_or(0.0, |t| t.sx)
    }
}
