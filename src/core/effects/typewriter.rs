//! Typing reveal: text shows up one character at a time.

use std::time::Duration;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, Timing};
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, PropValue, Surface};

pub const TYPE_DURATION: Duration = Duration::from_millis(900);

#[derive(Debug, Clone)]
pub struct Typewriter {
    id: ElementId,
    text: String,
}

impl Typewriter {
    pub fn new(id: ElementId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    pub fn start(&self, surface: &mut dyn Surface, engine: &mut Engine, settings: &MotionSettings) {
        let chars = self.text.chars().count() as f64;
        engine.from_to(
            surface,
            self.id,
            PropValue::Value(0.0),
            PropValue::Value(chars),
            Timing::new(settings.gate(TYPE_DURATION), Ease::Linear),
            None,
        );
    }

    /// The revealed prefix, always on a char boundary.
    pub fn visible<'a>(&'a self, surface: &dyn Surface) -> &'a str {
        let shown = surface.value(self.id).unwrap_or(0.0).floor().max(0.0) as usize;
        match self.text.char_indices().nth(shown) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
