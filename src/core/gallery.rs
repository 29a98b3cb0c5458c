//! Gallery detail view — a two-state machine (Closed / Open) over one
//! shared, free-positioned detail element.
//!
//! Opening grows the detail view out of the selected card: it jumps to the
//! card's on-screen bounds, takes the card's content, then tweens to the
//! resting rect.  Opening another card while open re-runs that from the new
//! card.  Closing fades out and hides on completion.
//!
//! Every open kills whatever is pending on the detail element, including a
//! close fade's hide-on-complete, so a quick close→open never ends with a
//! hidden detail view.

use std::path::PathBuf;

use super::engine::{Engine, Timing};
use super::geometry::{Bounds, Transform};
use super::surface::{ElementId, PropValue, Surface};

/// Fraction of the viewport the open detail view occupies.
pub const REST_FRACTION: f64 = 0.8;

/// What the detail view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailContent {
    pub title: String,
    pub text: String,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryState {
    #[default]
    Closed,
    Open { card: ElementId },
}

#[derive(Debug)]
pub struct Gallery {
    detail: ElementId,
    state: GalleryState,
    content: Option<DetailContent>,
}

impl Gallery {
    /// Wrap an existing detail element (usually from `GridSurface::add_free`).
    pub fn new(detail: ElementId) -> Self {
        Self {
            detail,
            state: GalleryState::Closed,
            content: None,
        }
    }

    pub fn detail(&self) -> ElementId {
        self.detail
    }

    pub fn state(&self) -> GalleryState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GalleryState::Open { .. })
    }

    /// Content to draw, while the detail element is visible (this includes
    /// the closing fade).
    pub fn visible_content(&self, surface: &dyn Surface) -> Option<&DetailContent> {
        if surface.is_visible(self.detail) {
            self.content.as_ref()
        } else {
            None
        }
    }

    /// Where the open detail view settles.
    pub fn resting_bounds(viewport: Bounds) -> Bounds {
        viewport.centered_fraction(REST_FRACTION)
    }

    /// Closed→Open, or Open→Open on another card.  Returns `false` (and
    /// changes nothing) when the card can't be measured.
    pub fn open(
        &mut self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        card: ElementId,
        content: DetailContent,
        viewport: Bounds,
        timing: Timing,
    ) -> bool {
        let Some(first) = surface.measure(card) else {
            tracing::debug!(?card, "gallery card not measurable; open skipped");
            return false;
        };

        engine.kill(self.detail, None);
        surface.set_bounds(self.detail, first);
        surface.set_transform(self.detail, Transform::IDENTITY);
        surface.set_opacity(self.detail, 1.0);
        surface.set_visible(self.detail, true);

        tracing::debug!(?card, title = %content.title, "gallery open");
        self.content = Some(content);
        self.state = GalleryState::Open { card };

        let rest = Self::resting_bounds(viewport);
        engine.to(surface, self.detail, PropValue::Bounds(rest), timing);
        true
    }

    /// Open→Closed.  No-op when already closed.
    pub fn close(
        &mut self,
        surface: &mut dyn Surface,
        engine: &mut Engine,
        timing: Timing,
    ) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = GalleryState::Closed;
        let detail = self.detail;
        engine.kill(detail, None);
        engine.to_then(
            surface,
            detail,
            PropValue::Opacity(0.0),
            timing,
            Some(Box::new(move |s: &mut dyn Surface| s.set_visible(detail, false))),
        );
        tracing::debug!("gallery close");
        true
    }

    /// Re-seat an open detail view after the viewport changed size.
    pub fn relayout(&self, surface: &mut dyn Surface, engine: &mut Engine, viewport: Bounds) {
        if self.is_open() && !engine.is_tweening(self.detail) {
            engine.set(surface, self.detail, PropValue::Bounds(Self::resting_bounds(viewport)));
        }
    }
}
