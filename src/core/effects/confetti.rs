//! Confetti burst: particles fly out from the viewport centre, spinning as
//! they go, while the whole burst fades; then everything hides itself.

use std::time::Duration;

use rand::Rng;

use crate::core::easing::Ease;
use crate::core::engine::{Engine, Timing};
use crate::core::geometry::{Bounds, Transform};
use crate::core::settings::MotionSettings;
use crate::core::surface::{ElementId, GridSurface, PropValue, Surface};

pub const PIECES: usize = 48;
/// Particle shapes: the glyph for each rotation step, and the step size in
/// degrees.
const SHAPES: &[(&[char], f64)] = &[
    (&['■', '◆'], 45.0),
    (&['▲', '▶', '▼', '◀'], 90.0),
    (&['│', '╱', '─', '╲'], 45.0),
    (&['●'], 360.0),
];
/// Largest spin either way, in degrees.
const MAX_SPIN: f64 = 180.0;
const FADE: Duration = Duration::from_millis(1200);
const FADE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: ElementId,
    /// Hue in degrees; drawn at 80% saturation, 60% lightness.
    pub hue: f64,
    /// Index into the shape table.
    shape: usize,
}

impl Particle {
    /// Glyph for the particle's current rotation, which lives on its value
    /// channel.
    pub fn glyph(&self, surface: &dyn Surface) -> char {
        let (frames, step) = SHAPES[self.shape % SHAPES.len()];
        let rotation = surface.value(self.id).unwrap_or(0.0);
        let frame = (rotation / step).round() as i64;
        frames[frame.rem_euclid(frames.len() as i64) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    burst: ElementId,
    particles: Vec<Particle>,
}

impl ConfettiBurst {
    /// Spawn a burst centred in `viewport`.  `None` when motion is off.
    pub fn spawn<R: Rng + ?Sized>(
        surface: &mut GridSurface,
        engine: &mut Engine,
        viewport: Bounds,
        settings: &MotionSettings,
        rng: &mut R,
    ) -> Option<Self> {
        if !settings.motion_enabled {
            return None;
        }
        let burst = surface.add_free(viewport);
        surface.set_visible(burst, true);

        let (cx, cy) = viewport.center();
        let mut particles = Vec::with_capacity(PIECES);
        for _ in 0..PIECES {
            let id = surface.add_free(Bounds::new(cx.floor(), cy.floor(), 1.0, 1.0));
            surface.set_visible(id, true);
            let to = Transform::translate(
                rng.random_range(-22.0..=22.0),
                rng.random_range(-12.0..=4.0),
            );
            let timing = Timing::new(
                Duration::from_secs_f64(rng.random_range(0.7..=1.2)),
                Ease::Power2Out,
            );
            engine.to_then(
                surface,
                id,
                PropValue::Transform(to),
                timing,
                Some(Box::new(move |s: &mut dyn Surface| s.set_visible(id, false))),
            );
            let spin = rng.random_range(-MAX_SPIN..=MAX_SPIN);
            engine.to(surface, id, PropValue::Value(spin), timing);
            particles.push(Particle {
                id,
                hue: rng.random_range(0.0..360.0),
                shape: rng.random_range(0..SHAPES.len()),
            });
        }

        engine.to_then(
            surface,
            burst,
            PropValue::Opacity(0.0),
            Timing::new(FADE, Ease::Linear).with_delay(FADE_DELAY),
            Some(Box::new(move |s: &mut dyn Surface| s.set_visible(burst, false))),
        );
        tracing::debug!(pieces = PIECES, "confetti");
        Some(Self { burst, particles })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn opacity(&self, surface: &dyn Surface) -> f64 {
        surface.opacity(self.burst).unwrap_or(0.0)
    }

    pub fn is_finished(&self, surface: &dyn Surface) -> bool {
        !surface.is_visible(self.burst)
    }

    /// Remove every element of the burst from the surface.
    pub fn dispose(self, surface: &mut GridSurface) {
        for p in self.particles {
            surface.remove(p.id);
        }
        surface.remove(self.burst);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const VIEWPORT: Bounds = Bounds::new(0.0, 0.0, 80.0, 24.0);

    #[test]
    fn burst_spreads_fades_and_cleans_up() {
        let mut s = GridSurface::new();
        let mut e = Engine::new(60).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let motion = MotionSettings::default();
        let burst = ConfettiBurst::spawn(&mut s, &mut e, VIEWPORT, &motion, &mut rng).unwrap();
        assert_eq!(burst.particles().len(), PIECES);
        assert_eq!(s.len(), PIECES + 1);

        for _ in 0..20 {
            e.tick(Duration::from_millis(16), &mut s);
        }
        let spread = burst
            .particles()
            .iter()
            .filter_map(|p| s.transform(p.id))
            .filter(|t| !t.is_identity())
            .count();
        assert!(spread > PIECES / 2);
        let spinning = burst
            .particles()
            .iter()
            .filter(|p| s.value(p.id).is_some_and(|v| v != 0.0))
            .count();
        assert!(spinning > PIECES / 2);
        assert!(!burst.is_finished(&s));

        e.settle(&mut s, 1000);
        assert!(burst.is_finished(&s));
        assert!(burst.particles().iter().all(|p| !s.is_visible(p.id)));
        burst.dispose(&mut s);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn no_burst_without_motion() {
        let mut s = GridSurface::new();
        let mut e = Engine::new(60).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let reduced = MotionSettings::new(true);
        assert!(ConfettiBurst::spawn(&mut s, &mut e, VIEWPORT, &reduced, &mut rng).is_none());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn glyph_turns_with_rotation() {
        let mut s = GridSurface::new();
        let id = s.add_free(Bounds::new(0.0, 0.0, 1.0, 1.0));
        let square = Particle { id, hue: 0.0, shape: 0 };
        let bar = Particle { id, hue: 0.0, shape: 2 };
        assert_eq!(square.glyph(&s), '■');
        assert_eq!(bar.glyph(&s), '│');
        s.set_value(id, 45.0);
        assert_eq!(square.glyph(&s), '◆');
        assert_eq!(bar.glyph(&s), '╱');
        s.set_value(id, -90.0);
        assert_eq!(square.glyph(&s), '■');
        assert_eq!(bar.glyph(&s), '─');
    }
}
