//! Geometry primitives shared by the surface, the engine and the reorderer.
//!
//! Coordinates are in terminal cells but kept as `f64` so in-flight
//! transforms can sit between cells; the UI rounds when it draws.

/// An axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `(px, py)` falls inside the box (right/bottom edges exclusive).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// A box of `frac` of this one's size, centred inside it.
    pub fn centered_fraction(&self, frac: f64) -> Self {
        let w = (self.width * frac).round();
        let h = (self.height * frac).round();
        Self {
            x: self.x + ((self.width - w) / 2.0).round(),
            y: self.y + ((self.height - h) / 2.0).round(),
            width: w,
            height: h,
        }
    }
}

/// Translation + scale, applied with a top-left origin.
///
/// Applying `t` to natural bounds `b` gives
/// `(b.x + dx, b.y + dy, b.width * sx, b.height * sy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub dx: f64,
    pub dy: f64,
    pub sx: f64,
    pub sy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

const EPSILON: f64 = 1e-6;

impl Transform {
    pub const IDENTITY: Transform = Transform {
        dx: 0.0,
        dy: 0.0,
        sx: 1.0,
        sy: 1.0,
    };

    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self { dx, dy, sx: 1.0, sy: 1.0 }
    }

    /// The transform that makes something laid out at `natural` appear at
    /// `apparent`.  This is the "invert" step of a FLIP transition.
    pub fn between(natural: Bounds, apparent: Bounds) -> Self {
        let ratio = |to: f64, from: f64| if from.abs() > EPSILON { to / from } else { 1.0 };
        Self {
            dx: apparent.x - natural.x,
            dy: apparent.y - natural.y,
            sx: ratio(apparent.width, natural.width),
            sy: ratio(apparent.height, natural.height),
        }
    }

    pub fn apply(&self, b: Bounds) -> Bounds {
        Bounds {
            x: b.x + self.dx,
            y: b.y + self.dy,
            width: b.width * self.sx,
            height: b.height * self.sy,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.dx.abs() < EPSILON
            && self.dy.abs() < EPSILON
            && (self.sx - 1.0).abs() < EPSILON
            && (self.sy - 1.0).abs() < EPSILON
    }
}

// ───────────────────────────────────────── interpolation ─────

/// Values the tween engine knows how to interpolate.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Bounds {
    fn lerp(self, to: Self, t: f64) -> Self {
        Bounds {
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            width: self.width.lerp(to.width, t),
            height: self.height.lerp(to.height, t),
        }
    }
}

impl Lerp for Transform {
    fn lerp(self, to: Self, t: f64) -> Self {
        Transform {
            dx: self.dx.lerp(to.dx, t),
            dy: self.dy.lerp(to.dy, t),
            sx: self.sx.lerp(to.sx, t),
            sy: self.sy.lerp(to.sy, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_inverts_a_move() {
        let old = Bounds::new(2.0, 3.0, 10.0, 4.0);
        let new = Bounds::new(14.0, 3.0, 10.0, 4.0);
        let t = Transform::between(new, old);
        assert_eq!(t.apply(new), old);
        assert_eq!(t.dx, -12.0);
        assert_eq!(t.sx, 1.0);
    }

    #[test]
    fn between_same_bounds_is_identity() {
        let b = Bounds::new(1.0, 1.0, 5.0, 5.0);
        assert!(Transform::between(b, b).is_identity());
    }

    #[test]
    fn between_zero_size_keeps_unit_scale() {
        let natural = Bounds::new(0.0, 0.0, 0.0, 0.0);
        let apparent = Bounds::new(4.0, 2.0, 8.0, 3.0);
        let t = Transform::between(natural, apparent);
        assert_eq!((t.sx, t.sy), (1.0, 1.0));
        assert_eq!((t.dx, t.dy), (4.0, 2.0));
    }

    #[test]
    fn centered_fraction_stays_inside() {
        let vp = Bounds::new(0.0, 0.0, 100.0, 40.0);
        let r = vp.centered_fraction(0.8);
        assert_eq!(r, Bounds::new(10.0, 4.0, 80.0, 32.0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Transform::translate(-10.0, 4.0);
        assert_eq!(a.lerp(Transform::IDENTITY, 0.0), a);
        assert!(a.lerp(Transform::IDENTITY, 1.0).is_identity());
    }
}
