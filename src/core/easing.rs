//! Easing curves, named the way GSAP names them
//! (`power1.inOut`, `back.out(1.7)`, …) so config files stay familiar.

use std::fmt;
use std::str::FromStr;

/// An easing curve mapping linear progress `t ∈ [0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2Out,
    Power2InOut,
    Power3Out,
    SineInOut,
    /// Overshoots past 1.0 before settling; the payload is the overshoot.
    BackOut(f64),
}

/// Default overshoot for `back.out` without an explicit argument.
const BACK_OVERSHOOT: f64 = 1.70158;

impl Ease {
    /// Evaluate the curve.  Input is clamped; endpoints are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t).powi(2),
            Ease::Power1InOut => in_out(t, 2),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => in_out(t, 3),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
            Ease::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u.powi(3) + s * u.powi(2)
            }
        }
    }
}

fn in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        (2.0 * t).powi(power) / 2.0
    } else {
        1.0 - (2.0 * (1.0 - t)).powi(power) / 2.0
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => f.write_str("none"),
            Ease::Power1In => f.write_str("power1.in"),
            Ease::Power1Out => f.write_str("power1.out"),
            Ease::Power1InOut => f.write_str("power1.inOut"),
            Ease::Power2Out => f.write_str("power2.out"),
            Ease::Power2InOut => f.write_str("power2.inOut"),
            Ease::Power3Out => f.write_str("power3.out"),
            Ease::SineInOut => f.write_str("sine.inOut"),
            Ease::BackOut(s) => write!(f, "back.out({s})"),
        }
    }
}

/// Unknown easing name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing `{0}`")]
pub struct UnknownEase(pub String);

impl FromStr for Ease {
    type Err = UnknownEase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(rest) = name.strip_prefix("back.out") {
            if rest.is_empty() {
                return Ok(Ease::BackOut(BACK_OVERSHOOT));
            }
            return rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .and_then(|arg| arg.trim().parse::<f64>().ok())
                .map(Ease::BackOut)
                .ok_or_else(|| UnknownEase(name.to_string()));
        }
        match name {
            "none" | "linear" => Ok(Ease::Linear),
            "power1.in" => Ok(Ease::Power1In),
            "power1.out" => Ok(Ease::Power1Out),
            "power1.inOut" => Ok(Ease::Power1InOut),
            "power2.out" => Ok(Ease::Power2Out),
            "power2.inOut" => Ok(Ease::Power2InOut),
            "power3.out" => Ok(Ease::Power3Out),
            "sine.inOut" => Ok(Ease::SineInOut),
            other => Err(UnknownEase(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[Ease] = &[
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2Out,
        Ease::Power2InOut,
        Ease::Power3Out,
        Ease::SineInOut,
        Ease::BackOut(1.7),
    ];

    #[test]
    fn endpoints_are_exact() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease}");
            assert_eq!(ease.apply(-3.0), 0.0, "{ease}");
            assert_eq!(ease.apply(7.0), 1.0, "{ease}");
        }
    }

    #[test]
    fn in_out_is_symmetric_at_midpoint() {
        assert!((Ease::Power1InOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((Ease::SineInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut(1.7).apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn names_round_trip() {
        for ease in ALL {
            let parsed: Ease = ease.to_string().parse().unwrap();
            assert_eq!(&parsed, ease);
        }
        assert_eq!("back.out".parse::<Ease>().unwrap(), Ease::BackOut(BACK_OVERSHOOT));
        assert!("bounce.out".parse::<Ease>().is_err());
        assert!("back.out(x)".parse::<Ease>().is_err());
    }
}
