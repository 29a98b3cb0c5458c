//! Process-wide motion settings.
//!
//! The reduced-motion preference is read once at startup; the settings menu
//! may flip `motion_enabled` later.  Every feature derives its durations
//! from here, so turning motion off collapses them all to zero.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::easing::Ease;
use super::engine::Timing;
use super::flip::FlipTiming;

/// Environment variable that requests reduced motion when set to anything
/// other than empty, `0` or `false`.
pub const REDUCED_MOTION_ENV: &str = "FLIPDECK_REDUCED_MOTION";

/// Tunable motion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub motion_enabled: bool,
    pub flip_duration: Duration,
    pub flip_stagger: Duration,
    pub flip_ease: Ease,
    pub detail_duration: Duration,
    pub fade_duration: Duration,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            motion_enabled: true,
            flip_duration: Duration::from_millis(450),
            flip_stagger: Duration::from_millis(25),
            flip_ease: Ease::Power1InOut,
            detail_duration: Duration::from_millis(400),
            fade_duration: Duration::from_millis(250),
        }
    }
}

impl MotionSettings {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            motion_enabled: !reduced_motion,
            ..Self::default()
        }
    }

    /// `d` when motion is on, zero otherwise.
    pub fn gate(&self, d: Duration) -> Duration {
        if self.motion_enabled {
            d
        } else {
            Duration::ZERO
        }
    }

    pub fn flip_timing(&self) -> FlipTiming {
        FlipTiming {
            duration: self.gate(self.flip_duration),
            stagger: self.gate(self.flip_stagger),
            ease: self.flip_ease,
        }
    }

    /// Detail-view open transition.
    pub fn detail_timing(&self) -> Timing {
        Timing::new(self.gate(self.detail_duration), Ease::Power2InOut)
    }

    /// Detail-view close fade.
    pub fn fade_timing(&self) -> Timing {
        Timing::new(self.gate(self.fade_duration), Ease::Power1Out)
    }
}

/// Shared handle to the one settings object.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Arc<RwLock<MotionSettings>>);

impl SharedSettings {
    pub fn new(settings: MotionSettings) -> Self {
        Self(Arc::new(RwLock::new(settings)))
    }

    /// Snapshot of the current settings.
    pub fn read(&self) -> MotionSettings {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut MotionSettings)) {
        let mut guard = match self.0.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

/// Read the host's reduced-motion preference from the environment.
pub fn reduced_motion_from_env() -> bool {
    std::env::var(REDUCED_MOTION_ENV).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_zeroes_every_duration() {
        let s = MotionSettings::new(true);
        let flip = s.flip_timing();
        assert_eq!(flip.duration, Duration::ZERO);
        assert_eq!(flip.stagger, Duration::ZERO);
        assert!(s.detail_timing().is_instant());
        assert!(s.fade_timing().is_instant());
    }

    #[test]
    fn shared_updates_are_visible_to_clones() {
        let shared = SharedSettings::new(MotionSettings::default());
        let other = shared.clone();
        other.update(|s| s.motion_enabled = false);
        assert!(!shared.read().motion_enabled);
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
    }
}
