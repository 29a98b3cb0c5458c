//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};
use crate::core::easing::Ease;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }
}

const FLIP_DURATIONS: &[u64] = &[250, 350, 450, 600, 800];
const FLIP_STAGGERS: &[u64] = &[0, 15, 25, 40, 60];
const DETAIL_DURATIONS: &[u64] = &[250, 400, 600, 800];
const FLIP_EASES: &[Ease] = &[
    Ease::Power1InOut,
    Ease::Power2InOut,
    Ease::SineInOut,
    Ease::Power3Out,
    Ease::Linear,
];

/// The value after `current` in `values`, wrapping.  Unknown values restart
/// from the first entry.
fn next_in<T: Copy + PartialEq>(values: &[T], current: T) -> T {
    match values.iter().position(|v| *v == current) {
        Some(idx) => values[(idx + 1) % values.len()],
        None => values[0],
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Motion",
        get: |s| s.settings.read().motion_enabled,
        set: |s, v| {
            if s.settings.read().motion_enabled != v {
                s.toggle_motion();
            }
        },
    },
    SettingsItem::Cycle {
        label: "Flip Duration",
        value: |s| format!("{}ms", s.config.flip_duration_ms),
        cycle: |s| {
            s.config.flip_duration_ms = next_in(FLIP_DURATIONS, s.config.flip_duration_ms);
            s.apply_config();
            s.status_message = Some(format!("Flip duration: {}ms", s.config.flip_duration_ms));
        },
    },
    SettingsItem::Cycle {
        label: "Flip Stagger",
        value: |s| format!("{}ms", s.config.flip_stagger_ms),
        cycle: |s| {
            s.config.flip_stagger_ms = next_in(FLIP_STAGGERS, s.config.flip_stagger_ms);
            s.apply_config();
            s.status_message = Some(format!("Flip stagger: {}ms", s.config.flip_stagger_ms));
        },
    },
    SettingsItem::Cycle {
        label: "Flip Ease",
        value: |s| s.config.flip_ease.to_string(),
        cycle: |s| {
            s.config.flip_ease = next_in(FLIP_EASES, s.config.flip_ease);
            s.apply_config();
            s.status_message = Some(format!("Flip ease: {}", s.config.flip_ease));
        },
    },
    SettingsItem::Cycle {
        label: "Detail Duration",
        value: |s| format!("{}ms", s.config.detail_duration_ms),
        cycle: |s| {
            s.config.detail_duration_ms = next_in(DETAIL_DURATIONS, s.config.detail_duration_ms);
            s.apply_config();
            s.status_message = Some(format!(
                "Detail duration: {}ms",
                s.config.detail_duration_ms
            ));
        },
    },
];
