//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// An RGB triple that can be faded toward the background.
pub type Rgb = (u8, u8, u8);

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub const CARD_FG: Rgb = (220, 220, 220);
    pub const CARD_BORDER: Rgb = (110, 110, 120);
    pub const CARD_SELECTED: Rgb = (90, 200, 230);
    pub const CARD_TITLE: Rgb = (240, 200, 90);
    pub const BADGE: Rgb = (250, 210, 60);

    // ── header ─────────────────────────────────────────────────
    pub const TITLE: Rgb = (80, 200, 110);
    pub const TITLE_GLOW: Rgb = (170, 255, 190);
    pub const STAT_LABEL: Rgb = (128, 128, 128);
    pub const STAT_VALUE: Rgb = (80, 210, 230);
    pub const DEMO_DOT: Rgb = (230, 120, 200);

    /// Blend `rgb` toward black by `opacity` (0 = invisible, 1 = full).
    pub fn faded(rgb: Rgb, opacity: f64) -> Color {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |c: u8| (f64::from(c) * a).round() as u8;
        Color::Rgb(mix(rgb.0), mix(rgb.1), mix(rgb.2))
    }

    pub fn card_style(opacity: f64) -> Style {
        Style::default().fg(Self::faded(Self::CARD_FG, opacity))
    }

    pub fn card_border(selected: bool, opacity: f64) -> Style {
        let rgb = if selected { Self::CARD_SELECTED } else { Self::CARD_BORDER };
        let style = Style::default().fg(Self::faded(rgb, opacity));
        if selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn card_title(opacity: f64) -> Style {
        Style::default()
            .fg(Self::faded(Self::CARD_TITLE, opacity))
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title(opacity: f64, glowing: bool) -> Style {
        let rgb = if glowing { Self::TITLE_GLOW } else { Self::TITLE };
        Style::default()
            .fg(Self::faded(rgb, opacity))
            .add_modifier(Modifier::BOLD)
    }

    pub fn tagline_style() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::ITALIC)
    }

    pub fn stat_label(opacity: f64) -> Style {
        Style::default().fg(Self::faded(Self::STAT_LABEL, opacity))
    }

    /// Values are bold; a popping value is also underlined.
    pub fn stat_value(opacity: f64, popped: bool) -> Style {
        let style = Style::default()
            .fg(Self::faded(Self::STAT_VALUE, opacity))
            .add_modifier(Modifier::BOLD);
        if popped {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

/// HSL (degrees, 0–1, 0–1) to RGB.
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}
