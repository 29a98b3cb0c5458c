//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
    pub selected: usize,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::raw("")];
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let (marker, style) = row_style(i == self.selected);
            let (suffix, suffix_style) = match item {
                SettingsItem::Submenu { .. } => ("  ›".to_string(), dim()),
                SettingsItem::Toggle { get, .. } if get(self.state) => {
                    ("  [ON]".to_string(), Style::default().fg(Color::Green))
                }
                SettingsItem::Toggle { .. } => ("  [OFF]".to_string(), dim()),
                SettingsItem::Cycle { value, .. } => (
                    format!("  {}", value(self.state)),
                    Style::default().fg(Color::Yellow),
                ),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{:<18}", item.label()), style),
                Span::styled(suffix, suffix_style),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled("  Enter/Space: change  Esc: close", dim()));

        render_framed(" Settings ", 44, lines, area, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Actions grouped the way the controls popup lists them.  Flattened, the
/// groups are exactly `Action::ALL` in order, so row indices line up with
/// the handler's selection.
const GROUPS: &[(&str, &[Action])] = &[
    (
        "Cards",
        &[
            Action::MoveLeft,
            Action::MoveRight,
            Action::MoveUp,
            Action::MoveDown,
            Action::OpenCard,
            Action::CloseDetail,
            Action::Shuffle,
            Action::Sort,
        ],
    ),
    ("Effects", &[Action::ClaimBadge, Action::ReplayDemo]),
    (
        "App",
        &[Action::ToggleMotion, Action::OpenSettings, Action::Quit],
    ),
];

const RESET_LABEL: &str = "⟳ Reset to defaults";
const CONTROLS_HINT: &str = "  Enter: add key  Del: clear  Esc: back";

/// Keybinding popup: every action with its keys, then the reset row.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl ControlsPopup<'_> {
    fn keys(&self, row: usize, action: Action) -> String {
        if row == self.selected && self.awaiting_rebind {
            "Press a key…".to_string()
        } else {
            self.config.display_bindings(action)
        }
    }
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label_width = Action::ALL.iter().map(|a| a.label().chars().count()).max().unwrap_or(0);
        let keys_width = Action::ALL
            .iter()
            .enumerate()
            .map(|(row, &a)| self.keys(row, a).chars().count())
            .max()
            .unwrap_or(0);
        // marker + label + gap + keys + right margin, inside the borders
        let content_width = 3 + label_width + 2 + keys_width + 1;
        let width = (content_width as u16 + 2).max(CONTROLS_HINT.chars().count() as u16 + 4);
        let inner_width = usize::from(width - 2);

        let mut lines = Vec::new();
        let mut row = 0;
        for (heading, actions) in GROUPS {
            lines.push(Line::styled(format!(" {heading}"), dim().add_modifier(Modifier::BOLD)));
            for &action in *actions {
                let selected = row == self.selected;
                let (marker, style) = row_style(selected);
                let label = format!("{marker}{:<label_width$}", action.label());
                let pad = inner_width.saturating_sub(label.chars().count()).max(1);
                let mut key_style = style.fg(Color::Yellow);
                if !(selected && self.awaiting_rebind) {
                    key_style = key_style.remove_modifier(Modifier::BOLD);
                }
                lines.push(Line::from(vec![
                    Span::styled(label, style),
                    Span::styled(format!("{:>pad$}", self.keys(row, action)), key_style),
                ]));
                row += 1;
            }
        }

        let (marker, style) = row_style(self.selected == Action::ALL.len());
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!("{marker}{RESET_LABEL}"), style));
        lines.push(Line::raw(""));
        lines.push(Line::styled(CONTROLS_HINT, dim()));

        render_framed(" Controls ", width, lines, area, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Selection marker and row style.
fn row_style(selected: bool) -> (&'static str, Style) {
    if selected {
        (
            " ▸ ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("   ", Style::default().fg(Color::White))
    }
}

/// Clear a centred box just tall enough for `lines` and draw them inside a
/// rounded, titled border.
fn render_framed(title: &str, width: u16, lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16 + 2;
    let popup = centered_fixed(width, height, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(dim());
    let inner = block.inner(popup);
    block.render(popup, buf);
    Paragraph::new(lines).render(inner, buf);
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::Deck;
    use crate::core::engine::Engine;
    use crate::core::settings::{MotionSettings, SharedSettings};

    fn screen_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn settings_popup_shows_current_values() {
        let config = AppConfig::default();
        let state = AppState::new(
            Deck::builtin(),
            config,
            SharedSettings::new(MotionSettings::new(false)),
            Engine::new(60).unwrap(),
            Some(1),
        );
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        SettingsPopup { state: &state, selected: 0 }.render(area, &mut buf);
        let text = screen_text(&buf);
        assert!(text.contains("Controls"));
        assert!(text.contains("[ON]"));
        assert!(text.contains("450ms"));
        assert!(text.contains("power1.inOut"));
    }

    #[test]
    fn controls_popup_prompts_while_rebinding() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        ControlsPopup {
            config: &config,
            selected: 0,
            awaiting_rebind: true,
        }
        .render(area, &mut buf);
        let text = screen_text(&buf);
        assert!(text.contains("Press a key"));
        assert!(text.contains("Reset to defaults"));
    }

    #[test]
    fn groups_list_every_action_in_order() {
        let flat: Vec<Action> = GROUPS.iter().flat_map(|(_, a)| a.iter().copied()).collect();
        assert_eq!(flat, Action::ALL);
    }

    #[test]
    fn controls_popup_fits_every_row_and_marks_the_selection() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        let selected = Action::ALL
            .iter()
            .position(|&a| a == Action::ReplayDemo)
            .unwrap();
        ControlsPopup {
            config: &config,
            selected,
            awaiting_rebind: false,
        }
        .render(area, &mut buf);
        let text = screen_text(&buf);
        for heading in ["Cards", "Effects", "App"] {
            assert!(text.contains(heading));
        }
        for action in Action::ALL {
            assert!(text.contains(action.label()), "{} missing", action.label());
        }
        assert!(text.contains(CONTROLS_HINT.trim()));
        let marked: Vec<&str> = text.lines().filter(|l| l.contains('▸')).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("Replay Demo"));
        assert!(marked[0].contains(&config.display_bindings(Action::ReplayDemo)));
    }

    #[test]
    fn centered_fixed_clamps_to_area() {
        assert_eq!(
            centered_fixed(40, 10, Rect::new(0, 0, 100, 30)),
            Rect::new(30, 10, 40, 10)
        );
        assert_eq!(centered_fixed(40, 10, Rect::new(0, 0, 20, 5)), Rect::new(0, 0, 20, 5));
    }
}
