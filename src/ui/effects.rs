//! Header, stat counters and confetti.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::effects::{
    badge::Badge, banner::Banner, confetti::ConfettiBurst, counter::Counter, demo::DemoDots,
    typewriter::Typewriter,
};
use crate::core::surface::Surface;

use super::layout::rect_from_bounds;
use super::theme::{hsl, Theme};

const BADGE_LABEL: &str = "★ Deck master";

/// Title, badge, demo dots and the typed-out tagline.
pub struct HeaderWidget<'a> {
    pub surface: &'a dyn Surface,
    pub banner: &'a Banner,
    pub typewriter: &'a Typewriter,
    pub badge: &'a Badge,
    pub demo: &'a DemoDots,
}

impl Widget for HeaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut title = title_spans(self.banner, self.surface);
        if let Some(badge) = badge_text(self.badge, self.surface) {
            title.push(badge);
        }

        let typed = self.typewriter.visible(self.surface);
        let mut tagline = vec![Span::raw(" "), Span::styled(typed, Theme::tagline_style())];
        if typed.len() < self.typewriter.text().len() {
            tagline.push(Span::styled("▌", Theme::tagline_style()));
        }

        Paragraph::new(vec![Line::from(title), Line::from(tagline)]).render(area, buf);
        render_dots(self.demo, self.surface, area, buf);
    }
}

/// The title as the banner currently shows it.  While it is still above
/// its row or nearly transparent the space stays blank; while it grows the
/// name is revealed in proportion to its scale.  The shine lights one
/// column.
fn title_spans(banner: &Banner, surface: &dyn Surface) -> Vec<Span<'static>> {
    let name = format!(" {} ", env!("CARGO_PKG_NAME"));
    let total = name.chars().count();
    let opacity = banner.opacity(surface);
    let t = banner.transform(surface);
    if opacity < 0.05 || t.dy.round() < 0.0 {
        return vec![Span::raw(" ".repeat(total))];
    }

    let shown = ((t.sx.min(1.0) * total as f64).round() as usize).clamp(1, total);
    let glowing = banner.is_glowing(surface) || t.sx > 1.01;
    let style = Theme::title(opacity, glowing);
    let shine = banner.shine_column(surface, total);

    let mut spans = Vec::with_capacity(3);
    let mut run = String::new();
    for (i, ch) in name.chars().enumerate() {
        if i >= shown {
            run.push(' ');
        } else if shine == Some(i) {
            if !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), style));
            }
            spans.push(Span::styled(ch.to_string(), style.add_modifier(Modifier::REVERSED)));
        } else {
            run.push(ch);
        }
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, style));
    }
    spans
}

/// The badge label revealed in proportion to its pop scale.  Overshoot
/// past full size draws it bold.
fn badge_text(badge: &Badge, surface: &dyn Surface) -> Option<Span<'static>> {
    let opacity = surface.opacity(badge.id()).unwrap_or(0.0);
    let scale = badge.scale(surface);
    if opacity <= 0.0 || scale <= 0.0 {
        return None;
    }
    let total = BADGE_LABEL.chars().count();
    let shown = ((scale * total as f64).round() as usize).clamp(1, total);
    let label: String = BADGE_LABEL.chars().take(shown).collect();
    let mut style = Style::default().fg(Theme::faded(Theme::BADGE, opacity));
    if scale > 1.02 {
        style = style.add_modifier(Modifier::BOLD);
    }
    Some(Span::styled(format!(" {label} "), style))
}

/// Demo dots sit at the right end of the first header row, two columns
/// apart, each nudged by its own transform.
fn render_dots(demo: &DemoDots, surface: &dyn Surface, area: Rect, buf: &mut Buffer) {
    let span = 2 * demo.dots().len() as i32;
    if area.width == 0 || area.height == 0 || i32::from(area.width) <= span {
        return;
    }
    let left = i32::from(area.right()) - span;
    for (i, dot) in demo.dots().into_iter().enumerate() {
        let opacity = surface.opacity(dot).unwrap_or(1.0);
        if opacity <= 0.0 {
            continue;
        }
        let t = surface.transform(dot).unwrap_or_default();
        let x = left + 2 * i as i32 + t.dx.round() as i32;
        let y = i32::from(area.y) + t.dy.round() as i32;
        if x < i32::from(area.x)
            || x >= i32::from(area.right())
            || y < i32::from(area.y)
            || y >= i32::from(area.bottom())
        {
            continue;
        }
        let glyph = if t.sx < 0.95 { '•' } else { '●' };
        if let Some(cell) = buf.cell_mut(Position::new(x as u16, y as u16)) {
            cell.set_char(glyph).set_fg(Theme::faded(Theme::DEMO_DOT, opacity));
        }
    }
}

/// Row of counting-up stats.  Each slides from its own side and fades in.
pub struct StatsWidget<'a> {
    pub surface: &'a dyn Surface,
    pub counters: &'a [Counter],
}

impl Widget for StatsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut cursor = i32::from(area.x);
        for counter in self.counters {
            let opacity = counter.opacity(self.surface);
            let t = counter.transform(self.surface);
            let label = format!(" {} ", counter.label);
            let value = counter.display(self.surface).to_string();
            let width = (label.chars().count() + value.len() + 2) as i32;

            let x = (cursor + t.dx.round() as i32)
                .clamp(i32::from(area.x), i32::from(area.right()) - 1) as u16;
            let line = Line::from(vec![
                Span::styled(label, Theme::stat_label(opacity)),
                Span::styled(value, Theme::stat_value(opacity, t.sx > 1.01)),
            ]);
            buf.set_line(x, area.y, &line, area.right() - x);
            cursor += width;
        }
    }
}

/// Every live confetti burst.
pub struct ConfettiWidget<'a> {
    pub surface: &'a dyn Surface,
    pub bursts: &'a [ConfettiBurst],
}

impl Widget for ConfettiWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for burst in self.bursts {
            let opacity = burst.opacity(self.surface);
            if opacity <= 0.0 {
                continue;
            }
            for p in burst.particles() {
                let Some(rect) = self
                    .surface
                    .measure(p.id)
                    .and_then(|b| rect_from_bounds(b, area))
                else {
                    continue;
                };
                let fg = Theme::faded(hsl(p.hue, 0.8, 0.6), opacity);
                if let Some(cell) = buf.cell_mut(Position::new(rect.x, rect.y)) {
                    cell.set_char(p.glyph(self.surface)).set_fg(fg);
                }
            }
        }
    }
}
