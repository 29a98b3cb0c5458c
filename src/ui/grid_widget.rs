//! The card grid.
//!
//! Each card is drawn where the surface says it is *right now*, transform
//! included, so FLIP transitions show up as cards sliding across the grid.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::core::deck::Card;
use crate::core::surface::{ElementId, Surface};

use super::layout::rect_from_bounds;
use super::theme::Theme;

/// Below this a card is not drawn at all.
const MIN_OPACITY: f64 = 0.05;

pub struct DeckWidget<'a> {
    /// Cards in grid order with their data.
    pub cards: Vec<(ElementId, &'a Card)>,
    pub surface: &'a dyn Surface,
    pub selected: Option<ElementId>,
}

impl Widget for DeckWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Selected card last so it sits on top of anything sliding past it.
        let (selected, rest): (Vec<_>, Vec<_>) = self
            .cards
            .iter()
            .partition(|(id, _)| Some(*id) == self.selected);
        for &(id, card) in rest.into_iter().chain(selected) {
            let opacity = self.surface.opacity(id).unwrap_or(1.0);
            if opacity < MIN_OPACITY {
                continue;
            }
            let Some(rect) = self.surface.measure(id).and_then(|b| rect_from_bounds(b, area)) else {
                continue;
            };
            render_card(card, Some(id) == self.selected, opacity, rect, buf);
        }
    }
}

fn render_card(card: &Card, selected: bool, opacity: f64, rect: Rect, buf: &mut Buffer) {
    Clear.render(rect, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
        .border_style(Theme::card_border(selected, opacity))
        .title(Span::styled(format!(" {} ", card.title), Theme::card_title(opacity)));
    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 {
        return;
    }
    let mut lines = vec![Line::from(Span::styled(card.text.as_str(), Theme::card_style(opacity)))];
    if card.image.is_some() {
        lines.push(Line::from(Span::styled("▣ image", Theme::hint_style())));
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}
