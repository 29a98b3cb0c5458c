//! Card detail overlay.
//!
//! Draws the open (or closing) card's panel at the detail element's current
//! bounds: title bar with a close button, the card image if there is one,
//! then the text.  The rest of the screen is dimmed while it is up.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::core::gallery::DetailContent;

use super::halfblocks::render_halfblocks;
use super::theme::Theme;

/// Rows reserved for text under an image.
const TEXT_ROWS: u16 = 4;

/// The detail overlay widget.
pub struct DetailWidget<'a> {
    pub content: &'a DetailContent,
    /// Panel position on screen, already clipped.
    pub panel: Rect,
    pub opacity: f64,
    /// Decoded card image, when the card has one and it loaded.
    pub image: Option<&'a image::RgbaImage>,
}

/// Clickable regions returned after rendering, for mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct DetailHitZones {
    pub close_rect: Rect,
}

impl DetailWidget<'_> {
    /// Render and return hit zones for mouse interaction.
    pub fn render_and_hit(self, terminal_area: Rect, buf: &mut Buffer) -> DetailHitZones {
        if self.opacity > 0.5 {
            buf.set_style(terminal_area, Style::default().add_modifier(Modifier::DIM));
        }

        let area = self.panel;
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::card_border(true, self.opacity))
            .title(Span::styled(
                format!(" {} ", self.content.title),
                Theme::card_title(self.opacity),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        // Close button [X] on the top-right corner of the border.
        let close_rect =
            Rect::new(area.x + area.width.saturating_sub(5), area.y, 3, 1).intersection(area);
        Paragraph::new(Line::from(Span::styled(
            "[X]",
            Style::default()
                .fg(Theme::faded((250, 110, 110), self.opacity))
                .add_modifier(Modifier::BOLD),
        )))
        .render(close_rect, buf);

        let mut text_area = inner;
        if let Some(thumb) = self.image {
            let img_h = inner.height.saturating_sub(TEXT_ROWS + 1);
            if img_h > 1 && inner.width > 2 {
                let picture = Rect::new(inner.x + 1, inner.y, inner.width - 2, img_h);
                render_halfblocks(thumb, picture, buf);
                text_area = Rect::new(inner.x, inner.y + img_h, inner.width, inner.height - img_h);
            }
        }
        // Keep one row for the footer.
        let body = Rect::new(
            text_area.x.saturating_add(1),
            text_area.y,
            text_area.width.saturating_sub(2),
            text_area.height.saturating_sub(1),
        );
        Paragraph::new(self.content.text.as_str())
            .style(Theme::card_style(self.opacity))
            .wrap(Wrap { trim: true })
            .render(body, buf);

        if inner.height > 0 {
            let footer_y = inner.y + inner.height - 1;
            Paragraph::new(Line::from(Span::styled(
                " ←/→ next card   Esc close ",
                Theme::hint_style(),
            )))
            .render(Rect::new(inner.x, footer_y, inner.width, 1), buf);
        }

        DetailHitZones { close_rect }
    }
}
