//! Layout helpers — split the terminal area into regions and convert
//! between surface geometry and terminal cells.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::core::geometry::Bounds;

/// Primary screen layout: header, stat counters, the card grid and a
/// bottom status bar.
pub struct AppLayout {
    pub header_area: Rect,
    pub stats_area: Rect,
    pub grid_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // title + tagline
                Constraint::Length(1), // counters
                Constraint::Min(3),    // card grid (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            header_area: chunks[0],
            stats_area: chunks[1],
            grid_area: inset(chunks[2], 1, 1),
            status_area: chunks[3],
        }
    }
}

fn inset(r: Rect, dx: u16, dy: u16) -> Rect {
    Rect::new(
        r.x.saturating_add(dx),
        r.y.saturating_add(dy),
        r.width.saturating_sub(dx * 2),
        r.height.saturating_sub(dy),
    )
}

pub fn bounds_from_rect(r: Rect) -> Bounds {
    Bounds::new(f64::from(r.x), f64::from(r.y), f64::from(r.width), f64::from(r.height))
}

/// Snap `b` to whole cells and clip it to `clip`.  `None` when nothing of
/// it is left on screen.
pub fn rect_from_bounds(b: Bounds, clip: Rect) -> Option<Rect> {
    if !(b.x.is_finite() && b.y.is_finite() && b.width.is_finite() && b.height.is_finite()) {
        return None;
    }
    let left = b.x.round().max(f64::from(clip.left()));
    let top = b.y.round().max(f64::from(clip.top()));
    let right = (b.x + b.width).round().min(f64::from(clip.right()));
    let bottom = (b.y + b.height).round().min(f64::from(clip.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}
