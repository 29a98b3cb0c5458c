//! Half-block image rendering.

use image::imageops::FilterType;
use ratatui::{buffer::Buffer, layout::Position, layout::Rect, style::Color};

/// Draw `thumb` into `area` using `▀` cells: each cell carries two pixels,
/// the top one as foreground and the bottom one as background.  The image is
/// scaled to fit (never up) and centred horizontally.
pub fn render_halfblocks(thumb: &image::RgbaImage, area: Rect, buf: &mut Buffer) {
    let Some((w, h)) = fit(thumb.width(), thumb.height(), area) else {
        return;
    };
    let rgba = image::imageops::resize(thumb, w, h, FilterType::Triangle);
    let col_offset = area.width.saturating_sub(w as u16) / 2;

    for row in 0..area.height {
        let yt = u32::from(row) * 2;
        let yb = yt + 1;
        if yt >= h {
            break;
        }
        for col in 0..w.min(u32::from(area.width)) {
            let t = rgba.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < h {
                let b = rgba.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                Color::Reset
            };
            let at = Position::new(area.x + col_offset + col as u16, area.y + row);
            if let Some(cell) = buf.cell_mut(at) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}

/// Pixel size that fits `src_w × src_h` into `area` (one pixel per column,
/// two per row) without upscaling.
fn fit(src_w: u32, src_h: u32, area: Rect) -> Option<(u32, u32)> {
    if area.width == 0 || area.height == 0 || src_w == 0 || src_h == 0 {
        return None;
    }
    let max_w = f64::from(area.width);
    let max_h = f64::from(area.height) * 2.0;
    let scale = (max_w / f64::from(src_w)).min(max_h / f64::from(src_h)).min(1.0);
    let w = (f64::from(src_w) * scale).round().max(1.0) as u32;
    let h = (f64::from(src_h) * scale).round().max(1.0) as u32;
    Some((w, h))
}
