//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer reads the *core* surface as it stands after the latest engine
//! tick and turns it into terminal cells.  No tweening happens here.

pub mod detail;
pub mod effects;
pub mod grid_widget;
pub mod halfblocks;
pub mod layout;
pub mod popup;
pub mod theme;

use ratatui::{widgets::Paragraph, Frame};

use crate::app::state::{ActiveView, AppState};
use crate::core::surface::Surface;

use self::detail::DetailWidget;
use self::effects::{ConfettiWidget, HeaderWidget, StatsWidget};
use self::grid_widget::DeckWidget;
use self::layout::{bounds_from_rect, rect_from_bounds, AppLayout};
use self::theme::Theme;

/// Draw one frame.  Also feeds the current terminal size back into the
/// surface and records the detail view's hit zones.
pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    let layout = AppLayout::from_area(area);
    state.resize(bounds_from_rect(area), bounds_from_rect(layout.grid_area));

    frame.render_widget(
        HeaderWidget {
            surface: &state.surface,
            banner: &state.banner,
            typewriter: &state.typewriter,
            badge: &state.badge,
            demo: &state.demo,
        },
        layout.header_area,
    );
    frame.render_widget(
        StatsWidget {
            surface: &state.surface,
            counters: &state.counters,
        },
        layout.stats_area,
    );

    let cards = state
        .order()
        .into_iter()
        .filter_map(|id| state.card(id).map(|card| (id, card)))
        .collect();
    frame.render_widget(
        DeckWidget {
            cards,
            surface: &state.surface,
            selected: state.selected,
        },
        layout.grid_area,
    );

    state.detail_close_rect = None;
    let detail = state.gallery.detail();
    if let (Some(content), Some(bounds)) = (
        state.gallery.visible_content(&state.surface),
        state.surface.measure(detail),
    ) {
        if let Some(panel) = rect_from_bounds(bounds, area) {
            let image = content
                .image
                .as_deref()
                .and_then(|p| state.image(p))
                .map(|img| img.as_ref());
            let zones = DetailWidget {
                content,
                panel,
                opacity: state.surface.opacity(detail).unwrap_or(1.0),
                image,
            }
            .render_and_hit(area, frame.buffer_mut());
            state.detail_close_rect = Some(bounds_from_rect(zones.close_rect));
        }
    }

    frame.render_widget(
        ConfettiWidget {
            surface: &state.surface,
            bursts: &state.confetti,
        },
        area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Deck => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(
                popup::SettingsPopup {
                    state: &*state,
                    selected: state.settings_selected,
                },
                area,
            );
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                area,
            );
        }
        ActiveView::Deck => {}
    }
}
