//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::flip::Strategy;
use crate::core::surface::Surface;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Deck => handle_deck_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Deck view (configurable bindings) ───────────────────────────

fn handle_deck_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::MoveLeft => move_and_follow(state, -1),
        Action::MoveRight => move_and_follow(state, 1),
        Action::MoveUp => {
            let cols = state.columns() as isize;
            move_and_follow(state, -cols);
        }
        Action::MoveDown => {
            let cols = state.columns() as isize;
            move_and_follow(state, cols);
        }
        Action::OpenCard => {
            state.open_selected();
        }
        Action::CloseDetail => {
            state.close_detail();
        }
        Action::Shuffle => {
            state.flip(Strategy::Shuffle);
        }
        Action::Sort => {
            state.flip(Strategy::Sort);
        }
        Action::ClaimBadge => state.claim_badge(),
        Action::ReplayDemo => state.replay_demo(),
        Action::ToggleMotion => state.toggle_motion(),
    }
}

/// Move the selection; an open detail view follows it to the new card.
fn move_and_follow(state: &mut AppState, delta: isize) {
    let before = state.selected;
    state.move_selection(delta);
    if state.gallery.is_open() && state.selected != before {
        state.open_selected();
    }
}

// ── Settings menu (hardcoded navigation) ────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Deck;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Deck;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" row.
                state.config.reset_defaults();
                state.save_config();
                state.status_message = Some("Controls reset to defaults".into());
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.clear_bindings(action);
                state.save_config();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Ctrl+C stays reserved for quitting.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    let bind = KeyBind::from_key_event(key);
    state.status_message = Some(format!("{} → {}", action.label(), bind.display()));
    state.config.add_binding(action, bind);
    state.save_config();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Only the deck view reacts to the mouse.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Deck {
        return;
    }
    let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.gallery.is_open() {
                handle_detail_click(state, x, y);
                return;
            }
            if let Some(card) = state.card_at(x, y) {
                state.selected = Some(card);
                state.open_selected();
            }
        }
        MouseEventKind::ScrollUp => move_and_follow(state, -1),
        MouseEventKind::ScrollDown => move_and_follow(state, 1),
        _ => {}
    }
}

/// Clicks while the detail view is up: the close button and the scrim
/// around the panel both close it.
fn handle_detail_click(state: &mut AppState, x: f64, y: f64) {
    if state.detail_close_rect.is_some_and(|r| r.contains(x, y)) {
        state.close_detail();
        return;
    }
    let inside = state
        .surface
        .measure(state.gallery.detail())
        .is_some_and(|b| b.contains(x, y));
    if !inside {
        state.close_detail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::deck::Deck;
    use crate::core::engine::Engine;
    use crate::core::geometry::Bounds;
    use crate::core::settings::{MotionSettings, SharedSettings};
    use crossterm::event::KeyEventState;

    fn state() -> AppState {
        let settings = SharedSettings::new(MotionSettings::new(true));
        let mut s = AppState::new(
            Deck::builtin(),
            AppConfig::default(),
            settings,
            Engine::new(60).unwrap(),
            Some(7),
        );
        s.resize(Bounds::new(0.0, 0.0, 120.0, 40.0), Bounds::new(0.0, 4.0, 120.0, 35.0));
        s
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);

        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(
            &mut s,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(s.should_quit);
    }

    #[test]
    fn sort_key_orders_cards() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('s')));
        handle_key(&mut s, press(KeyCode::Char('o')));
        let keys: Vec<String> = s
            .order()
            .iter()
            .filter_map(|&id| s.card(id))
            .map(|c| c.key.clone())
            .collect();
        let mut collator = feruca::Collator::default();
        let mut sorted = keys.clone();
        sorted.sort_by(|a, b| crate::core::flip::compare_keys(&mut collator, a, b));
        assert_eq!(keys, sorted);
    }

    #[test]
    fn demo_key_asks_for_motion_when_reduced() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('d')));
        assert!(!s.engine.is_active());
        assert_eq!(s.status_message.as_deref(), Some("Demo needs motion on"));
    }

    #[test]
    fn enter_opens_and_esc_closes() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.gallery.is_open());
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.gallery.is_open());
        assert!(!s.surface.is_visible(s.gallery.detail()));
    }

    #[test]
    fn moving_while_open_follows_selection() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Enter));
        handle_key(&mut s, press(KeyCode::Right));
        let selected = s.selected.unwrap();
        let title = s.card(selected).unwrap().title.clone();
        assert_eq!(s.gallery.visible_content(&s.surface).unwrap().title, title);
    }

    #[test]
    fn down_moves_one_row() {
        let mut s = state();
        let cols = s.columns();
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.selected, Some(s.order()[cols]));
    }

    #[test]
    fn settings_menu_navigation() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.active_view, ActiveView::ControlsSubmenu);
        handle_key(&mut s, press(KeyCode::Left));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        for _ in 0..50 {
            handle_key(&mut s, press(KeyCode::Down));
        }
        assert_eq!(s.settings_selected, SETTINGS_ITEMS.len() - 1);
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Deck);
    }

    #[test]
    fn rebind_esc_cancels() {
        let mut s = state();
        s.active_view = ActiveView::ControlsSubmenu;
        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.awaiting_rebind);
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.awaiting_rebind);
        assert_eq!(s.active_view, ActiveView::ControlsSubmenu);
    }

    #[test]
    fn clicking_a_card_opens_it_and_scrim_closes() {
        let mut s = state();
        let third = s.order()[2];
        let b = s.surface.measure(third).unwrap();
        handle_mouse(&mut s, click(b.x as u16 + 1, b.y as u16 + 1));
        assert_eq!(s.selected, Some(third));
        assert!(s.gallery.is_open());

        // Inside the panel: stays open.
        let panel = s.surface.measure(s.gallery.detail()).unwrap();
        let (cx, cy) = panel.center();
        handle_mouse(&mut s, click(cx as u16, cy as u16));
        assert!(s.gallery.is_open());

        handle_mouse(&mut s, click(0, 0));
        assert!(!s.gallery.is_open());
    }

    #[test]
    fn mouse_ignored_outside_deck_view() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        let first = s.order()[0];
        let b = s.surface.measure(first).unwrap();
        handle_mouse(&mut s, click(b.x as u16 + 1, b.y as u16 + 1));
        assert!(!s.gallery.is_open());
    }
}
