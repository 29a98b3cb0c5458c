//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! The deck operations (flip, open, close, claim) are methods here so the
//! handler stays a thin key/mouse → operation mapping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{self, AppConfig};
use crate::core::{
    deck::{Card, Deck},
    easing::Ease,
    effects::{
        badge::Badge,
        banner::Banner,
        confetti::ConfettiBurst,
        counter::{Counter, Side},
        demo::DemoDots,
        typewriter::Typewriter,
    },
    engine::{stagger_delay, Engine, StaggerFrom, Timing},
    flip::{Reorderer, Strategy, TrackedElement, TransitionPlan},
    gallery::Gallery,
    geometry::{Bounds, Transform},
    settings::{MotionSettings, SharedSettings},
    surface::{ElementId, GridSurface, PropValue, Surface},
};

/// Card size in terminal cells.
pub const CARD_WIDTH: f64 = 24.0;
pub const CARD_HEIGHT: f64 = 5.0;
const CARD_GAP: (f64, f64) = (2.0, 1.0);

/// Intro cascade: cards rise into place from both ends of the grid.
const INTRO_EACH: Duration = Duration::from_millis(50);
const INTRO_DURATION: Duration = Duration::from_millis(350);
const INTRO_RISE: f64 = 2.0;

/// Longest edge of a decoded card image.
const THUMBNAIL_MAX: u32 = 256;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Deck,
    SettingsMenu,
    ControlsSubmenu,
}

/// Top-level application state.
pub struct AppState {
    /// Card data, indexed by the values of `card_index`.
    pub deck: Deck,
    /// Layout model every widget renders from.
    pub surface: GridSurface,
    pub engine: Engine,
    pub settings: SharedSettings,
    pub reorderer: Reorderer,
    pub gallery: Gallery,
    /// Surface element → index into `deck.cards`.
    pub card_index: HashMap<ElementId, usize>,
    /// Currently highlighted card.
    pub selected: Option<ElementId>,
    pub counters: Vec<Counter>,
    pub typewriter: Typewriter,
    pub banner: Banner,
    pub demo: DemoDots,
    pub badge: Badge,
    pub confetti: Vec<ConfettiBurst>,
    /// Whole terminal area, in cells.
    pub viewport: Bounds,
    pub rng: StdRng,
    /// Decoded card images.  `None` marks a file that failed to load so
    /// it is not retried every frame.
    pub images: HashMap<PathBuf, Option<Arc<image::RgbaImage>>>,
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub active_view: ActiveView,
    pub config: AppConfig,
    /// Where config changes are written.
    pub config_path: PathBuf,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Close button of the detail view as last drawn, for mouse hits.
    pub detail_close_rect: Option<Bounds>,
}

impl AppState {
    pub fn new(
        deck: Deck,
        config: AppConfig,
        settings: SharedSettings,
        engine: Engine,
        seed: Option<u64>,
    ) -> Self {
        let mut surface = GridSurface::new();
        let grid = surface.add_grid(
            Bounds::new(0.0, 0.0, 80.0, 20.0),
            (CARD_WIDTH, CARD_HEIGHT),
            CARD_GAP,
        );

        let mut card_index = HashMap::new();
        let mut tracked = Vec::with_capacity(deck.cards.len());
        for (i, card) in deck.cards.iter().enumerate() {
            if let Some(id) = surface.add_child(grid) {
                card_index.insert(id, i);
                tracked.push(TrackedElement::new(id, card.key.clone()));
            }
        }
        let selected = tracked.first().map(|t| t.id);
        let reorderer = Reorderer::new(grid, tracked);

        let gallery = Gallery::new(surface.add_free(Bounds::default()));
        let counters = deck
            .stats
            .iter()
            .map(|stat| {
                let id = surface.add_free(Bounds::default());
                Counter::new(id, &stat.label, stat.target)
            })
            .collect();
        let typewriter = Typewriter::new(surface.add_free(Bounds::default()), &deck.tagline);
        let banner = Banner::new(&mut surface);
        let demo = DemoDots::new(&mut surface);
        let badge_id = surface.add_free(Bounds::default());
        let badge = Badge::new(&mut surface, badge_id);

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            deck,
            surface,
            engine,
            settings,
            reorderer,
            gallery,
            card_index,
            selected,
            counters,
            typewriter,
            banner,
            demo,
            badge,
            confetti: Vec::new(),
            viewport: Bounds::new(0.0, 0.0, 80.0, 24.0),
            rng,
            images: HashMap::new(),
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            config,
            config_path: config::config_path(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            detail_close_rect: None,
        }
    }

    // ── queries ─────────────────────────────────────────────────

    /// Card elements in current grid order.
    pub fn order(&self) -> Vec<ElementId> {
        self.surface.children(self.reorderer.container()).unwrap_or_default()
    }

    pub fn card(&self, id: ElementId) -> Option<&Card> {
        self.card_index.get(&id).and_then(|&i| self.deck.cards.get(i))
    }

    /// Card under a terminal cell, topmost first.
    pub fn card_at(&self, x: f64, y: f64) -> Option<ElementId> {
        self.order()
            .into_iter()
            .rev()
            .find(|&id| self.surface.measure(id).is_some_and(|b| b.contains(x, y)))
    }

    pub fn image(&self, path: &Path) -> Option<&Arc<image::RgbaImage>> {
        self.images.get(path).and_then(Option::as_ref)
    }

    // ── layout ──────────────────────────────────────────────────

    /// Re-flow after the terminal size or layout changed.
    pub fn resize(&mut self, viewport: Bounds, grid_area: Bounds) {
        let grid = self.reorderer.container();
        if self.viewport == viewport && self.surface.grid_area(grid) == Some(grid_area) {
            return;
        }
        self.viewport = viewport;
        self.surface.set_grid_area(self.reorderer.container(), grid_area);
        self.gallery.relayout(&mut self.surface, &mut self.engine, viewport);
    }

    /// Start the intro: the banner drops in, cards rise in from the edges,
    /// stats slide in from alternating sides and count up, and the tagline
    /// types itself out.
    pub fn start_intro(&mut self) {
        let motion = self.settings.read();
        self.banner.entrance(&mut self.surface, &mut self.engine, &motion);
        let order = self.order();
        let count = order.len();
        for (i, id) in order.into_iter().enumerate() {
            let delay = stagger_delay(i, count, INTRO_EACH, StaggerFrom::Edges);
            let timing = Timing::new(motion.gate(INTRO_DURATION), Ease::Power1Out)
                .with_delay(motion.gate(delay));
            self.engine.from_to(
                &mut self.surface,
                id,
                PropValue::Opacity(0.0),
                PropValue::Opacity(1.0),
                timing,
                None,
            );
            self.engine.from_to(
                &mut self.surface,
                id,
                PropValue::Transform(Transform::translate(0.0, INTRO_RISE)),
                PropValue::Transform(Transform::IDENTITY),
                timing,
                None,
            );
        }
        let last = self.counters.len().saturating_sub(1);
        for (i, counter) in self.counters.iter().enumerate() {
            let side = if i % 2 == 0 { Side::Left } else { Side::Right };
            counter.slide_in(&mut self.surface, &mut self.engine, &motion, side, i == last);
            counter.start(&mut self.surface, &mut self.engine, &motion);
        }
        self.typewriter.start(&mut self.surface, &mut self.engine, &motion);
    }

    /// Advance every animation by one frame.
    pub fn tick(&mut self, dt: Duration) {
        self.engine.tick(dt, &mut self.surface);
        let (done, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.confetti)
            .into_iter()
            .partition(|burst| burst.is_finished(&self.surface));
        self.confetti = live;
        for burst in done {
            burst.dispose(&mut self.surface);
        }
    }

    // ── operations ──────────────────────────────────────────────

    /// Shuffle or sort the grid with a FLIP transition.  The selection
    /// follows its card.
    pub fn flip(&mut self, strategy: Strategy) -> TransitionPlan {
        let timing = self.settings.read().flip_timing();
        let plan = self.reorderer.flip_to(
            &mut self.surface,
            &mut self.engine,
            strategy,
            timing,
            &mut self.rng,
        );
        self.status_message = Some(match strategy {
            Strategy::Shuffle => format!("Shuffled {} cards", plan.len()),
            Strategy::Sort => format!("Sorted {} cards A→Z", plan.len()),
        });
        plan
    }

    /// Open (or re-target) the detail view on the selected card.
    pub fn open_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(content) = self.card(id).map(Card::detail) else {
            return false;
        };
        if let Some(path) = content.image.clone() {
            self.ensure_image(&path);
        }
        let timing = self.settings.read().detail_timing();
        self.gallery.open(
            &mut self.surface,
            &mut self.engine,
            id,
            content,
            self.viewport,
            timing,
        )
    }

    pub fn close_detail(&mut self) -> bool {
        let timing = self.settings.read().fade_timing();
        self.gallery.close(&mut self.surface, &mut self.engine, timing)
    }

    /// Move the selection by `delta` positions in grid order (clamped).
    pub fn move_selection(&mut self, delta: isize) {
        let order = self.order();
        if order.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| order.iter().position(|&o| o == id))
            .unwrap_or(0);
        let next = (current as isize + delta).clamp(0, order.len() as isize - 1) as usize;
        self.selected = Some(order[next]);
    }

    /// Grid columns at the current size, for vertical moves.
    pub fn columns(&self) -> usize {
        self.surface.columns(self.reorderer.container()).unwrap_or(1)
    }

    pub fn claim_badge(&mut self) {
        let motion = self.settings.read();
        self.badge.claim(&mut self.surface, &mut self.engine, &motion);
        if let Some(burst) = ConfettiBurst::spawn(
            &mut self.surface,
            &mut self.engine,
            self.viewport,
            &motion,
            &mut self.rng,
        ) {
            self.confetti.push(burst);
        }
        self.status_message = Some("Badge claimed!".into());
    }

    /// Replay the three-dot demo from the top.
    pub fn replay_demo(&mut self) {
        let motion = self.settings.read();
        self.demo.replay(&mut self.surface, &mut self.engine, &motion);
        if !motion.motion_enabled {
            self.status_message = Some("Demo needs motion on".into());
        }
    }

    pub fn toggle_motion(&mut self) {
        self.settings.update(|s| s.motion_enabled = !s.motion_enabled);
        let enabled = self.settings.read().motion_enabled;
        self.config.reduced_motion = !enabled;
        self.save_config();
        let state = if enabled { "on" } else { "off" };
        self.status_message = Some(format!("Motion: {state}"));
    }

    /// Push edited motion config into the live settings and persist it.
    /// The current on/off state is kept.
    pub fn apply_config(&mut self) {
        let enabled = self.settings.read().motion_enabled;
        let next = MotionSettings {
            motion_enabled: enabled,
            ..self.config.motion_settings(false)
        };
        self.settings.update(|s| *s = next);
        self.save_config();
    }

    /// Write the config to `config_path`; failures only cost persistence.
    pub fn save_config(&self) {
        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!("config not saved: {e}");
        }
    }

    /// Decode a card image once; failures are logged and remembered.
    fn ensure_image(&mut self, path: &Path) {
        if self.images.contains_key(path) {
            return;
        }
        let decoded = match image::open(path) {
            Ok(img) => {
                let thumb = img.thumbnail(THUMBNAIL_MAX, THUMBNAIL_MAX);
                Some(Arc::new(thumb.to_rgba8()))
            }
            Err(e) => {
                tracing::warn!("card image {} unavailable: {e}", path.display());
                None
            }
        };
        self.images.insert(path.to_path_buf(), decoded);
    }
}
