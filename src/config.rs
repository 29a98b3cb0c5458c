//! User configuration — keybindings, motion tuning and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/flipdeck/config.toml` (default `~/.config/flipdeck/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::easing::Ease;
use crate::core::settings::MotionSettings;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    OpenCard,
    CloseDetail,
    Shuffle,
    Sort,
    ClaimBadge,
    ReplayDemo,
    ToggleMotion,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::OpenCard,
        Action::CloseDetail,
        Action::Shuffle,
        Action::Sort,
        Action::ClaimBadge,
        Action::ReplayDemo,
        Action::ToggleMotion,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveLeft => "Move Left",
            Action::MoveRight => "Move Right",
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::OpenCard => "Open Card",
            Action::CloseDetail => "Close Detail",
            Action::Shuffle => "Shuffle",
            Action::Sort => "Sort A→Z",
            Action::ClaimBadge => "Claim Badge",
            Action::ReplayDemo => "Replay Demo",
            Action::ToggleMotion => "Toggle Motion",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::OpenCard => "open_card",
            Action::CloseDetail => "close_detail",
            Action::Shuffle => "shuffle",
            Action::Sort => "sort",
            Action::ClaimBadge => "claim_badge",
            Action::ReplayDemo => "replay_demo",
            Action::ToggleMotion => "toggle_motion",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & MODIFIER_MASK,
        }
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(prefix);
            }
        }
        let arrow = |glyph: &str, word: &str| {
            if pretty {
                glyph.to_string()
            } else {
                word.to_string()
            }
        };
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => arrow("↑", "Up"),
            KeyCode::Down => arrow("↓", "Down"),
            KeyCode::Left => arrow("←", "Left"),
            KeyCode::Right => arrow("→", "Right"),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => arrow("Bksp", "Backspace"),
            KeyCode::Delete => arrow("Del", "Delete"),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => arrow("PgUp", "PageUp"),
            KeyCode::PageDown => arrow("PgDn", "PageDown"),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (mods, key_part) = match s.rsplit_once('+') {
            // A trailing "+" is the plus key, not a separator.
            Some(("", "")) => (None, "+"),
            Some((m, "")) if !m.is_empty() => (Some(m.trim_end_matches('+')), "+"),
            Some((m, k)) => (Some(m), k),
            None => (None, s),
        };

        for part in mods.into_iter().flat_map(|m| m.split('+')) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            // Keep the original case for single characters ("B" ≠ "b").
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

const DEFAULT_FLIP_MS: u64 = 450;
const DEFAULT_STAGGER_MS: u64 = 25;
const DEFAULT_DETAIL_MS: u64 = 400;

/// Application configuration — keybindings and motion tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Persistent reduced-motion preference.
    pub reduced_motion: bool,
    pub flip_duration_ms: u64,
    pub flip_stagger_ms: u64,
    pub flip_ease: Ease,
    pub detail_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            reduced_motion: false,
            flip_duration_ms: DEFAULT_FLIP_MS,
            flip_stagger_ms: DEFAULT_STAGGER_MS,
            flip_ease: Ease::Power1InOut,
            detail_duration_ms: DEFAULT_DETAIL_MS,
        }
    }
}

impl AppConfig {
    /// Built-in bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(MoveRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(OpenCard, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(CloseDetail, vec![KeyBind::new(Esc, n)]);
        m.insert(Shuffle, vec![KeyBind::new(Char('s'), n)]);
        m.insert(Sort, vec![KeyBind::new(Char('o'), n)]);
        m.insert(ClaimBadge, vec![KeyBind::new(Char('b'), n)]);
        m.insert(ReplayDemo, vec![KeyBind::new(Char('d'), n)]);
        m.insert(ToggleMotion, vec![KeyBind::new(Char('m'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Motion settings derived from this config.  `reduced_motion` is the
    /// host signal (CLI flag / environment); either source disables motion.
    pub fn motion_settings(&self, reduced_motion: bool) -> MotionSettings {
        MotionSettings {
            flip_duration: Duration::from_millis(self.flip_duration_ms),
            flip_stagger: Duration::from_millis(self.flip_stagger_ms),
            flip_ease: self.flip_ease,
            detail_duration: Duration::from_millis(self.detail_duration_ms),
            ..MotionSettings::new(reduced_motion || self.reduced_motion)
        }
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match (shouldn't happen after conflict resolution), the one with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    pub fn clear_bindings(&mut self, action: Action) {
        self.bindings.remove(&action);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: shuffle | {}: sort | {}: open | {}: badge | {}: demo | {}: motion | {}: settings",
            self.short_binding(Action::Shuffle),
            self.short_binding(Action::Sort),
            self.short_binding(Action::OpenCard),
            self.short_binding(Action::ClaimBadge),
            self.short_binding(Action::ReplayDemo),
            self.short_binding(Action::ToggleMotion),
            self.short_binding(Action::OpenSettings),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                if path.exists() {
                    tracing::warn!("config unreadable, using defaults: {e}");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            // Motion settings.
            match key {
                "reduced_motion" => {
                    config.reduced_motion = value == "true";
                    continue;
                }
                "flip_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.flip_duration_ms = v.min(5000);
                    }
                    continue;
                }
                "flip_stagger_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.flip_stagger_ms = v.min(500);
                    }
                    continue;
                }
                "flip_ease" => {
                    match value.parse::<Ease>() {
                        Ok(ease) => config.flip_ease = ease,
                        Err(e) => tracing::warn!("{e}; keeping {}", config.flip_ease),
                    }
                    continue;
                }
                "detail_duration_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.detail_duration_ms = v.min(5000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# flipdeck configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("reduced_motion = {}", self.reduced_motion),
            format!("flip_duration_ms = {}", self.flip_duration_ms),
            format!("flip_stagger_ms = {}", self.flip_stagger_ms),
            format!("flip_ease = {}", self.flip_ease),
            format!("detail_duration_ms = {}", self.detail_duration_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/flipdeck/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn serialise_then_parse_is_lossless() {
        let mut config = AppConfig {
            reduced_motion: true,
            flip_duration_ms: 600,
            flip_stagger_ms: 40,
            flip_ease: Ease::BackOut(1.7),
            detail_duration_ms: 250,
            ..AppConfig::default()
        };
        config.add_binding(
            Action::Shuffle,
            KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        );
        config.add_binding(Action::Sort, KeyBind::new(KeyCode::Up, KeyModifiers::ALT));
        assert_eq!(AppConfig::parse(&config.serialise()), config);
    }

    #[test]
    fn parse_clamps_and_skips_junk() {
        let config = AppConfig::parse(concat!(
            "flip_duration_ms = 999999\n",
            "flip_ease = wobble\n",
            "nonsense\n",
            "mystery = q\n",
            "shuffle = Hyper+x\n",
        ));
        assert_eq!(config.flip_duration_ms, 5000);
        assert_eq!(config.flip_ease, Ease::Power1InOut);
        assert_eq!(config.bindings, AppConfig::default_bindings());
    }

    #[test]
    fn key_parse_forms() {
        assert_eq!(
            KeyBind::parse("Ctrl+c"),
            Some(KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(
            KeyBind::parse("Space"),
            Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("?"), Some(KeyBind::new(KeyCode::Char('?'), KeyModifiers::NONE)));
        assert_eq!(
            KeyBind::parse("Alt++"),
            Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("+"), Some(KeyBind::new(KeyCode::Char('+'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("wat"), None);
    }

    #[test]
    fn rebinding_steals_the_key() {
        let mut config = AppConfig::default();
        config.add_binding(Action::Sort, KeyBind::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(Action::Sort)
        );
        assert!(config.bindings[&Action::Shuffle].is_empty());
    }

    #[test]
    fn motion_settings_honour_either_reduced_source() {
        let config = AppConfig::default();
        assert!(config.motion_settings(false).motion_enabled);
        assert!(!config.motion_settings(true).motion_enabled);
        let config = AppConfig {
            reduced_motion: true,
            ..AppConfig::default()
        };
        assert!(!config.motion_settings(false).motion_enabled);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());

        let config = AppConfig {
            flip_stagger_ms: 60,
            flip_ease: Ease::SineInOut,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
    }
}
