//! Deck data — the cards on the grid, the tagline and the stat counters.
//!
//! Decks are TOML files:
//!
//! ```toml
//! tagline = "Motion, one card at a time."
//!
//! [[card]]
//! key = "alpha"
//! title = "Alpha"
//! text = "The first card."
//! image = "alpha.png"   # optional, relative to the deck file
//!
//! [[stat]]
//! label = "Cards"
//! target = 12
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::DeckError;
use super::gallery::DetailContent;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    /// Sort key; unique within a deck.
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl Card {
    pub fn detail(&self) -> DetailContent {
        DetailContent {
            title: self.title.clone(),
            text: self.text.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stat {
    pub label: String,
    pub target: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub tagline: String,
    #[serde(rename = "card", default)]
    pub cards: Vec<Card>,
    #[serde(rename = "stat", default)]
    pub stats: Vec<Stat>,
}

impl Deck {
    /// Read and validate a deck file.  Relative image paths are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut deck = Self::parse(&contents).map_err(|e| match e {
            DeckError::Parse { source, .. } => DeckError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        if let Some(base) = path.parent() {
            for card in &mut deck.cards {
                if let Some(image) = card.image.as_mut() {
                    if image.is_relative() {
                        *image = base.join(&*image);
                    }
                }
            }
        }
        Ok(deck)
    }

    pub fn parse(contents: &str) -> Result<Self, DeckError> {
        let deck: Deck = toml::from_str(contents).map_err(|source| DeckError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        deck.validate()?;
        Ok(deck)
    }

    fn validate(&self) -> Result<(), DeckError> {
        if self.cards.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.key.as_str()) {
                return Err(DeckError::DuplicateKey(card.key.clone()));
            }
        }
        Ok(())
    }

    /// The deck shown when no file is given.
    pub fn builtin() -> Self {
        let cards = [
            (
                "ease",
                "Ease",
                "Curves shape time: power1.inOut starts slow, speeds up, then settles.",
            ),
            (
                "flip",
                "Flip",
                "Capture where things are, move them, then animate from the old place.",
            ),
            ("stagger", "Stagger", "A small per-item delay turns one motion into a cascade."),
            ("tween", "Tween", "Interpolate a property from where it is to where it should be."),
            (
                "overwrite",
                "Overwrite",
                "A new tween on the same property replaces the old one mid-flight.",
            ),
            ("reduce", "Reduce", "With reduced motion every duration collapses to zero."),
            (
                "invert",
                "Invert",
                "The inverse transform makes the new layout look like the old one.",
            ),
            ("play", "Play", "Tween the inverse back to identity and the move looks continuous."),
            ("gallery", "Gallery", "A detail view grows out of the card you picked."),
            ("confetti", "Confetti", "Forty-eight particles, random spread, one fade."),
            ("counter", "Counter", "Numbers count up and snap to whole values."),
            ("typing", "Typing", "Text appears one character at a time."),
        ];
        Self {
            tagline: "Shuffle it, sort it, open it: every move is a FLIP.".into(),
            cards: cards
                .into_iter()
                .map(|(key, title, text)| Card {
                    key: key.into(),
                    title: title.into(),
                    text: text.into(),
                    image: None,
                })
                .collect(),
            stats: vec![
                Stat { label: "Cards".into(), target: cards.len() as u64 },
                Stat { label: "Frames / s".into(), target: 60 },
                Stat { label: "Pieces".into(), target: super::effects::confetti::PIECES as u64 },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cards_and_stats() {
        let deck = Deck::parse(
            r#"
            tagline = "hi"
            [[card]]
            key = "b"
            title = "Bee"
            image = "b.png"
            [[card]]
            key = "a"
            title = "Ay"
            text = "first"
            [[stat]]
            label = "n"
            target = 3
            "#,
        )
        .unwrap();
        assert_eq!(deck.tagline, "hi");
        assert_eq!(deck.cards.len(), 2);
        assert_eq!(deck.cards[0].image, Some(PathBuf::from("b.png")));
        assert_eq!(deck.cards[1].text, "first");
        assert_eq!(deck.stats[0].target, 3);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Deck::parse(
            r#"
            [[card]]
            key = "a"
            title = "one"
            [[card]]
            key = "a"
            title = "two"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DeckError::DuplicateKey(k) if k == "a"));
    }

    #[test]
    fn rejects_empty_deck() {
        assert!(matches!(Deck::parse("tagline = \"x\""), Err(DeckError::Empty)));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(Deck::parse("[[card]\n"), Err(DeckError::Parse { .. })));
    }

    #[test]
    fn builtin_deck_is_valid() {
        let deck = Deck::builtin();
        assert!(deck.validate().is_ok());
        assert_eq!(deck.stats[0].target, deck.cards.len() as u64);
    }
}
