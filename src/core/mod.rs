//! Core motion logic – geometry, easing, the tween engine, the FLIP
//! reorderer and the gallery state machine.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Everything
//! talks to the screen through the [`surface::Surface`] trait.

pub mod deck;
pub mod easing;
pub mod effects;
pub mod engine;
pub mod error;
pub mod flip;
pub mod gallery;
pub mod geometry;
pub mod settings;
pub mod surface;
pub mod timeline;
