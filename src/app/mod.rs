//! Application orchestration — state, terminal events, and input handling.

pub mod event;
pub mod handler;
pub mod settings;
pub mod state;
