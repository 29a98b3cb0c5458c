//! Small one-shot effects layered on the tween engine: counting stats that
//! slide in, a typing reveal, the banner entrance, the demo dots, a confetti
//! burst and the badge pop.
//!
//! Each one gates its durations through [`MotionSettings`], so reduced
//! motion shows the end state straight away.
//!
//! [`MotionSettings`]: crate::core::settings::MotionSettings

pub mod badge;
pub mod banner;
pub mod confetti;
pub mod counter;
pub mod demo;
pub mod typewriter;
