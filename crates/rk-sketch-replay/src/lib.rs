//! Headless sketch replay
//!
//! Feeds a scripted stream of pick events and key signals through a
//! [`rk_sketch::SketchSession`] backed by an in-memory scene.

pub mod config;
pub mod script;

pub use config::{ConfigError, ConfigManager};
pub use script::{Replay, ReplayError, Script, Step, replay};
