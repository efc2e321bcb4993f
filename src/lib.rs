//! This is a plugin for Bevy game engine to calculate a crowd aware FlowField over a grid of
//! tiles towards a single target
//!

pub mod config;
pub mod engine;
pub mod error;
pub mod flowfields;
pub mod plugin;

pub mod prelude;
