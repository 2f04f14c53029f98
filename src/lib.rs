//! Skirmish AI - tactical bot engine
//!
//! Decides, once per tick and for every bot, where it moves, whom it
//! targets, when it fires and when it uses its abilities.

pub mod actions;
pub mod bot;
pub mod core;
pub mod engine;
pub mod tactics;
pub mod world;
