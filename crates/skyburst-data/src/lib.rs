//! Skyburst Data -- catalog content loading for the Skyburst engine.
//!
//! Game content (buildings, upgrades, levels) ships as data files rather
//! than code. This crate reads RON, JSON, or TOML files, resolves
//! cross-references (upgrade targets name buildings by key), and builds a
//! validated [`skyburst_core::catalog::Catalog`]. The reference fireworks
//! campaign is embedded in [`builtin`] and goes through the same pipeline.

pub mod builtin;
pub mod loader;
pub mod schema;
