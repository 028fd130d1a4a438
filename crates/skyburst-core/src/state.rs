//! Mutable player progress.
//!
//! One [`BuildingState`]/[`UpgradeState`] entry exists per catalog
//! definition at all times, created at engine start and never removed.
//! Entry `i` always corresponds to catalog id `i`, so the engine indexes
//! directly. State is only mutated through [`crate::engine::Engine`]
//! operations.

use crate::catalog::Catalog;
use crate::id::{BuildingId, Level, Tick, UpgradeId};
use serde::{Deserialize, Serialize};

/// How many units of one building the player owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingState {
    pub building: BuildingId,
    pub count: u32,
}

/// Whether one upgrade has been bought. Purchases are permanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeState {
    pub upgrade: UpgradeId,
    pub purchased: bool,
}

/// The engine's mutable core: balances, owned counts, purchased flags,
/// current level, and the tick counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Sparks balance. Always >= 0.
    pub sparks: f64,
    /// Innovation balance. Always >= 0.
    pub innovation: f64,
    /// Current level. Always a valid catalog level number.
    pub level: Level,
    /// One entry per catalog building, in catalog order.
    pub buildings: Vec<BuildingState>,
    /// One entry per catalog upgrade, in catalog order.
    pub upgrades: Vec<UpgradeState>,
    /// Count of elapsed simulation ticks.
    pub tick: Tick,
}

impl PlayerState {
    /// Fresh state for a catalog: zero balances, zero counts, nothing
    /// purchased, starting at the lowest level.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            sparks: 0.0,
            innovation: 0.0,
            level: catalog.first_level().number,
            buildings: (0..catalog.building_count())
                .map(|i| BuildingState {
                    building: BuildingId(i as u32),
                    count: 0,
                })
                .collect(),
            upgrades: (0..catalog.upgrade_count())
                .map(|i| UpgradeState {
                    upgrade: UpgradeId(i as u32),
                    purchased: false,
                })
                .collect(),
            tick: 0,
        }
    }
}
