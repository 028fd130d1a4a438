//! Read-only query API for inspecting engine state.
//!
//! Provides view types that aggregate engine state into convenient rows
//! for rendering: each carries everything a shop row or progress bar needs
//! to draw itself. All types are owned copies -- no references into
//! internal engine storage.

use crate::engine::{Engine, affordable};
use crate::id::{BuildingId, Level, UpgradeId};
use crate::progression;

// ---------------------------------------------------------------------------
// Building view
// ---------------------------------------------------------------------------

/// An aggregated, read-only view of one building for a shop row.
#[derive(Debug, Clone)]
pub struct BuildingView {
    pub id: BuildingId,
    pub key: String,
    pub name: String,
    pub description: String,
    /// Units currently owned.
    pub count: u32,
    /// Cost of the next unit, after growth and cost multipliers.
    pub cost: f64,
    /// Whether the current level has reached this entry's unlock level.
    pub unlocked: bool,
    /// This building's total sparks per tick at the current count.
    pub sparks_per_tick: f64,
    /// This building's total innovation per tick at the current count.
    pub innovation_per_tick: f64,
}

// ---------------------------------------------------------------------------
// Upgrade view
// ---------------------------------------------------------------------------

/// An aggregated, read-only view of one upgrade for a shop row.
#[derive(Debug, Clone)]
pub struct UpgradeView {
    pub id: UpgradeId,
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub purchased: bool,
    pub unlocked: bool,
    /// Whether the innovation balance currently covers the cost.
    pub affordable: bool,
}

// ---------------------------------------------------------------------------
// Progress view
// ---------------------------------------------------------------------------

/// A one-stop summary of progression and balances for a HUD.
#[derive(Debug, Clone)]
pub struct ProgressView {
    pub level: Level,
    pub level_name: String,
    /// Absent at the terminal level.
    pub next_level_name: Option<String>,
    /// Absent at the terminal level.
    pub next_unlock_cost: Option<f64>,
    pub can_level_up: bool,
    pub sparks: f64,
    pub innovation: f64,
    pub sparks_per_tick: f64,
    pub innovation_per_tick: f64,
}

impl Engine {
    /// Views of every catalog building, in catalog order, with locked
    /// entries flagged rather than omitted.
    pub fn building_views(&self) -> Vec<BuildingView> {
        let level = self.state().level;
        self.catalog()
            .buildings()
            .iter()
            .zip(&self.state().buildings)
            .enumerate()
            .map(|(i, (def, bs))| {
                let id = BuildingId(i as u32);
                BuildingView {
                    id,
                    key: def.key.clone(),
                    name: def.name.clone(),
                    description: def.description.clone(),
                    count: bs.count,
                    cost: self.building_cost(id, def, bs.count),
                    unlocked: def.unlock_level <= level,
                    sparks_per_tick: bs.count as f64 * def.sparks_per_tick,
                    innovation_per_tick: bs.count as f64 * def.innovation_per_tick,
                }
            })
            .collect()
    }

    /// Views of every catalog upgrade, in catalog order.
    pub fn upgrade_views(&self) -> Vec<UpgradeView> {
        let level = self.state().level;
        let innovation = self.state().innovation;
        self.catalog()
            .upgrades()
            .iter()
            .zip(&self.state().upgrades)
            .enumerate()
            .map(|(i, (def, us))| UpgradeView {
                id: UpgradeId(i as u32),
                key: def.key.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                cost: def.cost,
                purchased: us.purchased,
                unlocked: def.unlock_level <= level,
                affordable: affordable(innovation, def.cost),
            })
            .collect()
    }

    /// The HUD summary: level, next-level cost, balances, and rates.
    pub fn progress_view(&self) -> ProgressView {
        let current = progression::current_level_def(self.catalog(), self.state());
        let next = progression::next_level_def(self.catalog(), self.state());
        ProgressView {
            level: current.number,
            level_name: current.name.clone(),
            next_level_name: next.map(|l| l.name.clone()),
            next_unlock_cost: next.map(|l| l.unlock_cost),
            can_level_up: self.can_level_up(),
            sparks: self.state().sparks,
            innovation: self.state().innovation,
            sparks_per_tick: self.sparks_per_tick(),
            innovation_per_tick: self.innovation_per_tick(),
        }
    }
}
