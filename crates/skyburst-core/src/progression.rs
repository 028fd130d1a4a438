//! The level progression gate.
//!
//! Levels form a linear chain: 1, 2, ... N. Each transition costs the next
//! level's `unlock_cost` in innovation, advancement is always exactly +1,
//! and level N is a valid terminal state with no outgoing transition. The
//! gate also filters the catalog to the entries whose unlock level has been
//! reached.
//!
//! Gating is a visibility concern: the shop shows only available entries,
//! and purchase operations themselves check funds, not levels, so a host
//! that drives purchases from the gated views never observes a difference.

use crate::catalog::{BuildingDef, Catalog, LevelDef, UpgradeDef};
use crate::engine::affordable;
use crate::id::{BuildingId, UpgradeId};
use crate::state::PlayerState;

/// The definition of the player's current level.
///
/// Always resolves for a state the engine produced; the fall-back to the
/// first level is defensive only.
pub fn current_level_def<'a>(catalog: &'a Catalog, state: &PlayerState) -> &'a LevelDef {
    catalog.level(state.level).unwrap_or(catalog.first_level())
}

/// The next level's definition, or `None` if the current level is the
/// catalog maximum.
pub fn next_level_def<'a>(catalog: &'a Catalog, state: &PlayerState) -> Option<&'a LevelDef> {
    catalog.level(state.level + 1)
}

/// Whether a level-up would succeed: a next level exists and the
/// innovation balance covers its unlock cost.
pub fn can_level_up(catalog: &Catalog, state: &PlayerState) -> bool {
    match next_level_def(catalog, state) {
        Some(next) => affordable(state.innovation, next.unlock_cost),
        None => false,
    }
}

/// Whether the player sits at the terminal level.
pub fn is_terminal(catalog: &Catalog, state: &PlayerState) -> bool {
    state.level >= catalog.max_level()
}

/// Buildings whose unlock level has been reached, in catalog order.
pub fn available_buildings<'a>(
    catalog: &'a Catalog,
    state: &PlayerState,
) -> impl Iterator<Item = (BuildingId, &'a BuildingDef)> {
    let level = state.level;
    catalog
        .buildings()
        .iter()
        .enumerate()
        .filter_map(move |(i, def)| {
            (def.unlock_level <= level).then_some((BuildingId(i as u32), def))
        })
}

/// Upgrades whose unlock level has been reached, in catalog order.
pub fn available_upgrades<'a>(
    catalog: &'a Catalog,
    state: &PlayerState,
) -> impl Iterator<Item = (UpgradeId, &'a UpgradeDef)> {
    let level = state.level;
    catalog
        .upgrades()
        .iter()
        .enumerate()
        .filter_map(move |(i, def)| {
            (def.unlock_level <= level).then_some((UpgradeId(i as u32), def))
        })
}
