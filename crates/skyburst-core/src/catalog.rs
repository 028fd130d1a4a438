//! Immutable catalog of building, upgrade, and level definitions.
//!
//! The catalog is reference data: loaded once at startup, validated, then
//! frozen. Player progress never lives here -- see [`crate::state`]. Every
//! definition carries a stable string key used by data files and saves;
//! the dense [`BuildingId`]/[`UpgradeId`] indices are runtime handles only.

use crate::id::{BuildingId, Level, UpgradeId};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A producer definition. Each owned unit adds flat per-tick production.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    /// Stable identifier used in data files and saves.
    pub key: String,
    pub name: String,
    pub description: String,
    /// Cost in sparks of the first unit.
    pub base_cost: f64,
    /// Sparks produced per tick by one unit.
    pub sparks_per_tick: f64,
    /// Innovation produced per tick by one unit.
    pub innovation_per_tick: f64,
    /// Lowest level at which this building appears in the shop.
    pub unlock_level: Level,
}

/// What a purchased upgrade changes. Multiplicative in every case; a factor
/// below 1.0 on [`UpgradeEffect::CostReduction`] is a discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Multiplies building costs. `target = None` applies to every building.
    CostReduction {
        factor: f64,
        target: Option<BuildingId>,
    },
    /// Multiplies all passive production.
    ProductionMultiplier { factor: f64 },
    /// Multiplies the value of each manual click.
    ClickMultiplier { factor: f64 },
}

/// A one-time, permanent purchase paid in innovation.
#[derive(Debug, Clone)]
pub struct UpgradeDef {
    /// Stable identifier used in data files and saves.
    pub key: String,
    pub name: String,
    pub description: String,
    /// Cost in innovation.
    pub cost: f64,
    /// Lowest level at which this upgrade appears in the shop.
    pub unlock_level: Level,
    pub effect: UpgradeEffect,
}

/// A progression level. Advancing from level `number - 1` to `number` costs
/// `unlock_cost` innovation.
#[derive(Debug, Clone)]
pub struct LevelDef {
    pub number: Level,
    pub name: String,
    pub description: String,
    pub unlock_cost: f64,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
/// Register everything, then validate and freeze with [`CatalogBuilder::build`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    buildings: Vec<BuildingDef>,
    building_key_to_id: HashMap<String, BuildingId>,
    upgrades: Vec<UpgradeDef>,
    upgrade_key_to_id: HashMap<String, UpgradeId>,
    levels: Vec<LevelDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a building definition. Returns its dense ID.
    pub fn register_building(&mut self, def: BuildingDef) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        self.building_key_to_id.entry(def.key.clone()).or_insert(id);
        self.buildings.push(def);
        id
    }

    /// Register an upgrade definition. Returns its dense ID.
    pub fn register_upgrade(&mut self, def: UpgradeDef) -> UpgradeId {
        let id = UpgradeId(self.upgrades.len() as u32);
        self.upgrade_key_to_id.entry(def.key.clone()).or_insert(id);
        self.upgrades.push(def);
        id
    }

    /// Register a level. Levels must be registered in ascending order
    /// starting at 1; `build()` rejects anything else.
    pub fn register_level(&mut self, def: LevelDef) {
        self.levels.push(def);
    }

    /// Lookup a building ID by key before the catalog is frozen. Used by
    /// loaders to resolve upgrade targets.
    pub fn building_id(&self, key: &str) -> Option<BuildingId> {
        self.building_key_to_id.get(key).copied()
    }

    /// Lookup an upgrade ID by key before the catalog is frozen.
    pub fn upgrade_id(&self, key: &str) -> Option<UpgradeId> {
        self.upgrade_key_to_id.get(key).copied()
    }

    /// Validate and freeze the catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.levels.is_empty() {
            return Err(CatalogError::NoLevels);
        }
        for (i, level) in self.levels.iter().enumerate() {
            let expected = i as Level + 1;
            if level.number != expected {
                return Err(CatalogError::NonContiguousLevels {
                    expected,
                    found: level.number,
                });
            }
            if level.unlock_cost < 0.0 {
                return Err(CatalogError::NegativeValue {
                    key: level.name.clone(),
                    field: "unlock_cost",
                });
            }
        }
        for pair in self.levels.windows(2) {
            if pair[1].unlock_cost <= pair[0].unlock_cost {
                return Err(CatalogError::UnlockCostNotIncreasing {
                    level: pair[1].number,
                });
            }
        }
        let max_level = self.levels.len() as Level;

        let mut building_key_to_id = HashMap::new();
        for (i, def) in self.buildings.iter().enumerate() {
            let id = BuildingId(i as u32);
            if building_key_to_id.insert(def.key.clone(), id).is_some() {
                return Err(CatalogError::DuplicateKey(def.key.clone()));
            }
            check_non_negative(&def.key, "base_cost", def.base_cost)?;
            check_non_negative(&def.key, "sparks_per_tick", def.sparks_per_tick)?;
            check_non_negative(&def.key, "innovation_per_tick", def.innovation_per_tick)?;
            if def.unlock_level < 1 || def.unlock_level > max_level {
                return Err(CatalogError::InvalidUnlockLevel {
                    key: def.key.clone(),
                    level: def.unlock_level,
                });
            }
        }

        let mut upgrade_key_to_id = HashMap::new();
        for (i, def) in self.upgrades.iter().enumerate() {
            let id = UpgradeId(i as u32);
            if upgrade_key_to_id.insert(def.key.clone(), id).is_some() {
                return Err(CatalogError::DuplicateKey(def.key.clone()));
            }
            check_non_negative(&def.key, "cost", def.cost)?;
            if def.unlock_level < 1 || def.unlock_level > max_level {
                return Err(CatalogError::InvalidUnlockLevel {
                    key: def.key.clone(),
                    level: def.unlock_level,
                });
            }
            let factor = match def.effect {
                UpgradeEffect::CostReduction { factor, target } => {
                    if let Some(target) = target
                        && target.0 as usize >= self.buildings.len()
                    {
                        return Err(CatalogError::InvalidBuildingRef(target));
                    }
                    factor
                }
                UpgradeEffect::ProductionMultiplier { factor } => factor,
                UpgradeEffect::ClickMultiplier { factor } => factor,
            };
            check_non_negative(&def.key, "factor", factor)?;
        }

        Ok(Catalog {
            buildings: self.buildings,
            building_key_to_id,
            upgrades: self.upgrades,
            upgrade_key_to_id,
            levels: self.levels,
        })
    }
}

fn check_non_negative(key: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value < 0.0 || value.is_nan() {
        return Err(CatalogError::NegativeValue {
            key: key.to_string(),
            field,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    buildings: Vec<BuildingDef>,
    building_key_to_id: HashMap<String, BuildingId>,
    upgrades: Vec<UpgradeDef>,
    upgrade_key_to_id: HashMap<String, UpgradeId>,
    levels: Vec<LevelDef>,
}

impl Catalog {
    pub fn get_building(&self, id: BuildingId) -> Option<&BuildingDef> {
        self.buildings.get(id.0 as usize)
    }

    pub fn get_upgrade(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(id.0 as usize)
    }

    pub fn building_id(&self, key: &str) -> Option<BuildingId> {
        self.building_key_to_id.get(key).copied()
    }

    pub fn upgrade_id(&self, key: &str) -> Option<UpgradeId> {
        self.upgrade_key_to_id.get(key).copied()
    }

    /// All building definitions in registration (display) order.
    pub fn buildings(&self) -> &[BuildingDef] {
        &self.buildings
    }

    /// All upgrade definitions in registration (display) order.
    pub fn upgrades(&self) -> &[UpgradeDef] {
        &self.upgrades
    }

    /// All levels, ordered by number.
    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    /// The level with the given number, if it exists.
    pub fn level(&self, number: Level) -> Option<&LevelDef> {
        self.levels.get(number.checked_sub(1)? as usize)
    }

    /// The lowest level. The catalog always has at least one.
    pub fn first_level(&self) -> &LevelDef {
        &self.levels[0]
    }

    /// The highest level number (the progression's terminal state).
    pub fn max_level(&self) -> Level {
        self.levels.len() as Level
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn upgrade_count(&self) -> usize {
        self.upgrades.len()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("catalog has no levels")]
    NoLevels,
    #[error("level numbers must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousLevels { expected: Level, found: Level },
    #[error("unlock cost must strictly increase: level {level} does not")]
    UnlockCostNotIncreasing { level: Level },
    #[error("invalid building reference: {0:?}")]
    InvalidBuildingRef(BuildingId),
    #[error("'{key}' unlocks at level {level}, which is not in the catalog")]
    InvalidUnlockLevel { key: String, level: Level },
    #[error("'{key}' has a negative or NaN {field}")]
    NegativeValue { key: String, field: &'static str },
}
