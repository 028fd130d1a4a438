//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::catalog::{
    BuildingDef, Catalog, CatalogBuilder, LevelDef, UpgradeDef, UpgradeEffect,
};
use crate::engine::Engine;
use crate::id::{BuildingId, Level};

// ===========================================================================
// Definition constructors
// ===========================================================================

pub fn building(
    key: &str,
    base_cost: f64,
    sparks_per_tick: f64,
    innovation_per_tick: f64,
    unlock_level: Level,
) -> BuildingDef {
    BuildingDef {
        key: key.to_string(),
        name: key.to_string(),
        description: String::new(),
        base_cost,
        sparks_per_tick,
        innovation_per_tick,
        unlock_level,
    }
}

pub fn level(number: Level, unlock_cost: f64) -> LevelDef {
    LevelDef {
        number,
        name: format!("level {number}"),
        description: String::new(),
        unlock_cost,
    }
}

fn upgrade(key: &str, cost: f64, unlock_level: Level, effect: UpgradeEffect) -> UpgradeDef {
    UpgradeDef {
        key: key.to_string(),
        name: key.to_string(),
        description: String::new(),
        cost,
        unlock_level,
        effect,
    }
}

pub fn cost_upgrade(
    key: &str,
    cost: f64,
    unlock_level: Level,
    factor: f64,
    target: Option<BuildingId>,
) -> UpgradeDef {
    upgrade(
        key,
        cost,
        unlock_level,
        UpgradeEffect::CostReduction { factor, target },
    )
}

pub fn production_upgrade(key: &str, cost: f64, unlock_level: Level, factor: f64) -> UpgradeDef {
    upgrade(
        key,
        cost,
        unlock_level,
        UpgradeEffect::ProductionMultiplier { factor },
    )
}

pub fn click_upgrade(key: &str, cost: f64, unlock_level: Level, factor: f64) -> UpgradeDef {
    upgrade(
        key,
        cost,
        unlock_level,
        UpgradeEffect::ClickMultiplier { factor },
    )
}

// ===========================================================================
// Catalogs
// ===========================================================================

/// The standard two-building, three-upgrade, three-level test catalog:
///
/// - `sparkler`: cost 10, 1 spark/tick, unlocks at level 1
/// - `rocket`: cost 100, 5 sparks + 0.5 innovation/tick, unlocks at level 2
/// - `double_click` (x2 clicks, 10), `sparkler_discount` (x0.9 sparkler
///   cost, 50), `boost` (x1.5 production, 100, unlocks at level 2)
/// - levels 1..=3 with unlock costs 0, 10, 50
pub fn small_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    let sparkler = b.register_building(building("sparkler", 10.0, 1.0, 0.0, 1));
    b.register_building(building("rocket", 100.0, 5.0, 0.5, 2));
    b.register_upgrade(click_upgrade("double_click", 10.0, 1, 2.0));
    b.register_upgrade(cost_upgrade("sparkler_discount", 50.0, 1, 0.9, Some(sparkler)));
    b.register_upgrade(production_upgrade("boost", 100.0, 2, 1.5));
    b.register_level(level(1, 0.0));
    b.register_level(level(2, 10.0));
    b.register_level(level(3, 50.0));
    b.build().expect("small test catalog is valid")
}

pub fn small_engine() -> Engine {
    Engine::new(small_catalog())
}

/// `small_catalog` plus a global cost-reduction upgrade `global_discount`
/// with the given factor, costing 100 innovation at level 1.
pub fn engine_with_global_discount(factor: f64) -> Engine {
    let mut b = CatalogBuilder::new();
    let sparkler = b.register_building(building("sparkler", 10.0, 1.0, 0.0, 1));
    b.register_building(building("rocket", 100.0, 5.0, 0.5, 2));
    b.register_upgrade(click_upgrade("double_click", 10.0, 1, 2.0));
    b.register_upgrade(cost_upgrade("sparkler_discount", 50.0, 1, 0.9, Some(sparkler)));
    b.register_upgrade(production_upgrade("boost", 100.0, 2, 1.5));
    b.register_upgrade(cost_upgrade("global_discount", 100.0, 1, factor, None));
    b.register_level(level(1, 0.0));
    b.register_level(level(2, 10.0));
    b.register_level(level(3, 50.0));
    Engine::new(b.build().expect("discount test catalog is valid"))
}

/// A generated catalog for benchmarks: `n` buildings with geometric costs
/// spread over ten levels, plus a production upgrade per level.
pub fn generated_catalog(n: usize) -> Catalog {
    let mut b = CatalogBuilder::new();
    for i in 0..n {
        let unlock = (i % 10) as Level + 1;
        b.register_building(building(
            &format!("building_{i}"),
            10.0 * 2.0_f64.powi(i as i32 % 24),
            (i + 1) as f64,
            i as f64 * 0.1,
            unlock,
        ));
    }
    for l in 1..=10 {
        b.register_upgrade(production_upgrade(
            &format!("upgrade_{l}"),
            50.0 * l as f64,
            l,
            1.1,
        ));
    }
    for l in 1..=10u32 {
        b.register_level(level(l, if l == 1 { 0.0 } else { 10.0_f64.powi(l as i32) }));
    }
    b.build().expect("generated catalog is valid")
}
