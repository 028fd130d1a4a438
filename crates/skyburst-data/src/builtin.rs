//! The built-in fireworks campaign catalog.
//!
//! Content is embedded RON and goes through the same loader pipeline as
//! external data files, so shipping a modified campaign is a matter of
//! pointing [`crate::loader::load_catalog`] at a directory instead.

use crate::loader::{self, DataLoadError};
use crate::schema::{BuildingData, LevelData, UpgradeData};
use skyburst_core::catalog::Catalog;
use std::path::{Path, PathBuf};

const BUILDINGS_RON: &str = include_str!("../data/buildings.ron");
const UPGRADES_RON: &str = include_str!("../data/upgrades.ron");
const LEVELS_RON: &str = include_str!("../data/levels.ron");

fn parse_embedded<T: serde::de::DeserializeOwned>(
    content: &str,
    label: &str,
) -> Result<Vec<T>, DataLoadError> {
    ron::from_str(content).map_err(|e| DataLoadError::Parse {
        file: PathBuf::from(label),
        detail: e.to_string(),
    })
}

/// Build the built-in fireworks campaign catalog: 11 buildings, 9 upgrades,
/// and 10 career levels.
pub fn builtin_catalog() -> Result<Catalog, DataLoadError> {
    let buildings: Vec<BuildingData> = parse_embedded(BUILDINGS_RON, "buildings.ron")?;
    let upgrades: Vec<UpgradeData> = parse_embedded(UPGRADES_RON, "upgrades.ron")?;
    let levels: Vec<LevelData> = parse_embedded(LEVELS_RON, "levels.ron")?;
    loader::build_catalog(
        &buildings,
        &upgrades,
        &levels,
        Path::new("buildings.ron"),
        Path::new("upgrades.ron"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyburst_core::catalog::UpgradeEffect;

    #[test]
    fn builtin_catalog_builds() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.building_count(), 11);
        assert_eq!(catalog.upgrade_count(), 9);
        assert_eq!(catalog.level_count(), 10);
        assert_eq!(catalog.max_level(), 10);
    }

    #[test]
    fn first_building_is_the_cheapest() {
        let catalog = builtin_catalog().unwrap();
        let first = &catalog.buildings()[0];
        assert_eq!(first.key, "backyard_amateur");
        assert_eq!(first.base_cost, 10.0);
        assert!(
            catalog
                .buildings()
                .iter()
                .all(|b| b.base_cost >= first.base_cost)
        );
    }

    #[test]
    fn unlock_costs_strictly_increase() {
        let catalog = builtin_catalog().unwrap();
        for pair in catalog.levels().windows(2) {
            assert!(pair[1].unlock_cost > pair[0].unlock_cost);
        }
    }

    #[test]
    fn every_level_unlocks_something() {
        let catalog = builtin_catalog().unwrap();
        for level in catalog.levels() {
            let has_building = catalog
                .buildings()
                .iter()
                .any(|b| b.unlock_level == level.number);
            let has_upgrade = catalog
                .upgrades()
                .iter()
                .any(|u| u.unlock_level == level.number);
            assert!(
                has_building || has_upgrade,
                "level {} unlocks nothing",
                level.number
            );
        }
    }

    #[test]
    fn firecracker_efficiency_targets_the_bundle() {
        let catalog = builtin_catalog().unwrap();
        let bundle = catalog.building_id("firecracker_bundle").unwrap();
        let id = catalog.upgrade_id("firecracker_efficiency").unwrap();
        match catalog.get_upgrade(id).unwrap().effect {
            UpgradeEffect::CostReduction { factor, target } => {
                assert_eq!(factor, 0.9);
                assert_eq!(target, Some(bundle));
            }
            other => panic!("expected CostReduction, got: {other:?}"),
        }
    }

    #[test]
    fn second_level_costs_ten_innovation() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.level(2).unwrap().unlock_cost, 10.0);
    }
}
