//! Serde data file structs for game content definitions.
//!
//! These structs define the on-disk format for buildings, upgrades, and
//! levels. They are deserialized from RON, JSON, or TOML data files and
//! then resolved into catalog types by the loader.

use serde::Deserialize;

// ===========================================================================
// Buildings
// ===========================================================================

/// A building definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingData {
    /// Stable key referenced by upgrades and saves. Must be unique.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    #[serde(default)]
    pub sparks_per_tick: f64,
    #[serde(default)]
    pub innovation_per_tick: f64,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u32,
}

fn default_unlock_level() -> u32 {
    1
}

// ===========================================================================
// Upgrades
// ===========================================================================

/// The effect class of an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectData {
    CostReduction,
    ProductionMultiplier,
    ClickMultiplier,
}

/// An upgrade definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeData {
    /// Stable key referenced by saves. Must be unique.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cost in innovation.
    pub cost: f64,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u32,
    pub effect: EffectData,
    /// The multiplier factor (e.g. 0.9 for a 10% discount, 2.0 to double).
    pub value: f64,
    /// Building key this upgrade is scoped to. Only meaningful for
    /// `cost_reduction`; absent means global.
    #[serde(default)]
    pub target: Option<String>,
}

// ===========================================================================
// Levels
// ===========================================================================

/// A progression level in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Innovation cost to advance to this level from the previous one.
    pub unlock_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_defaults_apply() {
        let data: BuildingData = ron::from_str(
            r#"(
                key: "sparkler",
                name: "Sparkler",
                base_cost: 10.0,
                sparks_per_tick: 1.0,
            )"#,
        )
        .unwrap();
        assert_eq!(data.unlock_level, 1);
        assert_eq!(data.innovation_per_tick, 0.0);
        assert!(data.description.is_empty());
    }

    #[test]
    fn upgrade_effect_tags_parse() {
        let data: UpgradeData = ron::from_str(
            r#"(
                key: "boost",
                name: "Boost",
                cost: 100.0,
                effect: production_multiplier,
                value: 1.5,
            )"#,
        )
        .unwrap();
        assert_eq!(data.effect, EffectData::ProductionMultiplier);
        assert!(data.target.is_none());
    }

    #[test]
    fn targeted_upgrade_parses() {
        let data: UpgradeData = ron::from_str(
            r#"(
                key: "discount",
                name: "Discount",
                cost: 75.0,
                unlock_level: 2,
                effect: cost_reduction,
                value: 0.9,
                target: Some("sparkler"),
            )"#,
        )
        .unwrap();
        assert_eq!(data.target.as_deref(), Some("sparkler"));
    }

    #[test]
    fn level_parses_from_json() {
        let data: LevelData = serde_json::from_str(
            r#"{ "number": 2, "name": "Neighborhood", "unlock_cost": 10.0 }"#,
        )
        .unwrap();
        assert_eq!(data.number, 2);
        assert_eq!(data.unlock_cost, 10.0);
    }
}
