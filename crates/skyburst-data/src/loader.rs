//! Resolution pipeline: reads data files, resolves cross-references, builds
//! the catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_catalog`], which turns a content
//! directory into a validated [`Catalog`]. Content errors are load-time
//! configuration errors: everything is checked here, once, so the engine
//! never has to re-validate per call.

use crate::schema::{BuildingData, EffectData, LevelData, UpgradeData};
use serde::de::DeserializeOwned;
use skyburst_core::catalog::{
    BuildingDef, Catalog, CatalogBuilder, CatalogError, LevelDef, UpgradeDef, UpgradeEffect,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The assembled catalog failed validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(
    dir: &Path,
    base_name: &'static str,
) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(&content).map_err(|e| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: e.to_string(),
                })?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: format!("missing key '{toml_key}' in TOML file"),
                })?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: e.to_string(),
                })
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        return Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        });
    }
    Ok(())
}

// ===========================================================================
// Catalog assembly
// ===========================================================================

/// Resolve parsed content into a validated catalog.
///
/// Buildings are registered first so upgrade `target` keys can resolve to
/// ids. The file arguments only label errors.
pub fn build_catalog(
    buildings: &[BuildingData],
    upgrades: &[UpgradeData],
    levels: &[LevelData],
    buildings_file: &Path,
    upgrades_file: &Path,
) -> Result<Catalog, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    let mut building_ids = HashMap::new();
    for data in buildings {
        check_duplicate(&building_ids, &data.key, buildings_file)?;
        let id = builder.register_building(BuildingDef {
            key: data.key.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            base_cost: data.base_cost,
            sparks_per_tick: data.sparks_per_tick,
            innovation_per_tick: data.innovation_per_tick,
            unlock_level: data.unlock_level,
        });
        building_ids.insert(data.key.clone(), id);
    }

    let mut upgrade_keys = HashMap::new();
    for data in upgrades {
        check_duplicate(&upgrade_keys, &data.key, upgrades_file)?;
        upgrade_keys.insert(data.key.clone(), ());

        let target = match &data.target {
            Some(name) => Some(*resolve_name(
                &building_ids,
                name,
                upgrades_file,
                "building",
            )?),
            None => None,
        };
        let effect = match data.effect {
            EffectData::CostReduction => UpgradeEffect::CostReduction {
                factor: data.value,
                target,
            },
            EffectData::ProductionMultiplier => UpgradeEffect::ProductionMultiplier {
                factor: data.value,
            },
            EffectData::ClickMultiplier => UpgradeEffect::ClickMultiplier { factor: data.value },
        };
        builder.register_upgrade(UpgradeDef {
            key: data.key.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            cost: data.cost,
            unlock_level: data.unlock_level,
            effect,
        });
    }

    for data in levels {
        builder.register_level(LevelDef {
            number: data.number,
            name: data.name.clone(),
            description: data.description.clone(),
            unlock_cost: data.unlock_cost,
        });
    }

    Ok(builder.build()?)
}

/// Load a catalog from a content directory containing `buildings`,
/// `upgrades`, and `levels` data files (RON, JSON, or TOML).
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let buildings_file = require_data_file(dir, "buildings")?;
    let upgrades_file = require_data_file(dir, "upgrades")?;
    let levels_file = require_data_file(dir, "levels")?;

    let buildings: Vec<BuildingData> = deserialize_list(&buildings_file, "buildings")?;
    let upgrades: Vec<UpgradeData> = deserialize_list(&upgrades_file, "upgrades")?;
    let levels: Vec<LevelData> = deserialize_list(&levels_file, "levels")?;

    build_catalog(
        &buildings,
        &upgrades,
        &levels,
        &buildings_file,
        &upgrades_file,
    )
}
