use serde::{Deserialize, Serialize};

/// Identifies a building definition in the catalog. Cheap to copy and compare.
///
/// Dense index into the catalog's registration order. Runtime-only: saves
/// reference definitions by their stable string key, never by this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Identifies an upgrade definition in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub u32);

/// Level numbers are contiguous and start at 1.
pub type Level = u32;

/// Ticks are the atomic unit of simulated time.
pub type Tick = u64;
