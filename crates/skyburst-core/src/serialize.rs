//! Versioned save serialization.
//!
//! Provides binary serialization of a [`SavedGame`] via `bitcode` with a
//! versioned header. The engine only produces and consumes [`SavedGame`]
//! values ([`crate::engine::Engine::snapshot`] /
//! [`crate::engine::Engine::restore`]); reading and writing the bytes is
//! the host persistence adapter's job, and a bad payload surfaces as a
//! [`DeserializeError`] for the adapter to handle -- never a crash.
//!
//! Saves reference catalog entries by stable string key. On restore,
//! unknown keys (entries removed from the catalog since the save) are
//! ignored, and catalog entries missing from the payload (added since the
//! save) default to zero count / not purchased.

use crate::id::{Level, Tick};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a Skyburst save.
pub const SAVE_MAGIC: u32 = 0x534B_5942;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SAVE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("save from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Save header
// ---------------------------------------------------------------------------

/// Header carried by every save. Enables format detection and version
/// checking before the payload is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic number for format detection.
    pub magic: u32,
    /// Format version for forward compatibility.
    pub version: u32,
    /// Wall-clock timestamp supplied by the persistence adapter (the engine
    /// itself never reads a clock). Seconds since the Unix epoch.
    pub saved_at: u64,
}

impl SaveHeader {
    /// Create a header for the current format version.
    pub fn new(saved_at: u64) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: FORMAT_VERSION,
            saved_at,
        }
    }

    /// Validate the header. Returns `Ok(())` if valid.
    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SAVE_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Save payload
// ---------------------------------------------------------------------------

/// A building entry in a save. Only the key and count are persisted;
/// definitions stay in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuilding {
    pub key: String,
    pub count: u32,
}

/// An upgrade entry in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedUpgrade {
    pub key: String,
    pub purchased: bool,
}

/// The complete saveable state of a game: a point-in-time copy of the
/// player state, keyed by stable catalog keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub header: SaveHeader,
    pub sparks: f64,
    pub innovation: f64,
    pub level: Level,
    pub tick: Tick,
    pub buildings: Vec<SavedBuilding>,
    pub upgrades: Vec<SavedUpgrade>,
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Serialize a save to bytes.
pub fn encode_save(save: &SavedGame) -> Result<Vec<u8>, SerializeError> {
    bitcode::serialize(save).map_err(|e| SerializeError::Encode(e.to_string()))
}

/// Deserialize and validate a save from bytes.
pub fn decode_save(data: &[u8]) -> Result<SavedGame, DeserializeError> {
    let save: SavedGame =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    save.header.validate()?;
    Ok(save)
}

/// Try to read just the header from serialized data, without validating it.
///
/// This decodes the full save but only returns the header, enabling
/// version detection before deciding what to do with the payload.
pub fn read_save_header(data: &[u8]) -> Result<SaveHeader, DeserializeError> {
    let save: SavedGame =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    Ok(save.header)
}
