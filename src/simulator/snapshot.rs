// src/simulator/snapshot.rs - Recorded pin state loaded from TOML
use crate::client::FirmwareInfo;
use crate::pintable::Pin;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Snapshot has {0} pins, Firmata addresses at most 128")]
    TooManyPins(usize),
}

/// Firmata allows 7-bit pin ids.
pub const MAX_PINS: usize = 128;

/// ```toml
/// [firmware]
/// protocol_version = "2.5"
/// firmware_name = "StandardFirmata"
/// firmware_version = "2.5"
///
/// [[pins]]
/// mode = "O"
/// modes = ["I", "O", "PULLUP"]
/// value = 1
/// state = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub firmware: FirmwareInfo,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

impl BoardSnapshot {
    pub fn parse(contents: &str) -> Result<Self, SnapshotError> {
        let snapshot: BoardSnapshot = toml::from_str(contents)?;
        if snapshot.pins.len() > MAX_PINS {
            return Err(SnapshotError::TooManyPins(snapshot.pins.len()));
        }
        Ok(snapshot)
    }
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<BoardSnapshot, SnapshotError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read snapshot '{}': {}", path.display(), e);
        SnapshotError::Io(e)
    })?;
    BoardSnapshot::parse(&contents).map_err(|e| {
        tracing::error!("Failed to parse snapshot '{}': {}", path.display(), e);
        e
    })
}
