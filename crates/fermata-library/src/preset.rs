//! Preset addressing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a preset lives: an instrument file plus program/bank select.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetLocation {
    pub path: PathBuf,
    pub program: u8,
    pub bank_msb: u8,
    pub bank_lsb: u8,
}

impl PresetLocation {
    pub fn new(path: impl Into<PathBuf>, program: u8, bank_msb: u8, bank_lsb: u8) -> Self {
        Self {
            path: path.into(),
            program,
            bank_msb,
            bank_lsb,
        }
    }

    /// File name shown to the user, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
