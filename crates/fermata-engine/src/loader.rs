//! Instrument loading seam between the pipeline and the audio engine.

use crate::error::Result;
use std::path::Path;

/// The shared audio-engine resource the pipeline serializes access to.
///
/// Implementations perform the (potentially slow, blocking) swap of the active
/// instrument program. The pipeline guarantees `load_instrument` is never
/// called concurrently; no other component may change program/bank state while
/// a pipeline holds a handle to the loader.
pub trait InstrumentLoader: Send + Sync {
    /// Load the instrument at `locator`, selecting `program` within the bank
    /// addressed by `bank_msb`/`bank_lsb`.
    fn load_instrument(
        &self,
        locator: &Path,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
    ) -> Result<()>;
}

/// Out-of-band conditions broadcast by the engine.
///
/// Load failures are invisible to the caller of `change()` except for this
/// side channel; UI layers subscribe to surface user-facing alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAlert {
    /// An instrument file could not be read due to missing permissions.
    /// Carries the file's display name.
    FileAccessDenied { name: String },
}
