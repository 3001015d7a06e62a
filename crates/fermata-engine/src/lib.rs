//! Preset loading for fermata.
//!
//! Changing the active instrument on a shared synthesizer is slow and must be
//! serialized; this crate provides:
//!
//! - **[`PresetPipeline`]** - strictly-ordered, single-concurrency, cancellable
//!   queue of instrument loads
//! - **[`InstrumentLoader`]** - the seam between the pipeline and the audio
//!   resource it protects
//! - **[`SamplerEngine`]** - loader + pipeline + alert hub composed as one unit
//! - **[`SoundFontLoader`]** - `.sf2` loader backed by RustySynth
//!   (feature: `soundfont`)
//!
//! Load failures never propagate to the enqueuing caller: permission problems
//! are broadcast as [`EngineAlert`]s, everything else is logged and swallowed.

pub mod error;
pub use error::{LoadError, Result};

mod loader;
pub use loader::{EngineAlert, InstrumentLoader};

mod pipeline;
pub use pipeline::{ChangeRequest, PresetPipeline};

mod engine;
pub use engine::SamplerEngine;

#[cfg(feature = "soundfont")]
mod soundfont;

#[cfg(feature = "soundfont")]
pub use soundfont::SoundFontLoader;
