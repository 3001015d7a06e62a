//! Sampler engine - owns the instrument loader and its preset pipeline.

use crate::loader::{EngineAlert, InstrumentLoader};
use crate::pipeline::{ChangeRequest, PresetPipeline};
use fermata_events::EventHub;
use std::path::PathBuf;
use std::sync::Arc;

/// The audio-engine facade composed at the application root.
///
/// Holds the one strong reference to the loader and the pipeline serializing
/// all program/bank changes against it. Dropping the engine drains the worker.
pub struct SamplerEngine {
    loader: Arc<dyn InstrumentLoader>,
    pipeline: PresetPipeline,
    alerts: EventHub<EngineAlert>,
}

impl SamplerEngine {
    pub fn new(loader: Arc<dyn InstrumentLoader>) -> Self {
        let alerts = EventHub::new();
        let pipeline = PresetPipeline::new(alerts.clone());
        Self {
            loader,
            pipeline,
            alerts,
        }
    }

    /// Hub broadcasting out-of-band load failures (file access denied).
    pub fn alerts(&self) -> &EventHub<EngineAlert> {
        &self.alerts
    }

    pub fn loader(&self) -> &Arc<dyn InstrumentLoader> {
        &self.loader
    }

    pub fn pipeline(&self) -> &PresetPipeline {
        &self.pipeline
    }

    /// Resume accepting preset changes.
    pub fn start(&self) {
        self.pipeline.start();
    }

    /// Cancel queued preset changes and block until the engine is quiescent.
    pub fn stop(&self) {
        self.pipeline.stop();
    }

    /// Queue a preset load; fire-and-forget.
    pub fn load_preset(
        &self,
        locator: impl Into<PathBuf>,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
    ) {
        self.pipeline.change(ChangeRequest::new(
            &self.loader,
            locator,
            program,
            bank_msb,
            bank_lsb,
        ));
    }

    /// Queue a preset load and run `after_load` on the worker once the
    /// attempt finishes (skipped if the unit is cancelled).
    pub fn load_preset_then(
        &self,
        locator: impl Into<PathBuf>,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
        after_load: impl FnOnce() + Send + 'static,
    ) {
        self.pipeline.change(
            ChangeRequest::new(&self.loader, locator, program, bank_msb, bank_lsb)
                .after_load(after_load),
        );
    }
}
