//! Shared test doubles.

use fermata::{InstrumentLoader, LoadError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Records every load and signals a channel so tests can wait for the
/// pipeline to drain without sleeping.
#[derive(Default)]
pub struct RecordingLoader {
    calls: Mutex<Vec<(PathBuf, u8, u8, u8)>>,
    loaded_tx: Mutex<Option<crossbeam_channel::Sender<PathBuf>>>,
}

impl RecordingLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a receiver that gets one message per completed load.
    pub fn loaded_signal(&self) -> crossbeam_channel::Receiver<PathBuf> {
        let (tx, rx) = crossbeam_channel::unbounded();
        *self.loaded_tx.lock() = Some(tx);
        rx
    }

    pub fn calls(&self) -> Vec<(PathBuf, u8, u8, u8)> {
        self.calls.lock().clone()
    }
}

impl InstrumentLoader for RecordingLoader {
    fn load_instrument(
        &self,
        locator: &Path,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
    ) -> Result<(), LoadError> {
        self.calls
            .lock()
            .push((locator.to_path_buf(), program, bank_msb, bank_lsb));
        if let Some(tx) = self.loaded_tx.lock().as_ref() {
            let _ = tx.send(locator.to_path_buf());
        }
        Ok(())
    }
}
