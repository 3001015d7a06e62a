//! Serialized, cancellable preset-change pipeline.
//!
//! Preset changes swap the active instrument on a shared synthesizer, which
//! must never happen from two requests at once. The pipeline owns a single
//! worker thread consuming a FIFO command channel, so at most one load is ever
//! in flight, and queued loads can be cancelled atomically when the engine
//! shuts down.

use crate::error::LoadError;
use crate::loader::{EngineAlert, InstrumentLoader};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use fermata_events::EventHub;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle, ThreadId};

/// One requested preset change.
///
/// The loader handle is weak: the pipeline never owns the audio resource, and
/// a request whose loader has been dropped is skipped without side effects.
pub struct ChangeRequest {
    loader: Weak<dyn InstrumentLoader>,
    locator: PathBuf,
    program: u8,
    bank_msb: u8,
    bank_lsb: u8,
    after_load: Option<Box<dyn FnOnce() + Send>>,
}

impl ChangeRequest {
    pub fn new(
        loader: &Arc<dyn InstrumentLoader>,
        locator: impl Into<PathBuf>,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
    ) -> Self {
        Self {
            loader: Arc::downgrade(loader),
            locator: locator.into(),
            program,
            bank_msb,
            bank_lsb,
            after_load: None,
        }
    }

    /// Run `block` on the worker thread once the load attempt finishes.
    ///
    /// The block fires whether or not the load succeeded ("attempt finished"
    /// semantics); it is skipped only when the unit is cancelled.
    pub fn after_load(mut self, block: impl FnOnce() + Send + 'static) -> Self {
        self.after_load = Some(Box::new(block));
        self
    }

    fn display_name(&self) -> String {
        self.locator
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.locator.display().to_string())
    }
}

impl std::fmt::Debug for ChangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRequest")
            .field("locator", &self.locator)
            .field("program", &self.program)
            .field("bank_msb", &self.bank_msb)
            .field("bank_lsb", &self.bank_lsb)
            .finish_non_exhaustive()
    }
}

/// A queued request stamped with the cancellation epoch at enqueue time.
struct WorkUnit {
    request: ChangeRequest,
    epoch: u64,
}

enum Command {
    Change(WorkUnit),
    Drain(Sender<()>),
    Shutdown,
}

/// Strictly-ordered single-concurrency queue of instrument loads.
///
/// `change()` never blocks; `stop()` is the one deliberate blocking operation
/// and returns only after the in-flight load, if any, has finished. Calling
/// `stop()` from the worker thread itself is a contract violation and panics
/// instead of deadlocking.
pub struct PresetPipeline {
    command_tx: Sender<Command>,
    active: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl PresetPipeline {
    /// Spawn the worker thread. Created once per engine; the pipeline starts
    /// out active.
    pub fn new(alerts: EventHub<EngineAlert>) -> Self {
        let (command_tx, command_rx) = unbounded();
        let active = Arc::new(AtomicBool::new(true));
        let epoch = Arc::new(AtomicU64::new(0));

        let worker = thread::Builder::new()
            .name("fermata-preset".into())
            .spawn({
                let active = Arc::clone(&active);
                let epoch = Arc::clone(&epoch);
                move || worker_loop(command_rx, active, epoch, alerts)
            })
            .expect("failed to spawn preset pipeline thread");
        let worker_id = worker.thread().id();

        Self {
            command_tx,
            active,
            epoch,
            worker: Some(worker),
            worker_id,
        }
    }

    /// Accept preset changes again after a `stop()`. Idempotent.
    pub fn start(&self) {
        tracing::debug!("preset pipeline start");
        self.active.store(true, Ordering::SeqCst);
    }

    /// Enqueue one preset change; returns immediately.
    ///
    /// While stopped, requests are silently dropped (policy, not an error).
    /// Each call produces exactly one work unit; rapid successive changes for
    /// the same target are not coalesced.
    pub fn change(&self, request: ChangeRequest) {
        if !self.active.load(Ordering::SeqCst) {
            tracing::debug!(locator = %request.locator.display(), "pipeline stopped, dropping change");
            return;
        }
        let unit = WorkUnit {
            epoch: self.epoch.load(Ordering::SeqCst),
            request,
        };
        let _ = self.command_tx.send(Command::Change(unit));
    }

    /// Stop accepting changes, cancel every pending unit, and block until the
    /// currently executing load (if any) finishes.
    ///
    /// Callers use this to guarantee the shared resource is quiescent before
    /// tearing it down.
    pub fn stop(&self) {
        assert_ne!(
            thread::current().id(),
            self.worker_id,
            "PresetPipeline::stop must not be called from the pipeline worker thread"
        );
        tracing::debug!("preset pipeline stop");
        self.active.store(false, Ordering::SeqCst);
        // Bumping the epoch cancels every unit enqueued before this point.
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let (ack_tx, ack_rx) = bounded(1);
        if self.command_tx.send(Command::Drain(ack_tx)).is_ok() {
            // The worker only reaches the drain marker after the in-flight
            // unit has finished and the cancelled backlog has been discarded.
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for PresetPipeline {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.command_tx.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    rx: Receiver<Command>,
    active: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
    alerts: EventHub<EngineAlert>,
) {
    for command in rx.iter() {
        match command {
            Command::Change(unit) => execute_unit(unit, &active, &epoch, &alerts),
            Command::Drain(ack) => {
                let _ = ack.send(());
            }
            Command::Shutdown => break,
        }
    }
    tracing::debug!("preset pipeline worker exited");
}

/// Run one work unit: pending -> executing -> finished, with cancellation
/// checked before the load commits side effects and again before the
/// completion callback.
fn execute_unit(
    unit: WorkUnit,
    active: &AtomicBool,
    epoch: &AtomicU64,
    alerts: &EventHub<EngineAlert>,
) {
    let WorkUnit {
        request,
        epoch: unit_epoch,
    } = unit;

    let cancelled =
        || !active.load(Ordering::SeqCst) || epoch.load(Ordering::SeqCst) != unit_epoch;

    if cancelled() {
        tracing::debug!(locator = %request.locator.display(), "work unit cancelled before load");
        return;
    }

    let Some(loader) = request.loader.upgrade() else {
        tracing::debug!(locator = %request.locator.display(), "loader gone, skipping load");
        return;
    };

    tracing::debug!(
        locator = %request.locator.display(),
        program = request.program,
        bank_msb = request.bank_msb,
        bank_lsb = request.bank_lsb,
        "loading instrument"
    );

    match loader.load_instrument(
        &request.locator,
        request.program,
        request.bank_msb,
        request.bank_lsb,
    ) {
        Ok(()) => {}
        Err(err) if is_access_denied(&err) => {
            alerts.notify(EngineAlert::FileAccessDenied {
                name: request.display_name(),
            });
        }
        Err(err) => {
            // No retry: repeated failures for the same preset would loop.
            tracing::error!(locator = %request.locator.display(), %err, "instrument load failed");
        }
    }

    // A stop() that raced with the load skips only the completion callback;
    // the load itself is never interrupted mid-operation.
    if cancelled() {
        tracing::debug!(locator = %request.locator.display(), "cancelled during load, skipping completion");
        return;
    }

    if let Some(block) = request.after_load {
        block();
    }
}

fn is_access_denied(err: &LoadError) -> bool {
    match err {
        LoadError::AccessDenied => true,
        LoadError::Io(io) => io.kind() == ErrorKind::PermissionDenied,
        LoadError::Malformed(_) => false,
    }
}
