//! SoundFont instrument loading backed by RustySynth.

use crate::error::{LoadError, Result};
use crate::loader::InstrumentLoader;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// MIDI status/controller numbers for bank select + program change.
const CONTROL_CHANGE: i32 = 0xB0;
const PROGRAM_CHANGE: i32 = 0xC0;
const BANK_SELECT_MSB: i32 = 0x00;
const BANK_SELECT_LSB: i32 = 0x20;

/// `.sf2`-backed [`InstrumentLoader`] with a parse cache.
///
/// Parsed SoundFonts are cached per path so switching between presets of the
/// same file only rebuilds the synthesizer. Loading is expected to be called
/// from the preset pipeline only; the synthesizer slot is mutex-guarded so the
/// render side never observes a half-swapped instrument.
pub struct SoundFontLoader {
    sample_rate: u32,
    fonts: DashMap<PathBuf, Arc<SoundFont>>,
    synth: Mutex<Option<Synthesizer>>,
}

impl SoundFontLoader {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            fonts: DashMap::new(),
            synth: Mutex::new(None),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether an instrument is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.synth.lock().is_some()
    }

    /// Number of parsed SoundFont files held in the cache.
    pub fn cached_fonts(&self) -> usize {
        self.fonts.len()
    }

    fn font_for(&self, path: &Path) -> Result<Arc<SoundFont>> {
        if let Some(font) = self.fonts.get(path) {
            return Ok(Arc::clone(&font));
        }

        // Parse outside any lock; the permission case is distinguished so the
        // pipeline can surface it on the alert hub.
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::PermissionDenied => LoadError::AccessDenied,
            _ => LoadError::Io(err),
        })?;
        let mut reader = BufReader::new(file);
        let font = Arc::new(SoundFont::new(&mut reader).map_err(|err| {
            LoadError::Malformed(format!("{}: {}", path.display(), err))
        })?);

        self.fonts.insert(path.to_path_buf(), Arc::clone(&font));
        Ok(font)
    }

    pub fn note_on(&self, channel: i32, key: i32, velocity: i32) {
        if let Some(synth) = self.synth.lock().as_mut() {
            synth.note_on(channel, key, velocity);
        }
    }

    pub fn note_off(&self, channel: i32, key: i32) {
        if let Some(synth) = self.synth.lock().as_mut() {
            synth.note_off(channel, key);
        }
    }

    /// Render the next block of stereo audio; silence when nothing is loaded.
    pub fn render(&self, left: &mut [f32], right: &mut [f32]) {
        let mut guard = self.synth.lock();
        match guard.as_mut() {
            Some(synth) => synth.render(left, right),
            None => {
                left.fill(0.0);
                right.fill(0.0);
            }
        }
    }
}

impl InstrumentLoader for SoundFontLoader {
    fn load_instrument(
        &self,
        locator: &Path,
        program: u8,
        bank_msb: u8,
        bank_lsb: u8,
    ) -> Result<()> {
        let font = self.font_for(locator)?;
        let settings = SynthesizerSettings::new(self.sample_rate as i32);
        let mut synth = Synthesizer::new(&font, &settings)
            .map_err(|err| LoadError::Malformed(err.to_string()))?;

        // Bank select before program change, standard MIDI ordering.
        synth.process_midi_message(0, CONTROL_CHANGE, BANK_SELECT_MSB, bank_msb as i32);
        synth.process_midi_message(0, CONTROL_CHANGE, BANK_SELECT_LSB, bank_lsb as i32);
        synth.process_midi_message(0, PROGRAM_CHANGE, program as i32, 0);

        *self.synth.lock() = Some(synth);
        Ok(())
    }
}
