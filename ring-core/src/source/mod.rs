//! Audio sources
//!
//! Everything that produces spectra for the visualizer.  The central
//! piece is the [`AudioDeck`], which owns at most one bound WAV file
//! and at most one live capture, clocks samples into a ring and runs
//! the Fourier analyzer over it once per tick.  Live capture always
//! wins over a bound file; stopping it falls back to the file, paused.

pub mod file;

#[cfg(feature = "livecapture")]
pub mod live;

use crate::analyzer;
use std::path;

pub use self::file::WavSource;
#[cfg(feature = "livecapture")]
pub use self::live::LiveInput;

/// Errors from binding or driving an audio source.
///
/// None of these are fatal to the visualizer; a failed bind leaves the
/// deck exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no input device available")]
    NoDevice,

    #[error("live capture is not compiled in")]
    CaptureDisabled,

    #[error("failed to read audio file: {0}")]
    File(#[from] hound::Error),

    #[error("malformed audio file: {0}")]
    Malformed(String),

    #[error("capture failed: {0}")]
    Capture(String),
}

/// A source of per-tick spectra.
///
/// The visualizer only ever talks to this trait; the deck implements it
/// for real audio and tests substitute scripted sources.
pub trait SpectrumSource: std::fmt::Debug {
    /// Advance by `dt` seconds and write the current spectrum.
    ///
    /// Returns `false` while no signal is active; `out` is left
    /// untouched in that case.  `out` must have [`buckets`] buckets.
    ///
    /// [`buckets`]: SpectrumSource::buckets
    fn fill_spectrum(
        &mut self,
        dt: f32,
        out: &mut analyzer::Spectrum<Vec<analyzer::Magnitude>>,
    ) -> bool;

    /// Number of buckets written per fill.
    fn buckets(&self) -> usize;

    /// Set the gain applied to file playback, clamped to `[0, 1]`.
    ///
    /// Takes effect from the next tick on.  The live signal is
    /// analyzed as captured and not scaled.
    fn set_gain(&mut self, gain: f32);

    fn gain(&self) -> f32;

    /// Start or resume file playback.  Ignored while capturing live or
    /// with no file bound; a finished file starts over.
    fn play(&mut self);

    /// Pause file playback, keeping the position.
    fn pause(&mut self);

    /// Start live capture, or stop it and fall back to the bound file.
    fn toggle_live(&mut self) -> Result<(), SourceError>;

    /// Drop everything and go idle.
    fn stop(&mut self);

    /// Whether the next fill will deliver a spectrum.
    fn is_active(&self) -> bool;

    fn is_live(&self) -> bool;
}

/// Builder for [`AudioDeck`]
#[derive(Debug, Default)]
pub struct DeckBuilder {
    /// Ring size in frames
    ///
    /// Grows to at least one analyzer window.
    ///
    /// Can also be set from config as `"audio.buffer"`.
    pub buffer_size: Option<usize>,

    /// The Fourier analyzer to run
    ///
    /// Defaults to one planned entirely from config.
    pub fourier: Option<analyzer::FourierAnalyzer>,
}

impl DeckBuilder {
    pub fn new() -> DeckBuilder {
        Default::default()
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut DeckBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn fourier(&mut self, fourier: analyzer::FourierAnalyzer) -> &mut DeckBuilder {
        self.fourier = Some(fourier);
        self
    }

    pub fn build(&mut self) -> AudioDeck {
        let fourier = self
            .fourier
            .take()
            .unwrap_or_else(|| analyzer::FourierBuilder::new().plan());
        let buffer_size = self
            .buffer_size
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.buffer", 16384))
            .max(fourier.window_size());

        log::debug!("AudioDeck:");
        log::debug!("    Ring Size = {:8} frames", buffer_size);
        log::debug!("    Buckets   = {:8}", fourier.buckets());

        AudioDeck {
            fourier,
            buffer_size,
            gain: 1.0,
            playing: false,
            wav: None,
            ring: None,
            #[cfg(feature = "livecapture")]
            live: None,
            pump: Vec::new(),
        }
    }
}

/// The audio deck: file playback and live capture behind one facade.
///
/// State machine per the `toggle`/`switch` operations:
/// idle → file bound (paused) → playing ⇄ paused, with live capture
/// layered on top and shadowing the file while it runs.
#[derive(Debug)]
pub struct AudioDeck {
    fourier: analyzer::FourierAnalyzer,
    buffer_size: usize,
    gain: f32,
    playing: bool,

    wav: Option<file::WavSource>,
    ring: Option<analyzer::SampleBuffer>,

    #[cfg(feature = "livecapture")]
    live: Option<live::LiveInput>,

    pump: Vec<[f32; 2]>,
}

impl AudioDeck {
    pub fn builder() -> DeckBuilder {
        DeckBuilder::new()
    }

    /// Bind a WAV file, stopping live capture.
    ///
    /// The file starts paused at the beginning.  On failure the deck
    /// keeps whatever it was doing.
    pub fn switch_to_file<P: AsRef<path::Path>>(&mut self, path: P) -> Result<(), SourceError> {
        let wav = file::WavSource::open(path.as_ref())?;

        #[cfg(feature = "livecapture")]
        {
            self.live = None;
        }

        self.ring = Some(analyzer::SampleBuffer::new(self.buffer_size, wav.rate()));
        self.fourier.reset();
        self.playing = false;
        self.wav = Some(wav);

        Ok(())
    }

    /// Start live capture, shadowing a bound file.
    ///
    /// The file stops and rewinds; the analyzer starts over on the
    /// live signal.  On failure the deck keeps whatever it was doing.
    #[cfg(feature = "livecapture")]
    pub fn switch_to_live(&mut self) -> Result<(), SourceError> {
        if self.live.is_some() {
            return Ok(());
        }

        let live = live::LiveInput::open(self.buffer_size)?;

        self.playing = false;
        if let Some(wav) = self.wav.as_mut() {
            wav.rewind();
        }
        self.fourier.reset();

        log::debug!("Live capture running at {} Hz", live.rate());
        self.live = Some(live);

        Ok(())
    }

    #[cfg(not(feature = "livecapture"))]
    pub fn switch_to_live(&mut self) -> Result<(), SourceError> {
        Err(SourceError::CaptureDisabled)
    }
}

impl SpectrumSource for AudioDeck {
    fn fill_spectrum(
        &mut self,
        dt: f32,
        out: &mut analyzer::Spectrum<Vec<analyzer::Magnitude>>,
    ) -> bool {
        #[cfg(feature = "livecapture")]
        if let Some(live) = self.live.as_ref() {
            let spectrum = self.fourier.analyze(live.buffer());
            out.fill_from(&spectrum);
            return true;
        }

        if !self.playing {
            return false;
        }
        let (wav, ring) = match (self.wav.as_mut(), self.ring.as_ref()) {
            (Some(wav), Some(ring)) => (wav, ring),
            _ => return false,
        };

        // Clock real time worth of frames into the ring, capped at one
        // second so a scheduling hitch cannot skip ahead
        let want = ((dt * ring.rate() as f32).round() as usize).min(ring.rate());
        self.pump.clear();
        wav.read_into(&mut self.pump, want, self.gain);
        if !self.pump.is_empty() {
            ring.push(&self.pump);
        }

        if wav.is_finished() {
            log::debug!("Playback finished");
            self.playing = false;
        }

        let spectrum = self.fourier.analyze(ring);
        out.fill_from(&spectrum);
        true
    }

    fn buckets(&self) -> usize {
        self.fourier.buckets()
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn play(&mut self) {
        if self.is_live() || self.wav.is_none() {
            log::trace!("Play ignored, no pausable source");
            return;
        }

        if let Some(wav) = self.wav.as_mut() {
            if wav.is_finished() {
                wav.rewind();
            }
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn toggle_live(&mut self) -> Result<(), SourceError> {
        #[cfg(feature = "livecapture")]
        {
            if self.live.is_some() {
                self.live = None;
                self.fourier.reset();
                log::debug!("Live capture stopped");
                return Ok(());
            }
            return self.switch_to_live();
        }

        #[cfg(not(feature = "livecapture"))]
        {
            Err(SourceError::CaptureDisabled)
        }
    }

    fn stop(&mut self) {
        #[cfg(feature = "livecapture")]
        {
            self.live = None;
        }

        self.wav = None;
        self.ring = None;
        self.playing = false;
        self.fourier.reset();
    }

    fn is_active(&self) -> bool {
        self.is_live() || (self.playing && self.wav.is_some())
    }

    fn is_live(&self) -> bool {
        #[cfg(feature = "livecapture")]
        {
            return self.live.is_some();
        }

        #[cfg(not(feature = "livecapture"))]
        {
            false
        }
    }
}
