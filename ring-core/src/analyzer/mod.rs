pub mod bands;
pub mod fourier;
pub mod kick;
pub mod samples;
pub mod spectrum;

pub use self::bands::{BandAnalyzer, BandLevels};
pub use self::fourier::{window, FourierAnalyzer, FourierBuilder};
pub use self::kick::KickDetector;
pub use self::samples::{Sample, SampleBuffer};
pub use self::spectrum::{Magnitude, Spectrum, Storage, StorageMut, MAX_MAGNITUDE};
