//! Fourier analysis
//!
//! Turns the sample ring into the byte-scaled magnitude spectrum the
//! rest of the crate consumes.  The shape of the output follows the
//! classic analyser contract: linear magnitudes are smoothed over time
//! with a constant factor, converted to decibels and mapped from the
//! `[-100 dB, -30 dB]` range onto `0..=255`.
use super::Sample;
use crate::analyzer;
use crate::helpers;
use rustfft::num_complex::Complex;

/// Decibel value that maps to magnitude 0.
pub const MIN_DB: f32 = -100.0;

/// Decibel value that maps to magnitude 255.
pub const MAX_DB: f32 = -30.0;

/// Linear magnitude floor to keep the logarithm finite.
const MIN_LINEAR: f32 = 1e-10;

/// Window functions
///
/// A window-function in this case takes a size and should return a `Vec` of
/// that length filled with the precomputed window coefficients.
pub mod window {
    /// Blackman Window
    ///
    /// The default; spectral analysis of this kind traditionally
    /// windows with Blackman coefficients.
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Nuttall Window
    pub fn nuttall(size: usize) -> Vec<f32> {
        apodize::nuttall_iter(size).map(|f| f as f32).collect()
    }

    /// Triangular Window
    pub fn triangular(size: usize) -> Vec<f32> {
        apodize::triangular_iter(size).map(|f| f as f32).collect()
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            "nuttall" => Some(nuttall),
            "triangular" => Some(triangular),
            _ => None,
        }
    }
}

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// Most efficient if this is a power of two.  The resulting
    /// spectrum has half as many buckets.
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub length: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`] module.
    ///
    /// Can also be set from config as `"audio.fourier.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,

    /// Downsampling factor
    ///
    /// Can also be set from config as `"audio.fourier.downsample"`.
    pub downsample: Option<usize>,

    /// Time smoothing factor in `[0, 1)`
    ///
    /// Every analysis folds new magnitudes into the previous ones with
    /// this weight on the old value.  `0.0` disables the history,
    /// values near `1.0` react very slowly.
    ///
    /// Can also be set from config as `"audio.fourier.smoothing"`.
    pub smoothing: Option<f32>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut FourierBuilder {
        self.window = Some(f);
        self
    }

    /// Set the downsampling factor
    pub fn downsample(&mut self, factor: usize) -> &mut FourierBuilder {
        self.downsample = Some(factor);
        self
    }

    /// Set the time smoothing factor
    pub fn smoothing(&mut self, smoothing: f32) -> &mut FourierBuilder {
        self.smoothing = Some(smoothing);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&mut self) -> FourierAnalyzer {
        let length = self
            .length
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.length", 1024));
        let window = (self.window.unwrap_or_else(|| {
            window::from_str(&crate::CONFIG.get_or("audio.fourier.window", "blackman".to_string()))
                .expect("Selected window type not found!")
        }))(length);
        let downsample = self
            .downsample
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.downsample", 1));
        let smoothing = self
            .smoothing
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.smoothing", 0.8));

        FourierAnalyzer::new(length, window, downsample, smoothing)
    }
}

/// Fourier Analyzer
///
/// # Example
/// ```
/// # use ring_core::analyzer::fourier::*;
/// let analyzer = FourierBuilder::new()
///     .length(1024)
///     .window(window::blackman)
///     .downsample(1)
///     .smoothing(0.8)
///     .plan();
/// ```
#[derive(Clone)]
pub struct FourierAnalyzer {
    length: usize,
    buckets: usize,
    window: Vec<Sample>,
    downsample: usize,
    smoothing: f32,

    // Normalization factors, precomputed from the window sum
    dc_norm: f32,
    ac_norm: f32,

    fft: std::sync::Arc<dyn rustfft::Fft<Sample>>,

    input: Vec<Complex<Sample>>,
    linear: Vec<f32>,

    spectrum: analyzer::Spectrum<Vec<analyzer::Magnitude>>,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, buckets: {:?}, downsample: {:?}, smoothing: {:?} }}",
            self.length, self.buckets, self.downsample, self.smoothing,
        )
    }
}

impl FourierAnalyzer {
    fn new(length: usize, window: Vec<f32>, downsample: usize, smoothing: f32) -> FourierAnalyzer {
        let mut planner = rustfft::FftPlanner::new();
        let fft = planner.plan_fft_forward(length);
        let buckets = length / 2;

        let window_sum: f32 = window.iter().sum();

        let fa = FourierAnalyzer {
            length,
            buckets,
            window,
            downsample,
            smoothing,

            dc_norm: 1.0 / window_sum,
            ac_norm: 2.0 / window_sum,

            fft,

            input: Vec::with_capacity(length),
            linear: vec![0.0; buckets],

            spectrum: analyzer::Spectrum::new(vec![0.0; buckets]),
        };

        log::debug!("FourierAnalyzer({:p}):", &fa);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Buckets             = {:8}", buckets);
        log::debug!("    Downsample          = {:8}", downsample);
        log::debug!("    Time Smoothing      = {:8.3}", smoothing);

        fa
    }

    /// Return the number of buckets
    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Samples consumed per analysis, including downsampling.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.length * self.downsample
    }

    /// Analyze a `SampleBuffer`
    ///
    /// Mixes both channels down, windows them and transforms.  Returns
    /// the byte-scaled spectrum, which stays valid until the next
    /// analysis.
    pub fn analyze(
        &mut self,
        buf: &analyzer::SampleBuffer,
    ) -> analyzer::Spectrum<&[analyzer::Magnitude]> {
        log::trace!("FourierAnalyzer({:p}): Analyzing ...", self);

        // Mix down into the windowed transform input
        self.input.clear();
        for ([l, r], window) in buf
            .iter(self.length, self.downsample)
            .zip(self.window.iter())
        {
            self.input
                .push(Complex::new((l + r) * 0.5 * window, 0.0));
        }

        // Undersized rings analyze as if padded with silence
        self.input.resize(self.length, Complex::new(0.0, 0.0));

        self.fft.process(&mut self.input);

        for (bucket, (smoothed, out)) in self.linear.iter_mut().zip(self.input.iter()).enumerate()
        {
            let norm = if bucket == 0 { self.dc_norm } else { self.ac_norm };
            let magnitude = out.norm() * norm;

            *smoothed = *smoothed * self.smoothing + magnitude * (1.0 - self.smoothing);

            let db = 20.0 * smoothed.max(MIN_LINEAR).log10();
            self.spectrum[bucket] = helpers::map_range(db, MIN_DB, MAX_DB, 0.0, analyzer::MAX_MAGNITUDE)
                .clamp(0.0, analyzer::MAX_MAGNITUDE);
        }

        self.spectrum.as_ref()
    }

    /// Get the spectrum from the last transform
    pub fn last(&self) -> analyzer::Spectrum<&[analyzer::Magnitude]> {
        self.spectrum.as_ref()
    }

    /// Forget the smoothing history.
    ///
    /// Used when the signal source changes, so the new source does not
    /// inherit the spectrum of the old one.
    pub fn reset(&mut self) {
        for s in self.linear.iter_mut() {
            *s = 0.0;
        }
        for s in self.spectrum.iter_mut() {
            *s = 0.0;
        }
    }
}
