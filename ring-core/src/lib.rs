//! The core of a real-time audio visualizer: a ring of bars dancing
//! to the spectrum, a kick-driven flash and a volume knob.
//!
//! Audio comes from a WAV file or the default capture device, gets
//! Fourier-analyzed into a byte spectrum, reduced to bass/mid/high
//! band levels with kick detection, and mapped onto a fixed ring of
//! bars.  Every tick produces an immutable [`RenderFrame`] snapshot;
//! drawing it is left to a frontend.
//!
//! # Example
//! ```rust
//! fn main() {
//!     // Initialize the logger.  Take a look at the sources if you want to customize
//!     // the logger.
//!     ring_core::default_log();
//!
//!     // Load the default config source.  More about config later on.  You can also
//!     // do this manually if you have special requirements.
//!     ring_core::default_config();
//!
//!     // The deck is the audio side: bind a WAV file with
//!     // `switch_to_file` or start capturing with a `ToggleLive`
//!     // intent.  Unbound it stays idle, which is fine for this
//!     // example.
//!     let deck = ring_core::AudioDeck::builder().build();
//!
//!     let visualizer = ring_core::RingVisualizer::builder()
//!         .bars(64)
//!         .build();
//!
//!     // The frame pump ties both to wall-clock time.  The center is
//!     // where pointer intents look for the volume knob.
//!     let mut frames = ring_core::Frames::new(deck, visualizer, (400.0, 300.0));
//!
//!     for frame in frames.iter() {
//!         // This is just a primitive example, your render code belongs here
//!         for _ in 0..frame.view.bands.bass as usize {
//!             print!("#");
//!         }
//!         println!();
//!         std::thread::sleep(std::time::Duration::from_millis(30));
//! #
//! #       if frame.frame > 20 {
//! #           break;
//! #       }
//!     }
//! }
//! ```

pub mod analyzer;
pub mod bars;
pub mod frames;
pub mod helpers;
pub mod knob;
pub mod source;
pub mod visualizer;

#[doc(inline)]
pub use crate::frames::{Frame, Frames};
#[doc(inline)]
pub use crate::knob::PointerEvent;
#[doc(inline)]
pub use crate::source::{AudioDeck, SpectrumSource};
#[doc(inline)]
pub use crate::visualizer::{Intent, RenderFrame, RingVisualizer};

/// `ezconf` configuration
///
/// Usually you will call [`default_config`](fn.default_config.html) in the beginning
/// which will populate this object, but you can also specify your own custom config
/// sources.
///
/// # Example
/// To make use of this config, use code similar to this:
///
/// ```rust
/// # ring_core::default_config();
/// let some_configurable_value = ring_core::CONFIG.get_or(
///     // Toml path to value
///     "ring.bars.count",
///     // Default value.  Type gets inferred from this
///     64,
/// );
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./ringvis.toml`
/// * `./config/ringvis.toml`
/// * Defaults from code
pub fn default_config() {
    CONFIG
        .init(
            [
                ezconf::Source::File("ringvis.toml"),
                ezconf::Source::File("config/ringvis.toml"),
            ]
            .iter(),
        )
        .expect("Can't load config");
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}
