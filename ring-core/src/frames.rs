//! Frame pump
//!
//! Binds a spectrum source and a visualizer to wall-clock time.  Every
//! produced [`Frame`] advances the source by the elapsed time, ticks
//! the visualizer with the resulting spectrum, and carries the
//! snapshot to draw.  Intents are applied between frames, in the same
//! thread, so they never race a tick.

use crate::analyzer;
use crate::source::SpectrumSource;
use crate::visualizer::{Intent, RenderFrame, RingVisualizer};
use std::time;

/// One produced frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Seconds since the pump was created.
    pub time: f32,
    /// Frame number, counting from zero.
    pub frame: usize,
    /// The snapshot to draw.
    pub view: RenderFrame,
}

/// Drives a [`RingVisualizer`] off a [`SpectrumSource`].
#[derive(Debug)]
pub struct Frames<S: SpectrumSource> {
    source: S,
    visualizer: RingVisualizer,
    scratch: analyzer::Spectrum<Vec<analyzer::Magnitude>>,
    center: (f32, f32),
    start: time::Instant,
    last: time::Instant,
    frame: usize,
}

impl<S: SpectrumSource> Frames<S> {
    /// Wire a source and a visualizer together.
    ///
    /// `center` is the screen position of the volume knob, used to
    /// resolve pointer intents.
    pub fn new(source: S, visualizer: RingVisualizer, center: (f32, f32)) -> Frames<S> {
        let scratch = analyzer::Spectrum::new(vec![0.0; source.buckets()]);
        let now = time::Instant::now();

        Frames {
            source,
            visualizer,
            scratch,
            center,
            start: now,
            last: now,
            frame: 0,
        }
    }

    /// Apply one user intent between frames.
    pub fn apply(&mut self, intent: Intent) {
        self.visualizer
            .apply_intent(intent, self.center, &mut self.source);
    }

    /// Move the knob center, e.g. after a window resize.
    pub fn set_center(&mut self, center: (f32, f32)) {
        self.center = center;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Produce the next frame from the elapsed wall-clock time.
    pub fn next_frame(&mut self) -> Frame {
        let now = time::Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        self.tick(dt)
    }

    /// Produce one frame, advancing the source by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Frame {
        let view = if self.source.fill_spectrum(dt, &mut self.scratch) {
            self.visualizer.tick(Some(&self.scratch))
        } else {
            self.visualizer
                .tick(None::<&analyzer::Spectrum<Vec<analyzer::Magnitude>>>)
        };

        let frame = Frame {
            time: crate::helpers::time(self.start),
            frame: self.frame,
            view,
        };
        self.frame += 1;

        frame
    }

    /// An endless iterator of frames, for simple render loops.
    pub fn iter(&mut self) -> FramesIter<'_, S> {
        FramesIter { frames: self }
    }
}

#[derive(Debug)]
pub struct FramesIter<'a, S: SpectrumSource> {
    frames: &'a mut Frames<S>,
}

impl<'a, S: SpectrumSource> Iterator for FramesIter<'a, S> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.frames.next_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::MIN_LENGTH;
    use crate::source::testing::ScriptedSource;
    use crate::visualizer::RingVisualizer;

    const CENTER: (f32, f32) = (400.0, 300.0);

    fn quiet_visualizer() -> RingVisualizer {
        RingVisualizer::builder().bars(64).jitter(0.0).seed(1).build()
    }

    #[test]
    fn frames_count_up_and_flag_activity() {
        let mut source = ScriptedSource::new(16);
        source.feed(vec![100.0; 16]);
        source.feed_idle();
        source.feed(vec![100.0; 16]);

        let mut frames = Frames::new(source, quiet_visualizer(), CENTER);

        let first = frames.tick(0.016);
        assert_eq!(first.frame, 0);
        assert!(first.view.active);
        assert!((first.view.bands.bass - 15.0).abs() < 1e-3);

        let second = frames.tick(0.016);
        assert_eq!(second.frame, 1);
        assert!(!second.view.active);
        // Bands freeze over the idle frame
        assert_eq!(second.view.bands, first.view.bands);

        let third = frames.tick(0.016);
        assert_eq!(third.frame, 2);
        assert!(third.view.active);
        assert!((third.view.bands.bass - 27.75).abs() < 1e-3);
    }

    #[test]
    fn a_drained_source_goes_idle() {
        let source = ScriptedSource::new(16);
        let mut frames = Frames::new(source, quiet_visualizer(), CENTER);

        let frame = frames.tick(0.016);
        assert!(!frame.view.active);
        assert!(frame.view.bars.iter().all(|b| b.length == MIN_LENGTH));
    }

    #[test]
    fn intents_flow_through_to_the_source() {
        let source = ScriptedSource::new(16);
        let mut frames = Frames::new(source, quiet_visualizer(), CENTER);

        frames.apply(Intent::SetVolume(0.8));
        assert_eq!(frames.source().gain_log, vec![0.8]);

        let frame = frames.tick(0.016);
        assert_eq!(frame.view.volume.target, 0.8);
        assert!((frame.view.volume.current - 0.53).abs() < 1e-6);
    }

    #[test]
    fn iterator_never_ends() {
        let mut source = ScriptedSource::new(16);
        source.feed(vec![50.0; 16]);

        let mut frames = Frames::new(source, quiet_visualizer(), CENTER);

        let numbers: Vec<usize> = frames.iter().take(4).map(|f| f.frame).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }
}
