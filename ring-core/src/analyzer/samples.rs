//! Sample buffer
//!
//! Fixed-size stereo ring shared between a producer (the live capture
//! callback or the file deck) and the Fourier analyzer.  The ring is
//! prefilled with silence, so a fresh buffer analyzes as silence
//! instead of garbage.
use std::collections;
use std::sync;

pub type Sample = f32;

type Shared = sync::Arc<parking_lot::Mutex<collections::VecDeque<[Sample; 2]>>>;

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    buf: Shared,
    rate: usize,
}

impl SampleBuffer {
    pub fn new(size: usize, rate: usize) -> SampleBuffer {
        debug_assert!(size > 0, "sample ring must hold at least one frame");
        let buf = collections::VecDeque::from(vec![[0.0; 2]; size]);

        SampleBuffer {
            buf: sync::Arc::new(parking_lot::Mutex::new(buf)),
            rate,
        }
    }

    /// Sample rate of the signal in this buffer.
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Number of frames the ring holds.
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append frames, dropping the oldest ones to keep the size fixed.
    pub fn push(&self, new: &[[Sample; 2]]) {
        let mut lock = self.buf.lock();

        #[cfg(debug_assertions)]
        let debug_size = lock.len();

        for sample in new.iter() {
            lock.pop_front();
            lock.push_back(*sample);
        }

        #[cfg(debug_assertions)]
        assert_eq!(debug_size, lock.len(), "Sample buffer size differs!");
    }

    /// Iterate over the newest `size` frames, stepping by `downsample`.
    ///
    /// Yields fewer frames if the ring is smaller than the requested
    /// window.  The ring stays locked for the lifetime of the iterator.
    pub fn iter(&self, size: usize, downsample: usize) -> SampleIterator<'_> {
        let lock = self.buf.lock();

        SampleIterator {
            index: lock.len().saturating_sub(size * downsample),
            buf: lock,
            downsample,
        }
    }
}

pub struct SampleIterator<'a> {
    buf: parking_lot::MutexGuard<'a, collections::VecDeque<[Sample; 2]>>,
    index: usize,
    downsample: usize,
}

impl Iterator for SampleIterator<'_> {
    type Item = [f32; 2];

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.buf.get(self.index).cloned();
        self.index += self.downsample;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let buf = SampleBuffer::new(16, 44100);

        assert_eq!(buf.len(), 16);
        assert!(buf.iter(16, 1).all(|s| s == [0.0; 2]));
    }

    #[test]
    fn push_overwrites_oldest() {
        let buf = SampleBuffer::new(16, 44100);

        buf.push(
            &(100..120)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        buf.push(
            &(0..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        assert_eq!(
            buf.iter(16, 1).collect::<Vec<_>>(),
            (16..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn downsampled_window() {
        let buf = SampleBuffer::new(32, 44100);

        buf.push(
            &(0..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        assert_eq!(
            &buf.iter(7, 4).collect::<Vec<_>>(),
            &[[4.0; 2], [8.0; 2], [12.0; 2], [16.0; 2], [20.0; 2], [24.0; 2], [28.0; 2],]
        );
    }

    #[test]
    fn oversized_request_is_clipped() {
        let buf = SampleBuffer::new(8, 44100);

        assert_eq!(buf.iter(16, 1).count(), 8);
    }
}
