//! WAV file input
//!
//! Decodes a whole file up front into stereo frames.  The deck then
//! clocks those frames into the analysis ring in real time, which keeps
//! the spectrum in sync with a wall clock without any audio output
//! dependency.
use crate::source::SourceError;
use std::path;

pub struct WavSource {
    frames: Vec<[f32; 2]>,
    cursor: usize,
    rate: usize,
}

impl std::fmt::Debug for WavSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "WavSource {{ rate: {:?}, frames: {:?}, cursor: {:?} }}",
            self.rate,
            self.frames.len(),
            self.cursor,
        )
    }
}

impl WavSource {
    /// Decode a WAV file.
    ///
    /// Integer samples of any supported bit depth are scaled to
    /// `[-1, 1]`.  Mono files play on both channels, files with more
    /// than two channels are mixed down.
    pub fn open(path: &path::Path) -> Result<WavSource, SourceError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(SourceError::Malformed("file reports zero channels".into()));
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(SourceError::Malformed(format!(
                        "unsupported bit depth {}",
                        spec.bits_per_sample
                    )));
                }
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let frames = samples
            .chunks_exact(channels)
            .map(|frame| match frame {
                [l, r] => [*l, *r],
                [m] => [*m, *m],
                _ => {
                    let m = frame.iter().sum::<f32>() / channels as f32;
                    [m, m]
                }
            })
            .collect::<Vec<_>>();

        log::debug!("WavSource({:?}):", path);
        log::debug!("    Rate     = {:8} Hz", spec.sample_rate);
        log::debug!("    Channels = {:8}", channels);
        log::debug!("    Frames   = {:8}", frames.len());

        Ok(WavSource {
            frames,
            cursor: 0,
            rate: spec.sample_rate as usize,
        })
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Total number of frames in the file.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Current playback position in frames.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Append up to `count` frames to `out`, scaled by `gain`.
    ///
    /// Advances the play cursor and returns how many frames were
    /// actually taken, which is less than `count` only at the end of
    /// the file.
    pub fn read_into(&mut self, out: &mut Vec<[f32; 2]>, count: usize, gain: f32) -> usize {
        let end = (self.cursor + count).min(self.frames.len());
        for frame in &self.frames[self.cursor..end] {
            out.push([frame[0] * gain, frame[1] * gain]);
        }

        let taken = end - self.cursor;
        self.cursor = end;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav(name: &str, channels: u16, samples: &[i16]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ring-core-file-{}-{}.wav",
            std::process::id(),
            name
        ));

        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        path
    }

    #[test]
    fn decodes_stereo() {
        let path = temp_wav("stereo", 2, &[16384, -16384, 0, 32767]);

        let mut wav = WavSource::open(&path).unwrap();
        assert_eq!(wav.rate(), 44100);
        assert_eq!(wav.len(), 2);

        let mut out = Vec::new();
        wav.read_into(&mut out, 2, 1.0);
        assert_eq!(out, vec![[0.5, -0.5], [0.0, 32767.0 / 32768.0]]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn mono_plays_on_both_channels() {
        let path = temp_wav("mono", 1, &[16384, -16384]);

        let mut wav = WavSource::open(&path).unwrap();
        let mut out = Vec::new();
        wav.read_into(&mut out, 2, 1.0);

        assert_eq!(out, vec![[0.5, 0.5], [-0.5, -0.5]]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn read_applies_gain_and_advances() {
        let path = temp_wav("gain", 2, &[16384, 16384, 16384, 16384, 16384, 16384]);

        let mut wav = WavSource::open(&path).unwrap();
        assert_eq!(wav.len(), 3);

        let mut out = Vec::new();
        assert_eq!(wav.read_into(&mut out, 2, 0.5), 2);
        assert_eq!(out, vec![[0.25, 0.25], [0.25, 0.25]]);
        assert_eq!(wav.position(), 2);
        assert!(!wav.is_finished());

        // Reading past the end yields only what is left
        out.clear();
        assert_eq!(wav.read_into(&mut out, 10, 1.0), 1);
        assert!(wav.is_finished());

        wav.rewind();
        assert_eq!(wav.position(), 0);
        assert!(!wav.is_finished());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let missing = std::path::Path::new("/definitely/not/here.wav");

        assert!(matches!(
            WavSource::open(missing),
            Err(SourceError::File(_))
        ));
    }
}
