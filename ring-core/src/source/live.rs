//! Live capture input
//!
//! Captures the default input device into its own sample ring.  The
//! stream runs on a thread owned by the audio backend; dropping the
//! [`LiveInput`] drops the stream and with it the capture.
use crate::analyzer;
use crate::source::SourceError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

pub struct LiveInput {
    rate: usize,
    buffer: analyzer::SampleBuffer,
    _stream: cpal::Stream,
}

impl std::fmt::Debug for LiveInput {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "LiveInput {{ rate: {:?} }}", self.rate)
    }
}

impl LiveInput {
    /// Open the default input device and start capturing.
    ///
    /// The ring holds `buffer_size` frames at whatever rate the device
    /// runs at.
    pub fn open(buffer_size: usize) -> Result<LiveInput, SourceError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(SourceError::NoDevice)?;
        let config = device
            .default_input_config()
            .map_err(|e| SourceError::Capture(e.to_string()))?;

        let rate = config.sample_rate().0 as usize;
        let channels = config.channels() as usize;
        if channels == 0 {
            return Err(SourceError::Capture(
                "input device reports zero channels".into(),
            ));
        }

        let buffer = analyzer::SampleBuffer::new(buffer_size, rate);

        log::debug!("LiveInput:");
        log::debug!(
            "    Device   = {}",
            device.name().unwrap_or_else(|_| "<unknown>".into())
        );
        log::debug!("    Rate     = {:8} Hz", rate);
        log::debug!("    Channels = {:8}", channels);
        log::debug!("    Format   = {:?}", config.sample_format());

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), channels, buffer.clone())
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), channels, buffer.clone())
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), channels, buffer.clone())
            }
            other => Err(SourceError::Capture(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;

        stream
            .play()
            .map_err(|e| SourceError::Capture(e.to_string()))?;

        Ok(LiveInput {
            rate,
            buffer,
            _stream: stream,
        })
    }

    /// Rate the device captures at.
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// The ring the capture callback pushes into.
    pub fn buffer(&self) -> &analyzer::SampleBuffer {
        &self.buffer
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    buffer: analyzer::SampleBuffer,
) -> Result<cpal::Stream, SourceError>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    // Reused between callbacks to keep the audio thread allocation-free
    let mut chunk: Vec<[f32; 2]> = Vec::with_capacity(4096);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                chunk.clear();
                for frame in data.chunks(channels) {
                    chunk.push(match frame {
                        [l, r] => [l.to_sample::<f32>(), r.to_sample::<f32>()],
                        [m] => {
                            let m = m.to_sample::<f32>();
                            [m, m]
                        }
                        _ => {
                            let sum: f32 =
                                frame.iter().map(|s| s.to_sample::<f32>()).sum();
                            let m = sum / frame.len() as f32;
                            [m, m]
                        }
                    });
                }
                buffer.push(&chunk);
            },
            |err| log::error!("Capture stream error: {}", err),
            None,
        )
        .map_err(|e| SourceError::Capture(e.to_string()))
}
