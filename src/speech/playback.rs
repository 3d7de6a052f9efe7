use std::sync::Arc;

use tracing::debug;

use crate::speech::{AudioClip, AudioSink, CancelToken, SpeechError};

/// Used when there is no output device (or the `audio` feature is off).
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&self, clip: &AudioClip, cancel: &CancelToken) -> Result<(), SpeechError> {
        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled);
        }
        debug!(bytes = clip.bytes.len(), "no audio output, clip dropped");
        Ok(())
    }
}

/// Keeps the output stream open for the life of the app. Sinks handed out
/// by [`AudioDevice::open`] stop producing sound once this is dropped.
pub struct AudioDevice {
    #[cfg(feature = "audio")]
    _stream: Option<rodio::OutputStream>,
}

impl AudioDevice {
    #[cfg(feature = "audio")]
    pub fn open(volume: f32) -> (Self, Arc<dyn AudioSink>) {
        match rodio::OutputStream::try_default() {
            Ok((stream, handle)) => (
                Self {
                    _stream: Some(stream),
                },
                Arc::new(rodio_sink::RodioSink::new(handle, volume)),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "no audio output device");
                (Self { _stream: None }, Arc::new(SilentSink))
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn open(_volume: f32) -> (Self, Arc<dyn AudioSink>) {
        debug!("built without audio support");
        (Self {}, Arc::new(SilentSink))
    }
}

#[cfg(feature = "audio")]
mod rodio_sink {
    use std::io::Cursor;
    use std::thread;
    use std::time::Duration;

    use rodio::buffer::SamplesBuffer;
    use rodio::{Decoder, OutputStreamHandle, Sink};

    use crate::speech::{AudioClip, AudioFormat, AudioSink, CancelToken, SpeechError};

    pub struct RodioSink {
        handle: OutputStreamHandle,
        volume: f32,
    }

    impl RodioSink {
        pub fn new(handle: OutputStreamHandle, volume: f32) -> Self {
            Self {
                handle,
                volume: volume.clamp(0.0, 1.0),
            }
        }
    }

    impl AudioSink for RodioSink {
        fn play(&self, clip: &AudioClip, cancel: &CancelToken) -> Result<(), SpeechError> {
            let sink =
                Sink::try_new(&self.handle).map_err(|e| SpeechError::Playback(e.to_string()))?;
            sink.set_volume(self.volume);
            match clip.format {
                AudioFormat::Encoded => {
                    let decoder = Decoder::new(Cursor::new(clip.bytes.clone()))
                        .map_err(|e| SpeechError::Decode(e.to_string()))?;
                    sink.append(decoder);
                }
                AudioFormat::Pcm16 {
                    sample_rate,
                    channels,
                } => {
                    sink.append(SamplesBuffer::new(channels, sample_rate, clip.pcm_samples()));
                }
            }

            while !sink.empty() {
                if cancel.is_cancelled() {
                    sink.stop();
                    return Err(SpeechError::Cancelled);
                }
                thread::sleep(Duration::from_millis(25));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::AudioFormat;

    #[test]
    fn silent_sink_respects_cancel() {
        let clip = AudioClip {
            bytes: vec![0; 4],
            format: AudioFormat::Encoded,
        };
        let token = CancelToken::default();
        assert!(SilentSink.play(&clip, &token).is_ok());
        token.cancel();
        assert!(matches!(
            SilentSink.play(&clip, &token),
            Err(SpeechError::Cancelled)
        ));
    }
}
