use crate::config::EngineDesc;
use crate::error::{DispatcherError, Result};
use crate::renderer::ChannelRenderer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Callback function type for filling audio samples
///
/// The callback receives:
/// - `buffer`: zeroed interleaved slice to fill with audio samples
/// - `sample_rate`: output sample rate
/// - `channels`: number of output channels
///
/// Returns the number of frames actually filled (frames = samples / channels)
pub type AudioFillCallback = dyn Fn(&mut [f32], u32, u16) -> usize + Send + Sync;

/// Drives a fill callback (usually a [`ChannelRenderer`]) from the default
/// output device
pub struct DispatchEngine {
    desc: EngineDesc,
    stream: Option<cpal::Stream>,
    is_running: Arc<AtomicBool>,
    frames_processed: Arc<AtomicUsize>,
    fill_callback: Option<Arc<AudioFillCallback>>,
}

impl DispatchEngine {
    pub fn new(desc: EngineDesc) -> Result<Self> {
        if desc.channels == 0 || desc.sample_rate == 0 {
            return Err(DispatcherError::Engine(format!(
                "Unusable output format: {} channels at {} Hz",
                desc.channels, desc.sample_rate
            )));
        }
        Ok(Self {
            desc,
            stream: None,
            is_running: Arc::new(AtomicBool::new(false)),
            frames_processed: Arc::new(AtomicUsize::new(0)),
            fill_callback: None,
        })
    }

    /// Set the callback that fills each device buffer
    pub fn set_fill_callback<F>(&mut self, callback: F)
    where
        F: Fn(&mut [f32], u32, u16) -> usize + Send + Sync + 'static,
    {
        self.fill_callback = Some(Arc::new(callback));
    }

    /// Use `renderer` as the fill callback
    pub fn attach_renderer(&mut self, renderer: ChannelRenderer) {
        let renderer = Mutex::new(renderer);
        self.set_fill_callback(move |buffer, sample_rate, channels| {
            match renderer.try_lock() {
                Ok(mut renderer) => renderer.render(buffer, sample_rate, channels),
                Err(_) => {
                    log::warn!("Renderer busy, emitting silence");
                    0
                }
            }
        });
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_running.load(Ordering::Relaxed) {
            return Ok(());
        }

        let fill_callback = self
            .fill_callback
            .clone()
            .ok_or_else(|| DispatcherError::Engine("No fill callback set".into()))?;

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            DispatcherError::AudioDevice("No default output device available".into())
        })?;

        let config = cpal::StreamConfig {
            channels: self.desc.channels,
            sample_rate: cpal::SampleRate(self.desc.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(self.desc.block_size as u32),
        };

        let default_config = device.default_output_config().map_err(|e| {
            DispatcherError::AudioDevice(format!("Failed to get default config: {}", e))
        })?;

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => self.create_stream::<f32>(&device, &config, fill_callback)?,
            cpal::SampleFormat::I16 => self.create_stream::<i16>(&device, &config, fill_callback)?,
            cpal::SampleFormat::U16 => self.create_stream::<u16>(&device, &config, fill_callback)?,
            other => {
                return Err(DispatcherError::AudioFormat(format!(
                    "Unsupported sample format {:?}",
                    other
                )));
            }
        };

        stream.play().map_err(|e| {
            DispatcherError::AudioDevice(format!("Failed to start stream: {}", e))
        })?;

        log::info!(
            "Output stream started: {} Hz, {} channels, {} frame blocks",
            self.desc.sample_rate,
            self.desc.channels,
            self.desc.block_size
        );

        self.stream = Some(stream);
        self.is_running.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            self.is_running.store(false, Ordering::Relaxed);
            drop(stream);
            log::info!("Output stream stopped");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Number of frames the callback has filled since start
    pub fn frames_processed(&self) -> usize {
        self.frames_processed.load(Ordering::Relaxed)
    }

    pub fn desc(&self) -> &EngineDesc {
        &self.desc
    }

    fn create_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        fill_callback: Arc<AudioFillCallback>,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let is_running = self.is_running.clone();
        let frames_processed = self.frames_processed.clone();
        let sample_rate = self.desc.sample_rate;
        let channels = self.desc.channels;
        let mut scratch = Vec::<f32>::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if !is_running.load(Ordering::Relaxed) {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    scratch.clear();
                    scratch.resize(data.len(), 0.0);
                    let frames_filled = fill_callback(&mut scratch, sample_rate, channels);

                    for (out, sample) in data.iter_mut().zip(scratch.iter()) {
                        *out = T::from_sample(*sample);
                    }

                    frames_processed.fetch_add(frames_filled, Ordering::Relaxed);
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| DispatcherError::AudioDevice(format!("Failed to build stream: {}", e)))
    }
}

impl Drop for DispatchEngine {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unusable_format() {
        assert!(DispatchEngine::new(EngineDesc::new().channels(0)).is_err());
        assert!(DispatchEngine::new(EngineDesc::new().sample_rate(0)).is_err());
    }

    #[test]
    fn test_start_without_callback_fails() {
        let mut engine = DispatchEngine::new(EngineDesc::default()).unwrap();
        assert!(matches!(engine.start(), Err(DispatcherError::Engine(_))));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_stop_when_idle_is_ok() {
        let mut engine = DispatchEngine::new(EngineDesc::default()).unwrap();
        engine.stop().unwrap();
        assert_eq!(engine.frames_processed(), 0);
    }
}
