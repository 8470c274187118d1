use super::OutputChannel;
use crate::clip::AudioClip;
use crate::error::{DispatcherError, Result};
use crate::playback::ChannelCommand;
use crossbeam_channel::Sender;

/// Output channel that queues commands for a
/// [`ChannelRenderer`](crate::ChannelRenderer) on the audio thread.
///
/// Created in pairs by [`ChannelRenderer::new`](crate::ChannelRenderer::new).
/// Sending never blocks; if the renderer has been dropped every operation
/// fails with [`DispatcherError::Channel`].
#[derive(Debug, Clone)]
pub struct StreamChannel {
    name: &'static str,
    command_sender: Sender<ChannelCommand>,
}

impl StreamChannel {
    pub(crate) fn new(name: &'static str, command_sender: Sender<ChannelCommand>) -> Self {
        Self {
            name,
            command_sender,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn send(&self, command: ChannelCommand) -> Result<()> {
        log::debug!("{} channel <- {:?}", self.name, command);
        self.command_sender.send(command).map_err(|e| {
            DispatcherError::Channel(format!(
                "Failed to send command to {} channel: {}",
                self.name, e
            ))
        })
    }
}

impl OutputChannel for StreamChannel {
    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.send(ChannelCommand::SetVolume(volume))
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<()> {
        self.send(ChannelCommand::SetPitch(pitch))
    }

    fn play_one_shot(&mut self, clip: &AudioClip, duration_hint: f32) -> Result<()> {
        self.send(ChannelCommand::PlayOneShot {
            clip: clip.clone(),
            volume_scale: duration_hint,
        })
    }

    fn set_clip(&mut self, clip: &AudioClip) -> Result<()> {
        self.send(ChannelCommand::SetClip(clip.clone()))
    }

    fn play(&mut self) -> Result<()> {
        self.send(ChannelCommand::Play)
    }

    fn stop(&mut self) -> Result<()> {
        self.send(ChannelCommand::Stop)
    }
}
