// Renderer - consumes channel commands on the audio thread and mixes the
// music voice and effect one-shots into interleaved output buffers

use crate::channel::StreamChannel;
use crate::playback::{ChannelCommand, LoopMode, PlayState, Voice};
use crossbeam_channel::{Receiver, unbounded};

/// Audio-thread state for one output channel
#[derive(Debug)]
struct ChannelStrip {
    name: &'static str,
    commands: Receiver<ChannelCommand>,
    volume: f32,
    pitch: f32,
    loop_mode: LoopMode,
    current: Option<Voice>,
    one_shots: Vec<Voice>,
}

impl ChannelStrip {
    fn new(name: &'static str, commands: Receiver<ChannelCommand>, loop_mode: LoopMode) -> Self {
        Self {
            name,
            commands,
            volume: 1.0,
            pitch: 1.0,
            loop_mode,
            current: None,
            one_shots: Vec::new(),
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: ChannelCommand) {
        match command {
            ChannelCommand::SetVolume(volume) => self.volume = volume,
            ChannelCommand::SetPitch(pitch) => self.pitch = pitch,
            ChannelCommand::PlayOneShot { clip, volume_scale } => {
                let voice = Voice::one_shot(clip, self.volume * volume_scale, self.pitch);
                self.one_shots.push(voice);
            }
            ChannelCommand::SetClip(clip) => {
                self.current = Some(Voice::new(clip, self.loop_mode));
            }
            ChannelCommand::Play => match self.current.as_mut() {
                Some(voice) => voice.play(),
                None => log::debug!("{} channel: play with no clip assigned", self.name),
            },
            ChannelCommand::Stop => {
                if let Some(voice) = self.current.as_mut() {
                    voice.pause();
                }
            }
        }
    }

    fn mix(&mut self, buffer: &mut [f32], sample_rate: u32, channels: u16) {
        if let Some(voice) = self.current.as_mut() {
            voice.pitch = self.pitch;
            voice.fill_buffer(buffer, sample_rate, channels, self.volume);
            if voice.state == PlayState::Stopped {
                log::debug!("{} channel: clip reached its end", self.name);
            }
        }

        for voice in self.one_shots.iter_mut() {
            voice.fill_buffer(buffer, sample_rate, channels, 1.0);
        }

        let before = self.one_shots.len();
        self.one_shots.retain(|voice| voice.is_playing());
        let retired = before - self.one_shots.len();
        if retired > 0 {
            log::debug!("{} channel: retired {} one-shots", self.name, retired);
        }
    }
}

/// Renders the music and effect channels into interleaved `f32` buffers.
///
/// Intended to run on the audio thread, either attached to a
/// [`DispatchEngine`](crate::DispatchEngine) or driven by a host's own
/// callback. Commands from the paired [`StreamChannel`]s are applied at the
/// start of each [`render`](Self::render) call.
#[derive(Debug)]
pub struct ChannelRenderer {
    music: ChannelStrip,
    effect: ChannelStrip,
}

impl ChannelRenderer {
    /// Create a renderer together with its music and effect channel handles.
    ///
    /// `music_loop` decides whether the music clip wraps around or stops at
    /// its end. One-shots always play once.
    pub fn new(music_loop: LoopMode) -> (Self, StreamChannel, StreamChannel) {
        let (music_sender, music_receiver) = unbounded();
        let (effect_sender, effect_receiver) = unbounded();

        let renderer = Self {
            music: ChannelStrip::new("music", music_receiver, music_loop),
            effect: ChannelStrip::new("effect", effect_receiver, LoopMode::Once),
        };

        (
            renderer,
            StreamChannel::new("music", music_sender),
            StreamChannel::new("effect", effect_sender),
        )
    }

    /// Overwrite `buffer` with the next block of mixed audio.
    /// Returns the number of frames in the block.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: u32, channels: u16) -> usize {
        buffer.fill(0.0);
        if channels == 0 {
            return 0;
        }

        self.music.drain_commands();
        self.effect.drain_commands();

        self.music.mix(buffer, sample_rate, channels);
        self.effect.mix(buffer, sample_rate, channels);

        buffer.len() / channels as usize
    }

    pub fn music_state(&self) -> PlayState {
        self.music
            .current
            .as_ref()
            .map_or(PlayState::Stopped, |voice| voice.state)
    }

    pub fn active_one_shots(&self) -> usize {
        self.effect.one_shots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::OutputChannel;
    use crate::clip::AudioClip;

    fn constant(value: f32, frames: usize) -> AudioClip {
        AudioClip::from_samples(vec![value; frames], 48000, 1).unwrap()
    }

    #[test]
    fn test_silence_without_commands() {
        let (mut renderer, _music, _effect) = ChannelRenderer::new(LoopMode::Infinite);
        let mut buffer = vec![1.0f32; 16];
        assert_eq!(renderer.render(&mut buffer, 48000, 2), 8);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_music_plays_at_channel_volume() {
        let (mut renderer, mut music, _effect) = ChannelRenderer::new(LoopMode::Infinite);
        music.set_volume(0.5).unwrap();
        music.set_clip(&constant(0.5, 64)).unwrap();
        music.play().unwrap();

        let mut buffer = vec![0.0f32; 8];
        renderer.render(&mut buffer, 48000, 2);
        assert!(buffer.iter().all(|s| *s == 0.25));
        assert_eq!(renderer.music_state(), PlayState::Playing);
    }

    #[test]
    fn test_stop_silences_music_and_play_resumes() {
        let (mut renderer, mut music, _effect) = ChannelRenderer::new(LoopMode::Once);
        let samples = (0..16).map(|i| i as f32).collect();
        music
            .set_clip(&AudioClip::from_samples(samples, 48000, 1).unwrap())
            .unwrap();
        music.play().unwrap();

        let mut buffer = vec![0.0f32; 4];
        renderer.render(&mut buffer, 48000, 1);
        assert_eq!(buffer, vec![0.0, 1.0, 2.0, 3.0]);

        music.stop().unwrap();
        renderer.render(&mut buffer, 48000, 1);
        assert!(buffer.iter().all(|s| *s == 0.0));
        assert_eq!(renderer.music_state(), PlayState::Paused);

        music.play().unwrap();
        renderer.render(&mut buffer, 48000, 1);
        assert_eq!(buffer, vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_one_shots_mix_and_retire() {
        let (mut renderer, _music, mut effect) = ChannelRenderer::new(LoopMode::Infinite);
        effect.set_volume(0.5).unwrap();
        effect.play_one_shot(&constant(1.0, 2), 1.0).unwrap();
        effect.play_one_shot(&constant(1.0, 6), 0.5).unwrap();

        let mut buffer = vec![0.0f32; 4];
        renderer.render(&mut buffer, 48000, 1);
        assert_eq!(buffer, vec![0.75, 0.75, 0.25, 0.25]);
        assert_eq!(renderer.active_one_shots(), 1);

        renderer.render(&mut buffer, 48000, 1);
        assert_eq!(buffer, vec![0.25, 0.25, 0.0, 0.0]);
        assert_eq!(renderer.active_one_shots(), 0);
    }

    #[test]
    fn test_stop_does_not_cut_one_shots() {
        let (mut renderer, _music, mut effect) = ChannelRenderer::new(LoopMode::Once);
        effect.play_one_shot(&constant(1.0, 8), 1.0).unwrap();
        effect.stop().unwrap();

        let mut buffer = vec![0.0f32; 4];
        renderer.render(&mut buffer, 48000, 1);
        assert!(buffer.iter().all(|s| *s == 1.0));
    }

    #[test]
    fn test_degenerate_pitch_one_shots_retire_after_one_render() {
        let (mut renderer, _music, mut effect) = ChannelRenderer::new(LoopMode::Once);
        for pitch in [0.0, -1.0, f32::NAN] {
            effect.set_pitch(pitch).unwrap();
            effect.play_one_shot(&constant(1.0, 16), 1.0).unwrap();
        }

        let mut buffer = vec![0.0f32; 64];
        renderer.render(&mut buffer, 48000, 1);
        assert_eq!(renderer.active_one_shots(), 0);
    }

    #[test]
    fn test_zero_sample_rate_stops_looping_music() {
        let (mut renderer, mut music, _effect) = ChannelRenderer::new(LoopMode::Infinite);
        music.set_clip(&constant(0.5, 16)).unwrap();
        music.play().unwrap();

        let mut buffer = vec![0.0f32; 8];
        renderer.render(&mut buffer, 0, 1);
        assert_eq!(renderer.music_state(), PlayState::Stopped);
    }

    #[test]
    fn test_double_pitch_at_double_output_rate_is_real_time() {
        let (mut renderer, _music, mut effect) = ChannelRenderer::new(LoopMode::Once);
        let samples = (0..8).map(|i| i as f32).collect();
        let clip = AudioClip::from_samples(samples, 48000, 1).unwrap();
        effect.set_pitch(2.0).unwrap();
        effect.play_one_shot(&clip, 1.0).unwrap();

        let mut buffer = vec![0.0f32; 4];
        renderer.render(&mut buffer, 96000, 1);
        assert_eq!(buffer, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
