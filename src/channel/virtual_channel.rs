use super::OutputChannel;
use crate::clip::AudioClip;
use crate::error::Result;
use crate::playback::{LoopMode, PlayState, Voice};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Headless output channel.
///
/// Cloning yields another handle onto the same channel, so a host (or a test)
/// can keep one handle for inspection and give the other to the dispatcher.
/// Time only moves when [`advance`](Self::advance) is called.
#[derive(Debug, Clone)]
pub struct VirtualChannel {
    state: Arc<Mutex<ChannelState>>,
}

#[derive(Debug)]
struct ChannelState {
    volume: f32,
    pitch: f32,
    loop_mode: LoopMode,
    current: Option<Voice>,
    one_shots: Vec<OneShot>,
}

#[derive(Debug)]
struct OneShot {
    voice: Voice,
    duration_hint: f32,
}

/// Observable state of a [`VirtualChannel`] at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
    pub volume: f32,
    pub pitch: f32,
    pub clip: Option<AudioClip>,
    pub play_state: PlayState,
    /// Cursor of the assigned clip, in clip frames
    pub position: f64,
    pub one_shots: Vec<OneShotSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneShotSnapshot {
    pub clip: AudioClip,
    pub volume: f32,
    pub pitch: f32,
    pub duration_hint: f32,
    pub position: f64,
}

impl VirtualChannel {
    pub fn new() -> Self {
        Self::with_loop_mode(LoopMode::Once)
    }

    /// Loop mode applied to clips assigned with `set_clip`
    pub fn with_loop_mode(loop_mode: LoopMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState {
                volume: 1.0,
                pitch: 1.0,
                loop_mode,
                current: None,
                one_shots: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move simulated time forward by `frames` real-time frames.
    ///
    /// The assigned clip moves by `frames * pitch` clip frames if playing.
    /// One-shots that reach their end are retired.
    pub fn advance(&self, frames: usize) {
        if frames == 0 {
            return;
        }
        let mut state = self.lock();
        let pitch = state.pitch as f64;
        if let Some(voice) = state.current.as_mut() {
            voice.pitch = pitch as f32;
            voice.advance(frames as f64 * pitch);
        }
        state.one_shots.retain_mut(|shot| {
            let step = frames as f64 * shot.voice.pitch as f64;
            shot.voice.advance(step)
        });
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        let state = self.lock();
        ChannelSnapshot {
            volume: state.volume,
            pitch: state.pitch,
            clip: state.current.as_ref().map(|voice| voice.clip.clone()),
            play_state: state
                .current
                .as_ref()
                .map_or(PlayState::Stopped, |voice| voice.state),
            position: state.current.as_ref().map_or(0.0, |voice| voice.cursor),
            one_shots: state
                .one_shots
                .iter()
                .map(|shot| OneShotSnapshot {
                    clip: shot.voice.clip.clone(),
                    volume: shot.voice.volume,
                    pitch: shot.voice.pitch,
                    duration_hint: shot.duration_hint,
                    position: shot.voice.cursor,
                })
                .collect(),
        }
    }

    pub fn clip(&self) -> Option<AudioClip> {
        self.lock().current.as_ref().map(|voice| voice.clip.clone())
    }

    pub fn is_playing(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(|voice| voice.is_playing())
    }

    pub fn active_one_shots(&self) -> usize {
        self.lock().one_shots.len()
    }
}

impl Default for VirtualChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputChannel for VirtualChannel {
    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.lock().volume = volume;
        Ok(())
    }

    fn set_pitch(&mut self, pitch: f32) -> Result<()> {
        self.lock().pitch = pitch;
        Ok(())
    }

    fn play_one_shot(&mut self, clip: &AudioClip, duration_hint: f32) -> Result<()> {
        let mut state = self.lock();
        let voice = Voice::one_shot(clip.clone(), state.volume, state.pitch);
        state.one_shots.push(OneShot {
            voice,
            duration_hint,
        });
        Ok(())
    }

    fn set_clip(&mut self, clip: &AudioClip) -> Result<()> {
        let mut state = self.lock();
        let voice = Voice::new(clip.clone(), state.loop_mode);
        state.current = Some(voice);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if let Some(voice) = self.lock().current.as_mut() {
            voice.play();
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(voice) = self.lock().current.as_mut() {
            voice.pause();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(frames: usize) -> AudioClip {
        AudioClip::silence(frames, 48000).unwrap()
    }

    #[test]
    fn test_set_clip_rewinds_without_playing() {
        let mut channel = VirtualChannel::new();
        let a = clip(100);
        channel.set_clip(&a).unwrap();
        let snapshot = channel.snapshot();
        assert_eq!(snapshot.clip, Some(a));
        assert_eq!(snapshot.play_state, PlayState::Stopped);
        assert_eq!(snapshot.position, 0.0);
    }

    #[test]
    fn test_stop_then_play_resumes_from_position() {
        let mut channel = VirtualChannel::new();
        channel.set_clip(&clip(100)).unwrap();
        channel.play().unwrap();
        channel.advance(40);
        channel.stop().unwrap();
        channel.advance(10);
        assert_eq!(channel.snapshot().play_state, PlayState::Paused);
        assert_eq!(channel.snapshot().position, 40.0);

        channel.play().unwrap();
        channel.advance(5);
        assert_eq!(channel.snapshot().position, 45.0);
    }

    #[test]
    fn test_play_without_clip_is_noop() {
        let mut channel = VirtualChannel::new();
        channel.play().unwrap();
        assert!(!channel.is_playing());
        assert_eq!(channel.snapshot().clip, None);
    }

    #[test]
    fn test_pitch_scales_cursor_speed() {
        let mut channel = VirtualChannel::with_loop_mode(LoopMode::Infinite);
        channel.set_clip(&clip(100)).unwrap();
        channel.set_pitch(2.0).unwrap();
        channel.play().unwrap();
        channel.advance(30);
        assert_eq!(channel.snapshot().position, 60.0);
        channel.advance(30);
        assert_eq!(channel.snapshot().position, 20.0);
        assert!(channel.is_playing());
    }

    #[test]
    fn test_one_shots_overlap_and_retire() {
        let mut channel = VirtualChannel::new();
        channel.set_volume(0.5).unwrap();
        channel.play_one_shot(&clip(10), 1.0).unwrap();
        channel.set_volume(0.8).unwrap();
        channel.play_one_shot(&clip(20), 0.7).unwrap();

        let shots = channel.snapshot().one_shots;
        assert_eq!(shots.len(), 2);
        assert_eq!(shots[0].volume, 0.5);
        assert_eq!(shots[1].volume, 0.8);
        assert_eq!(shots[1].duration_hint, 0.7);

        channel.advance(15);
        assert_eq!(channel.active_one_shots(), 1);
        channel.advance(5);
        assert_eq!(channel.active_one_shots(), 0);
    }

    #[test]
    fn test_stop_leaves_one_shots_running() {
        let mut channel = VirtualChannel::new();
        channel.play_one_shot(&clip(10), 1.0).unwrap();
        channel.stop().unwrap();
        assert_eq!(channel.active_one_shots(), 1);
    }

    #[test]
    fn test_zero_pitch_one_shot_retires() {
        let mut channel = VirtualChannel::new();
        channel.set_pitch(0.0).unwrap();
        channel.play_one_shot(&clip(16), 1.0).unwrap();
        channel.advance(0);
        assert_eq!(channel.active_one_shots(), 1);
        channel.advance(1);
        assert_eq!(channel.active_one_shots(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let mut channel = VirtualChannel::new();
        let observer = channel.clone();
        channel.set_pitch(1.5).unwrap();
        assert_eq!(observer.snapshot().pitch, 1.5);
    }
}
