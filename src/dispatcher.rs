use crate::channel::OutputChannel;
use crate::clip::AudioClip;
use crate::config::{DispatcherDesc, MusicResume, PitchRange};
use crate::error::{DispatcherError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters for a single effect playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Forwarded untouched to the effect channel's one-shot call
    pub duration: f32,
    pub volume: f32,
    pub pitch: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// Parameters for a randomized effect playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomEffectParams {
    pub duration: f32,
    pub volume: f32,
    /// Overrides the dispatcher's configured range for this call only
    pub pitch_range: Option<PitchRange>,
}

impl Default for RandomEffectParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            volume: 1.0,
            pitch_range: None,
        }
    }
}

impl RandomEffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn pitch_range(mut self, range: PitchRange) -> Self {
        self.pitch_range = Some(range);
        self
    }
}

/// Plays music and sound effects through two injected output channels.
///
/// Each channel sits behind an on/off gate. While a gate is off the matching
/// play call does nothing: no error, nothing queued. Usually a single
/// dispatcher is installed process-wide with [`global::initialize`](crate::global::initialize).
pub struct AudioDispatcher {
    desc: DispatcherDesc,
    music: Box<dyn OutputChannel>,
    effect: Box<dyn OutputChannel>,
    music_enabled: bool,
    effect_enabled: bool,
    current_music: Option<AudioClip>,
    rng: StdRng,
}

impl AudioDispatcher {
    /// Bind the music and effect channels. Both gates start enabled.
    pub fn new<M, E>(music: M, effect: E, desc: DispatcherDesc) -> Self
    where
        M: OutputChannel + 'static,
        E: OutputChannel + 'static,
    {
        let rng = match desc.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            desc,
            music: Box::new(music),
            effect: Box::new(effect),
            music_enabled: true,
            effect_enabled: true,
            current_music: None,
            rng,
        }
    }

    /// Activation hook: put both gates back to their enabled default
    pub fn activate(&mut self) {
        self.music_enabled = true;
        self.effect_enabled = true;
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn effect_enabled(&self) -> bool {
        self.effect_enabled
    }

    pub fn pitch_range(&self) -> PitchRange {
        self.desc.pitch_range
    }

    pub fn set_pitch_range(&mut self, range: PitchRange) {
        self.desc.pitch_range = range;
    }

    /// Last clip handed to [`play_music`](Self::play_music) while music was on
    pub fn current_music(&self) -> Option<&AudioClip> {
        self.current_music.as_ref()
    }

    pub fn desc(&self) -> &DispatcherDesc {
        &self.desc
    }

    /// Set the effect channel's volume and pitch, then fire `clip` as a
    /// one-shot.
    pub fn play_effect(&mut self, clip: &AudioClip, params: EffectParams) -> Result<()> {
        if !self.effect_enabled {
            log::debug!("Effects disabled, skipping clip {}", clip.id());
            return Ok(());
        }

        self.effect.set_volume(params.volume)?;
        self.effect.set_pitch(params.pitch)?;
        self.effect.play_one_shot(clip, params.duration)
    }

    /// Pick one of `clips` uniformly at random, draw a pitch from the
    /// inclusive pitch range, and play it through [`play_effect`](Self::play_effect).
    ///
    /// # Errors
    ///
    /// [`DispatcherError::EmptyClipSet`] if `clips` is empty.
    pub fn play_random_effect(
        &mut self,
        clips: &[AudioClip],
        params: RandomEffectParams,
    ) -> Result<()> {
        if clips.is_empty() {
            return Err(DispatcherError::EmptyClipSet);
        }

        let index = self.rng.gen_range(0..clips.len());
        let range = params.pitch_range.unwrap_or(self.desc.pitch_range);
        let pitch = range.sample(&mut self.rng);
        log::debug!(
            "Random effect: clip {} of {}, pitch {:.3}",
            index,
            clips.len(),
            pitch
        );

        self.play_effect(
            &clips[index],
            EffectParams {
                duration: params.duration,
                volume: params.volume,
                pitch,
            },
        )
    }

    /// Replace whatever the music channel is playing with `clip`, from the
    /// start. No crossfade.
    pub fn play_music(&mut self, clip: &AudioClip) -> Result<()> {
        if !self.music_enabled {
            log::debug!("Music disabled, skipping clip {}", clip.id());
            return Ok(());
        }

        self.music.set_clip(clip)?;
        self.current_music = Some(clip.clone());
        self.music.play()
    }

    /// Flip the music gate. Turning music off stops the channel immediately;
    /// turning it back on resumes it (or restarts the last clip when
    /// configured with [`MusicResume::Restart`]).
    ///
    /// Returns the new gate state. If the channel rejects the command the
    /// gate keeps its old value.
    pub fn toggle_music(&mut self) -> Result<bool> {
        let enable = !self.music_enabled;

        if enable {
            if let (MusicResume::Restart, Some(clip)) =
                (self.desc.music_resume, self.current_music.as_ref())
            {
                self.music.set_clip(clip)?;
            }
            self.music.play()?;
        } else {
            self.music.stop()?;
        }

        self.music_enabled = enable;
        log::debug!("Music {}", if enable { "enabled" } else { "disabled" });
        Ok(enable)
    }

    /// Flip the effect gate. One-shots already triggered play to completion.
    pub fn toggle_effect(&mut self) -> bool {
        self.effect_enabled = !self.effect_enabled;
        log::debug!(
            "Effects {}",
            if self.effect_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        self.effect_enabled
    }
}
