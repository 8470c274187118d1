use anyhow::Result;
use sonic_dispatch::{
    AudioClip, AudioDispatcher, ChannelRenderer, DispatchEngine, DispatcherDesc, EngineDesc,
    LoopMode, RandomEffectParams, global,
};
use std::time::Duration;

/// Generate a mono sine tone with a short linear fade at both ends
fn tone(frequency: f32, seconds: f32, amplitude: f32, sample_rate: u32) -> Result<AudioClip> {
    let frames = (seconds * sample_rate as f32) as usize;
    let fade = (sample_rate / 100) as usize;
    let samples = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let edge = i.min(frames - 1 - i).min(fade) as f32 / fade as f32;
            (t * frequency * 2.0 * std::f32::consts::PI).sin() * amplitude * edge
        })
        .collect();
    Ok(AudioClip::from_samples(samples, sample_rate, 1)?)
}

/// Plays a looping drone through the music channel and random blips through
/// the effect channel, toggling music off and on halfway through
fn main() -> Result<()> {
    env_logger::init();

    let desc = EngineDesc::default();
    let (renderer, music, effect) = ChannelRenderer::new(LoopMode::Infinite);

    let mut engine = DispatchEngine::new(desc.clone())?;
    engine.attach_renderer(renderer);
    engine.start()?;

    global::initialize(AudioDispatcher::new(music, effect, DispatcherDesc::default()));

    let drone = tone(110.0, 2.0, 0.08, desc.sample_rate)?;
    let blips = [
        tone(660.0, 0.12, 0.2, desc.sample_rate)?,
        tone(880.0, 0.12, 0.2, desc.sample_rate)?,
        tone(990.0, 0.12, 0.2, desc.sample_rate)?,
    ];

    global::instance()?.play_music(&drone)?;

    for step in 0..16 {
        global::instance()?.play_random_effect(&blips, RandomEffectParams::default())?;
        if step == 8 {
            let on = global::instance()?.toggle_music()?;
            log::info!("Music on: {}", on);
        }
        if step == 12 {
            let on = global::instance()?.toggle_music()?;
            log::info!("Music on: {}", on);
        }
        std::thread::sleep(Duration::from_millis(250));
    }

    log::info!("Frames processed: {}", engine.frames_processed());
    engine.stop()?;
    Ok(())
}
