//! Audio system
//!
//! Sound effects are fire-and-forget. The device lives behind [`AudioSink`];
//! when a clip or the device fails, the failure is logged once and that effect
//! goes quiet while the game keeps running.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SoundEffect {
    /// Ship explodes
    Boom,
    /// Asteroid takes a hit
    Damage,
    /// Ship destroyed jingle
    GameOver,
    /// Ship spawned or resurrected
    StartGame,
    /// Engine spooling up
    GasOn,
    /// Engine running (looped)
    Fly,
    /// Engine cut
    GasOff,
    /// Bullet fired
    Shoot,
    /// Power-up collected
    Puff,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 9] = [
        SoundEffect::Boom,
        SoundEffect::Damage,
        SoundEffect::GameOver,
        SoundEffect::StartGame,
        SoundEffect::GasOn,
        SoundEffect::Fly,
        SoundEffect::GasOff,
        SoundEffect::Shoot,
        SoundEffect::Puff,
    ];

    /// Per-clip mix level
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Boom | SoundEffect::GameOver | SoundEffect::StartGame => 1.0,
            SoundEffect::Puff => 1.0,
            SoundEffect::Damage | SoundEffect::Fly => 0.8,
            SoundEffect::GasOn | SoundEffect::GasOff | SoundEffect::Shoot => 0.9,
        }
    }

    /// Clip name a backend can map to an asset
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Boom => "boom",
            SoundEffect::Damage => "damage",
            SoundEffect::GameOver => "game_over",
            SoundEffect::StartGame => "start_game",
            SoundEffect::GasOn => "gas_on",
            SoundEffect::Fly => "fly",
            SoundEffect::GasOff => "gas_off",
            SoundEffect::Shoot => "shoot",
            SoundEffect::Puff => "puff",
        }
    }
}

/// Failure reported by an audio backend
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio device available")]
    NoDevice,
    #[error("sound clip '{0}' is missing")]
    MissingClip(&'static str),
    #[error("audio backend failed: {0}")]
    Backend(String),
}

/// Audio device plumbing
pub trait AudioSink: Send {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    fn stop(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
    fn loop_sound(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    fn set_volume(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Sink that accepts everything and plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        Ok(())
    }

    fn loop_sound(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_volume(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Effects whose backend failed; they stay silent from then on
    disabled: BTreeSet<SoundEffect>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            disabled: BTreeSet::new(),
        }
    }

    /// Manager over [`NullAudio`]
    pub fn silent() -> Self {
        Self::new(Box::new(NullAudio))
    }

    /// Pick up volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
        // A running engine loop picks up the new level
        self.refresh_volume(SoundEffect::Fly);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_disabled(&self, effect: SoundEffect) -> bool {
        self.disabled.contains(&effect)
    }

    /// Get effective volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume * effect.base_volume()
        }
    }

    /// Play a sound effect once
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 || self.is_disabled(effect) {
            return;
        }
        let result = self.sink.play(effect, vol);
        self.degrade_on_error(effect, result);
    }

    /// Play a sound effect on repeat until stopped
    pub fn loop_sound(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 || self.is_disabled(effect) {
            return;
        }
        let result = self.sink.loop_sound(effect, vol);
        self.degrade_on_error(effect, result);
    }

    pub fn stop(&mut self, effect: SoundEffect) {
        if self.is_disabled(effect) {
            return;
        }
        let result = self.sink.stop(effect);
        self.degrade_on_error(effect, result);
    }

    /// Push the current effective volume of one effect to the backend
    pub fn refresh_volume(&mut self, effect: SoundEffect) {
        if self.is_disabled(effect) {
            return;
        }
        let vol = self.effective_volume(effect);
        let result = self.sink.set_volume(effect, vol);
        self.degrade_on_error(effect, result);
    }

    fn degrade_on_error(&mut self, effect: SoundEffect, result: Result<(), AudioError>) {
        if let Err(err) = result {
            log::warn!("Sound '{}' disabled: {}", effect.name(), err);
            self.disabled.insert(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records calls; fails every call for `broken`
    struct Recorder {
        calls: Arc<Mutex<Vec<(&'static str, SoundEffect)>>>,
        broken: Option<SoundEffect>,
    }

    impl Recorder {
        fn record(&mut self, op: &'static str, effect: SoundEffect) -> Result<(), AudioError> {
            if self.broken == Some(effect) {
                return Err(AudioError::MissingClip(effect.name()));
            }
            self.calls.lock().unwrap().push((op, effect));
            Ok(())
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            self.record("play", effect)
        }
        fn stop(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
            self.record("stop", effect)
        }
        fn loop_sound(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            self.record("loop", effect)
        }
        fn set_volume(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            self.record("volume", effect)
        }
    }

    fn manager(broken: Option<SoundEffect>) -> (AudioManager, Arc<Mutex<Vec<(&'static str, SoundEffect)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Recorder { calls: Arc::clone(&calls), broken };
        (AudioManager::new(Box::new(sink)), calls)
    }

    #[test]
    fn test_failed_effect_goes_quiet() {
        let (mut audio, calls) = manager(Some(SoundEffect::Shoot));
        audio.play(SoundEffect::Shoot);
        assert!(audio.is_disabled(SoundEffect::Shoot));
        audio.play(SoundEffect::Shoot);
        audio.play(SoundEffect::Boom);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("play", SoundEffect::Boom)]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let (mut audio, calls) = manager(None);
        audio.set_muted(true);
        audio.play(SoundEffect::Boom);
        audio.loop_sound(SoundEffect::Fly);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_settings_reach_looping_engine() {
        let (mut audio, calls) = manager(None);
        let settings = Settings {
            master_volume: 0.5,
            ..Settings::default()
        };
        audio.apply_settings(&settings);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("volume", SoundEffect::Fly)]);
    }

    #[test]
    fn test_volume_clamps() {
        let mut audio = AudioManager::silent();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(SoundEffect::Boom), 0.0);
        audio.set_sfx_volume(1.0);
        assert_eq!(audio.effective_volume(SoundEffect::Boom), 1.0);
    }
}
