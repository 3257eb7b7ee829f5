//! Collaborator interfaces the engine is handed at construction.
//!
//! ## Storage
//!
//! The engine persists exactly two values, both JSON-encoded strings:
//!
//! - [`HIGH_SCORE_KEY`]: `{"score", "potentialCorrectAnswers", "nBack"}`
//! - [`AUDIO_ENABLED_KEY`]: `true` / `false`
//!
//! Both are read once when the engine is built and written when they change.
//! Reads never fail from the engine's point of view (a missing or garbled value
//! means "use the default"); writes may fail and are logged.
//!
//! ## Sound
//!
//! Cues are fire-and-forget. The engine never waits on playback, and a failed
//! cue is logged without touching game state.

use crate::error::{SoundError, StoreError};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub const HIGH_SCORE_KEY: &str = "highScoreData";
pub const AUDIO_ENABLED_KEY: &str = "isAudioEnabled";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    StimulusShown,
    CorrectResponse,
    IncorrectResponse,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            SoundCue::StimulusShown => "stimulus",
            SoundCue::CorrectResponse => "ting",
            SoundCue::IncorrectResponse => "whip",
        }
    }
}

pub trait SoundCuePlayer {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError>;
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Player for headless hosts: accepts every cue and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl SoundCuePlayer for SilentPlayer {
    fn play(&mut self, _cue: SoundCue) -> Result<(), SoundError> {
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<T: SoundCuePlayer + ?Sized> SoundCuePlayer for Box<T> {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        (**self).play(cue)
    }
}
