//! Session engine for a dual n-back working-memory exercise.
//!
//! A stimulus carries four independent channels (color, emoji, position,
//! shape). Each turn a new stimulus is shown; the player claims, per channel,
//! that it repeats the stimulus seen `n` turns earlier. [`SessionEngine`]
//! owns the whole game: stimulus generation, history, match evaluation,
//! scoring, the turn clock and the persisted best score.
//!
//! Storage and sound are injected through [`ports::KeyValueStore`] and
//! [`ports::SoundCuePlayer`]; time is fed in by the host.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod history;
pub mod matching;
pub mod ports;
pub mod prng;
pub mod scoring;
pub mod stimulus;

pub use config::EngineConfig;
pub use engine::{EngineSnapshot, Feedback, FeedbackKind, Phase, SessionEngine, Verdict};
pub use error::{SoundError, StoreError};
pub use ports::{KeyValueStore, MemoryStore, SilentPlayer, SoundCue, SoundCuePlayer};
pub use scoring::{HighScoreRecord, RecordLag, ScoreState, SessionResult};
pub use stimulus::{Channel, Stimulus};
