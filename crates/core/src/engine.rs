//! The session engine: one object owning all state of a dual n-back game.
//!
//! The engine never reads a clock or spawns timers. Its host feeds elapsed
//! time through [`SessionEngine::advance`] (or one period at a time through
//! [`SessionEngine::tick`]) and forwards player input as discrete calls. Every
//! call runs to completion before the next, so no action ever observes a
//! half-applied turn.
//!
//! ## Turn anatomy
//!
//! When a turn expires the next stimulus is drawn and, before it is appended
//! to history, compared with `history[len - n]`. The number of agreeing
//! channels is added to the running potential total, which is the accuracy
//! denominator. A response on the displayed stimulus is judged against
//! `history[len - n - 1]` instead: one step further back than the potential
//! count's anchor.

use crate::clock::TurnClock;
use crate::config::EngineConfig;
use crate::generator::StimulusSource;
use crate::history::HistoryLedger;
use crate::matching::matching_channels;
use crate::ports::{
    KeyValueStore, MemoryStore, SilentPlayer, SoundCue, SoundCuePlayer, AUDIO_ENABLED_KEY,
    HIGH_SCORE_KEY,
};
use crate::scoring::{HighScoreRecord, ScoreState};
use crate::stimulus::{Channel, Stimulus};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

// Used when the config leaves the seed to the host and the host does not care.
const FALLBACK_SEED: u64 = 0x5EED_0B4C_u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// What a scored response did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Incorrect, and it was the one that ended the session.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Correct,
    Incorrect,
}

/// Transient indicator of the last scored response. Cleared on the next stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub channel: Channel,
    /// Engine time (milliseconds of fed time) when the response was scored.
    pub at_ms: u64,
}

/// Read-only view handed to hosts and UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    pub current_stimulus: Option<Stimulus>,
    pub history_len: usize,
    pub responded: Vec<Channel>,
    pub score: ScoreState,
    pub time_left: u32,
    pub interval_secs: u32,
    pub pulse: bool,
    pub feedback: Option<Feedback>,
    pub audio_enabled: bool,
    pub deterministic: bool,
    pub game_over: bool,
    pub new_high_score: bool,
    pub early_in_game: bool,
    pub final_score_accuracy: u32,
    pub high_score: HighScoreRecord,
    pub high_score_accuracy: u32,
}

#[derive(Debug)]
pub struct SessionEngine<S = MemoryStore, P = SilentPlayer> {
    config: EngineConfig,
    store: S,
    player: P,

    source: StimulusSource,
    history: HistoryLedger,
    responded: [bool; 4],
    score: ScoreState,
    clock: TurnClock,
    phase: Phase,

    now_ms: u64,
    pulse_raised_at: Option<u64>,
    feedback: Option<Feedback>,

    audio_enabled: bool,
    high_score: HighScoreRecord,
    new_high_score: bool,
    game_over: bool,
}

impl SessionEngine {
    /// Engine with in-memory storage and no sound.
    pub fn headless(config: EngineConfig) -> Self {
        Self::new(config, MemoryStore::new(), SilentPlayer)
    }
}

impl<S: KeyValueStore, P: SoundCuePlayer> SessionEngine<S, P> {
    pub fn new(config: EngineConfig, store: S, player: P) -> Self {
        let config = config.sanitized();

        let high_score = store
            .get(HIGH_SCORE_KEY)
            .map(|raw| HighScoreRecord::parse(&raw))
            .unwrap_or_default();
        let audio_enabled = store
            .get(AUDIO_ENABLED_KEY)
            .and_then(|raw| serde_json::from_str::<Option<bool>>(&raw).ok().flatten())
            .unwrap_or(true);

        let source = StimulusSource::random(config.seed.unwrap_or(FALLBACK_SEED));
        let clock = TurnClock::new(config.clock_period_ms, config.default_interval_secs);
        let score = ScoreState::new(config.n_back, config.level);

        Self {
            config,
            store,
            player,
            source,
            history: HistoryLedger::new(),
            responded: [false; 4],
            score,
            clock,
            phase: Phase::Idle,
            now_ms: 0,
            pulse_raised_at: None,
            feedback: None,
            audio_enabled,
            high_score,
            new_high_score: false,
            game_over: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Begin a fresh session with one stimulus every `interval_secs` seconds.
    ///
    /// The first stimulus is shown immediately.
    pub fn start_game(&mut self, interval_secs: u32) {
        self.reset_game_state();
        self.phase = Phase::Running;
        self.set_new_stimulus();
        self.clock.arm(interval_secs);
        debug!(
            "Session started (n={}, interval={}s, deterministic={})",
            self.score.n_back,
            self.clock.interval_secs(),
            self.source.is_deterministic()
        );
    }

    pub fn start_default(&mut self) {
        self.start_game(self.config.default_interval_secs);
    }

    /// Clear every session-scoped field and go back to `Idle`.
    ///
    /// The clock is cancelled and the stored high score is left alone.
    pub fn reset_game_state(&mut self) {
        self.clock = TurnClock::new(self.config.clock_period_ms, self.config.default_interval_secs);
        self.score = ScoreState::new(self.config.n_back, self.config.level);
        self.history.clear();
        self.responded = [false; 4];
        self.source.rewind();
        self.feedback = None;
        self.pulse_raised_at = None;
        self.new_high_score = false;
        self.game_over = false;
        self.phase = Phase::Idle;
    }

    pub fn pause_game(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            debug!("Session paused ({}s left)", self.clock.time_left());
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            debug!("Session resumed ({}s left)", self.clock.time_left());
        }
    }

    pub fn stop_game(&mut self) {
        self.clock.cancel();
        if self.phase != Phase::Stopped {
            debug!("Session stopped");
        }
        self.phase = Phase::Stopped;
    }

    /// Clears the game-over indicator. Scores stay visible until the next start.
    pub fn dismiss_game_over_modal(&mut self) {
        self.game_over = false;
        self.new_high_score = false;
    }

    /// Switch between random and cycle stimuli. Restarts the session.
    pub fn toggle_deterministic_mode(&mut self) {
        let on = !self.source.is_deterministic();
        self.source.set_deterministic(on);
        self.start_default();
    }

    pub fn toggle_audio(&mut self) {
        self.audio_enabled = !self.audio_enabled;
        let raw = if self.audio_enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(AUDIO_ENABLED_KEY, raw) {
            warn!("Could not persist audio setting: {}", e);
        }
    }

    pub fn reset_high_score(&mut self) {
        self.high_score = HighScoreRecord::cleared();
        self.persist_high_score();
        info!("High score reset");
    }

    /// Lag for sessions started from now on. The running session keeps its own.
    pub fn set_n_back(&mut self, n: u32) {
        self.config.n_back = n.max(1);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Time
    // ─────────────────────────────────────────────────────────────────────

    /// Feed wall-clock time. Turns expire only while `Running`.
    pub fn advance(&mut self, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.now_ms = self.now_ms.saturating_add(ms);
        self.expire_pulse();

        if self.phase != Phase::Running {
            return;
        }

        let expired = self.clock.advance(ms);
        for _ in 0..expired {
            if !self.set_new_stimulus() {
                break;
            }
        }
    }

    /// One clock period.
    pub fn tick(&mut self) {
        self.advance(Duration::from_millis(self.clock.period_ms()));
    }

    fn expire_pulse(&mut self) {
        if let Some(at) = self.pulse_raised_at {
            if self.now_ms.saturating_sub(at) >= self.config.pulse_ms {
                self.pulse_raised_at = None;
            }
        }
    }

    /// Present the next stimulus. Refused (returns `false`) unless `Running`.
    pub fn set_new_stimulus(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        self.responded = [false; 4];
        self.feedback = None;
        self.score.snapshot_potential();

        let next = self.source.next();
        let n = self.score.n_back as usize;
        if let Some(reference) = self.history.lag_reference(n) {
            let matched = matching_channels(reference, &next);
            if !matched.is_empty() {
                debug!("Stimulus {} repeats {:?} from {} back", next, matched, n);
            }
            self.score.fold_potential(matched.len() as u32);
        }

        self.history.push(next);
        self.pulse_raised_at = Some(self.now_ms);
        self.play_cue(SoundCue::StimulusShown);
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Responses
    // ─────────────────────────────────────────────────────────────────────

    /// Assert that the displayed stimulus repeats the one `n` turns back on
    /// `channel`.
    ///
    /// Returns `None` when nothing was scored: before the first reference
    /// exists, or outside a live session. Repeated calls on the same channel
    /// within one turn are scored again each time.
    pub fn respond(&mut self, channel: Channel) -> Option<Verdict> {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return None;
        }

        let n = self.score.n_back as usize;
        let correct = match (self.history.latest(), self.history.response_reference(n)) {
            (Some(current), Some(reference)) => Some(current.matches_on(reference, channel)),
            _ => None,
        };

        let verdict = correct.map(|ok| {
            if ok {
                self.on_correct(channel)
            } else {
                self.on_incorrect(channel)
            }
        });

        self.responded[channel.index()] = true;
        verdict
    }

    fn on_correct(&mut self, channel: Channel) -> Verdict {
        self.score.record_correct();
        self.play_cue(SoundCue::CorrectResponse);
        self.feedback = Some(Feedback {
            kind: FeedbackKind::Correct,
            channel,
            at_ms: self.now_ms,
        });
        Verdict::Correct
    }

    fn on_incorrect(&mut self, channel: Channel) -> Verdict {
        self.play_cue(SoundCue::IncorrectResponse);
        let incorrect = self.score.record_incorrect();
        self.feedback = Some(Feedback {
            kind: FeedbackKind::Incorrect,
            channel,
            at_ms: self.now_ms,
        });

        if incorrect >= self.config.error_limit {
            self.finish_session();
            Verdict::GameOver
        } else {
            Verdict::Incorrect
        }
    }

    fn finish_session(&mut self) {
        let result = self.score.result();
        self.new_high_score = self.high_score.supersedes_with(&result);

        if self.new_high_score {
            self.high_score = HighScoreRecord::from_result(&result);
            self.persist_high_score();
            info!(
                "New high score: {} ({}% accuracy, n={})",
                result.score,
                result.accuracy(),
                result.n_back
            );
        }

        self.stop_game();
        self.game_over = true;
        info!(
            "Game over: score {} / {} potential, accuracy {}%",
            result.score,
            result.potential_correct_answers,
            result.accuracy()
        );
    }

    fn persist_high_score(&mut self) {
        let raw = match self.high_score.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not encode high score: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(HIGH_SCORE_KEY, &raw) {
            warn!("Could not persist high score: {}", e);
        }
    }

    fn play_cue(&mut self, cue: SoundCue) {
        if !self.audio_enabled {
            return;
        }
        if let Err(e) = self.player.play(cue) {
            warn!("Sound cue '{}' failed: {}", cue.name(), e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_stimulus(&self) -> Option<&Stimulus> {
        self.history.latest()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn responded(&self, channel: Channel) -> bool {
        self.responded[channel.index()]
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn time_left(&self) -> u32 {
        self.clock.time_left()
    }

    pub fn interval_secs(&self) -> u32 {
        self.clock.interval_secs()
    }

    pub fn is_clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    pub fn is_pulse_active(&self) -> bool {
        self.pulse_raised_at.is_some()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn is_deterministic(&self) -> bool {
        self.source.is_deterministic()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn high_score(&self) -> &HighScoreRecord {
        &self.high_score
    }

    /// True until the displayed stimulus has an n-back reference.
    pub fn is_early_in_game(&self) -> bool {
        self.history
            .response_reference(self.score.n_back as usize)
            .is_none()
    }

    pub fn final_score_accuracy(&self) -> u32 {
        self.score.accuracy()
    }

    pub fn high_score_accuracy(&self) -> u32 {
        self.high_score.accuracy()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase,
            current_stimulus: self.current_stimulus().copied(),
            history_len: self.history.len(),
            responded: Channel::ALL
                .iter()
                .copied()
                .filter(|&ch| self.responded(ch))
                .collect(),
            score: self.score.clone(),
            time_left: self.time_left(),
            interval_secs: self.interval_secs(),
            pulse: self.is_pulse_active(),
            feedback: self.feedback,
            audio_enabled: self.audio_enabled,
            deterministic: self.is_deterministic(),
            game_over: self.game_over,
            new_high_score: self.new_high_score,
            early_in_game: self.is_early_in_game(),
            final_score_accuracy: self.final_score_accuracy(),
            high_score: self.high_score,
            high_score_accuracy: self.high_score_accuracy(),
        }
    }
}
