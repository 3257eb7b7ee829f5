// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════
//
// One JSON object per line in each direction. Every request is answered with
// exactly one response line.

use nback::{Channel, EngineSnapshot, KeyValueStore, SessionEngine, SoundCuePlayer, Verdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Start a fresh session; omitting the interval uses the configured default.
    StartGame {
        #[serde(default)]
        interval_secs: Option<u32>,
    },
    PauseGame,
    ResumeGame,
    StopGame,
    Respond {
        channel: Channel,
    },
    ToggleAudio,
    ToggleDeterministic,
    DismissGameOver,
    ResetHighScore,
    /// Lag for the next session.
    SetNBack {
        n: u32,
    },
    GetState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    State(Box<EngineSnapshot>),
    Responded {
        /// `null` when the response was not scored.
        verdict: Option<Verdict>,
        state: Box<EngineSnapshot>,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}

/// Apply one request to the engine and describe the result.
pub fn dispatch<S, P>(engine: &mut SessionEngine<S, P>, request: Request) -> Response
where
    S: KeyValueStore,
    P: SoundCuePlayer,
{
    match request {
        Request::StartGame { interval_secs } => match interval_secs {
            Some(0) => return Response::error("interval_secs must be at least 1"),
            Some(s) => engine.start_game(s),
            None => engine.start_default(),
        },
        Request::PauseGame => engine.pause_game(),
        Request::ResumeGame => engine.resume_game(),
        Request::StopGame => engine.stop_game(),
        Request::Respond { channel } => {
            let verdict = engine.respond(channel);
            return Response::Responded {
                verdict,
                state: Box::new(engine.snapshot()),
            };
        }
        Request::ToggleAudio => engine.toggle_audio(),
        Request::ToggleDeterministic => engine.toggle_deterministic_mode(),
        Request::DismissGameOver => engine.dismiss_game_over_modal(),
        Request::ResetHighScore => engine.reset_high_score(),
        Request::SetNBack { n } => {
            if n == 0 {
                return Response::error("n must be at least 1");
            }
            engine.set_n_back(n);
        }
        Request::GetState => {}
    }
    Response::State(Box::new(engine.snapshot()))
}
