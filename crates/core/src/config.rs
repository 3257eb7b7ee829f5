use serde::{Deserialize, Serialize};

fn default_n_back() -> u32 {
    2
}

fn default_level() -> u32 {
    1
}

fn default_interval_secs() -> u32 {
    5
}

fn default_clock_period_ms() -> u64 {
    1000
}

fn default_pulse_ms() -> u64 {
    300
}

fn default_error_limit() -> u32 {
    3
}

/// Engine tuning. Every field has a default so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lag used by the next session.
    #[serde(default = "default_n_back")]
    pub n_back: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Seconds per turn when a session is started without an explicit interval.
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u32,
    /// Length of one countdown step.
    #[serde(default = "default_clock_period_ms")]
    pub clock_period_ms: u64,
    /// How long the new-stimulus pulse stays raised.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
    /// Incorrect responses that end a session.
    #[serde(default = "default_error_limit")]
    pub error_limit: u32,
    /// Seed for random stimuli. `None` lets the host pick one.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_back: default_n_back(),
            level: default_level(),
            default_interval_secs: default_interval_secs(),
            clock_period_ms: default_clock_period_ms(),
            pulse_ms: default_pulse_ms(),
            error_limit: default_error_limit(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Clamp values that would make the game degenerate.
    pub fn sanitized(mut self) -> Self {
        self.n_back = self.n_back.max(1);
        self.default_interval_secs = self.default_interval_secs.clamp(1, 3600);
        self.clock_period_ms = self.clock_period_ms.max(1);
        self.error_limit = self.error_limit.max(1);
        self
    }
}
