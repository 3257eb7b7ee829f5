//! Daemon configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. `config.json` in the data directory (every field optional)
//! 3. environment: `NBACK_LISTEN`, `NBACK_N`, `NBACK_INTERVAL`, `NBACK_SEED`

use nback::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_listen_addr() -> String {
    "127.0.0.1:9877".to_string()
}

fn default_frame_ms() -> u64 {
    50
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// How often the frame loop feeds elapsed time into the engine.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            frame_ms: default_frame_ms(),
            engine: EngineConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply overrides from a variable lookup (the process env in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NBACK_LISTEN") {
            self.listen_addr = v.trim().to_string();
        }
        if let Some(v) = lookup("NBACK_N") {
            match v.trim().parse::<u32>() {
                Ok(n) => self.engine.n_back = n,
                Err(_) => warn!("Unknown NBACK_N value: {}", v),
            }
        }
        if let Some(v) = lookup("NBACK_INTERVAL") {
            match v.trim().parse::<u32>() {
                Ok(s) => self.engine.default_interval_secs = s,
                Err(_) => warn!("Unknown NBACK_INTERVAL value: {}", v),
            }
        }
        if let Some(v) = lookup("NBACK_SEED") {
            match v.trim().parse::<u64>() {
                Ok(seed) => self.engine.seed = Some(seed),
                Err(_) => warn!("Unknown NBACK_SEED value: {}", v),
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.frame_ms = self.frame_ms.clamp(5, 1000);
        self.engine = self.engine.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("nbackd-no-such-config.json");
        let cfg = DaemonConfig::load(&path).unwrap();
        assert_eq!(cfg, DaemonConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: DaemonConfig =
            serde_json::from_str(r#"{"frame_ms":20,"engine":{"n_back":3}}"#).unwrap();
        assert_eq!(cfg.frame_ms, 20);
        assert_eq!(cfg.listen_addr, "127.0.0.1:9877");
        assert_eq!(cfg.engine.n_back, 3);
        assert_eq!(cfg.engine.default_interval_secs, 5);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("nbackd-bad-config-{}.json", std::process::id()));
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(DaemonConfig::load(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn env_overrides_and_ignores_garbage() {
        let env: HashMap<&str, &str> = [
            ("NBACK_LISTEN", "0.0.0.0:1234"),
            ("NBACK_N", "4"),
            ("NBACK_INTERVAL", "soon"),
            ("NBACK_SEED", "99"),
        ]
        .into_iter()
        .collect();

        let mut cfg = DaemonConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.listen_addr, "0.0.0.0:1234");
        assert_eq!(cfg.engine.n_back, 4);
        assert_eq!(cfg.engine.default_interval_secs, 5);
        assert_eq!(cfg.engine.seed, Some(99));
    }

    #[test]
    fn sanitized_clamps_frame_rate() {
        let cfg = DaemonConfig {
            frame_ms: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.frame_ms, 5);
    }
}
