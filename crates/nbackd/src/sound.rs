//! Sound cue port for a host without an audio device.
//!
//! Cues are reported through `tracing` so a UI tailing the log (or a human
//! watching the terminal) can follow the game rhythm.

use nback::{SoundCue, SoundCuePlayer, SoundError};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CueLogger {
    played: u64,
}

impl CueLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played since the daemon started.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl SoundCuePlayer for CueLogger {
    fn play(&mut self, cue: SoundCue) -> Result<(), SoundError> {
        self.played += 1;
        info!(target: "nbackd::sound", "♪ {}", cue.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_cue() {
        let mut p = CueLogger::new();
        p.play(SoundCue::StimulusShown).unwrap();
        p.play(SoundCue::IncorrectResponse).unwrap();
        assert_eq!(p.played(), 2);
    }
}
