use thiserror::Error;

/// Failure reported by a [`KeyValueStore`](crate::ports::KeyValueStore) write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a [`SoundCuePlayer`](crate::ports::SoundCuePlayer).
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("playback denied")]
    Denied,
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}
