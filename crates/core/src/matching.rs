//! Per-channel comparison of a stimulus against its n-back reference.

use crate::stimulus::{Channel, Stimulus};

/// Channels on which `candidate` repeats `reference`, in [`Channel::ALL`] order.
pub fn matching_channels(reference: &Stimulus, candidate: &Stimulus) -> Vec<Channel> {
    Channel::ALL
        .iter()
        .copied()
        .filter(|&ch| candidate.matches_on(reference, ch))
        .collect()
}
