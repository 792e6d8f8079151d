//! Queue navigation
//!
//! Pure selection of the next/previous queue index under the shuffle flag
//! and repeat mode. The randomness source is injected so callers (and
//! tests) control determinism.

use crate::types::RepeatMode;
use aria_core::types::{Song, SongId};
use rand::Rng;

/// Upper bound on shuffle re-picks before falling back to a deterministic
/// neighbor. With a fair RNG the loop leaves after one or two draws; the
/// bound only guards against a degenerate generator.
const MAX_SHUFFLE_RETRIES: usize = 16;

/// Select the index of the next song to play
///
/// Returns `None` when playback should stop: either the queue is empty, or
/// its end was reached with repeat off. A current song that is not in the
/// queue (for example it was removed) is treated as "before the start", so
/// the first song is selected.
pub fn next_index(
    queue: &[Song],
    current: Option<&SongId>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut impl Rng,
) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }

    let Some(idx) = current.and_then(|id| position_of(queue, id)) else {
        return Some(0);
    };

    if shuffle {
        return Some(random_other_index(queue.len(), idx, rng));
    }

    if idx + 1 < queue.len() {
        Some(idx + 1)
    } else {
        match repeat {
            RepeatMode::All => Some(0),
            RepeatMode::One => Some(idx),
            RepeatMode::Off => None,
        }
    }
}

/// Select the index of the previous song to play
///
/// Mirrors `next_index` with indices decreasing: an unrecognized current
/// song selects the last index, repeat-all wraps from the first song to the
/// last, and repeat-off yields `None` at the start ("stay at first" - the
/// caller leaves playback alone).
pub fn previous_index(
    queue: &[Song],
    current: Option<&SongId>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut impl Rng,
) -> Option<usize> {
    if queue.is_empty() {
        return None;
    }

    let Some(idx) = current.and_then(|id| position_of(queue, id)) else {
        return Some(queue.len() - 1);
    };

    if shuffle {
        return Some(random_other_index(queue.len(), idx, rng));
    }

    if idx > 0 {
        Some(idx - 1)
    } else {
        match repeat {
            RepeatMode::All => Some(queue.len() - 1),
            RepeatMode::One => Some(idx),
            RepeatMode::Off => None,
        }
    }
}

/// First occurrence of `id` in the queue (duplicates allowed)
fn position_of(queue: &[Song], id: &SongId) -> Option<usize> {
    queue.iter().position(|s| &s.id == id)
}

/// Uniform pick over all indices, re-drawn while it lands on `avoid`
///
/// For `len == 1` the sole index is returned. For larger queues the result
/// is guaranteed to differ from `avoid`: if the bounded retry loop somehow
/// exhausts itself, the next neighbor is used.
fn random_other_index(len: usize, avoid: usize, rng: &mut impl Rng) -> usize {
    if len <= 1 {
        return avoid.min(len.saturating_sub(1));
    }

    for _ in 0..MAX_SHUFFLE_RETRIES {
        let candidate = rng.gen_range(0..len);
        if candidate != avoid {
            return candidate;
        }
    }

    (avoid + 1) % len
}
