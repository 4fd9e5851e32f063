#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Nearest-within-range selection shared by enemies and structures.
//!
//! Candidates are compared by Euclidean distance against an inclusive range.
//! Ties keep the candidate seen first, so callers that iterate in ascending
//! identifier order get "lowest id wins" for free.

use dusk_defence_core::WorldPoint;

/// Returns the key of the candidate closest to `origin` within `max_range`.
///
/// A candidate exactly `max_range` away is eligible. Non-finite or negative
/// ranges select nothing.
#[must_use]
pub fn find_nearest<K, I>(origin: WorldPoint, candidates: I, max_range: f32) -> Option<K>
where
    I: IntoIterator<Item = (K, WorldPoint)>,
{
    if !valid_range(max_range) {
        return None;
    }

    let mut best: Option<(K, f32)> = None;
    for (key, position) in candidates {
        let distance = origin.distance(position);
        if distance.is_nan() || distance > max_range {
            continue;
        }

        match &best {
            Some((_, best_distance)) if distance >= *best_distance => {}
            _ => best = Some((key, distance)),
        }
    }

    best.map(|(key, _)| key)
}

/// Collects every candidate within the inclusive `radius`, in iteration order.
#[must_use]
pub fn within_range<K, I>(origin: WorldPoint, candidates: I, radius: f32) -> Vec<K>
where
    I: IntoIterator<Item = (K, WorldPoint)>,
{
    if !valid_range(radius) {
        return Vec::new();
    }

    candidates
        .into_iter()
        .filter(|(_, position)| origin.distance(*position) <= radius)
        .map(|(key, _)| key)
        .collect()
}

fn valid_range(range: f32) -> bool {
    range.is_finite() && range >= 0.0
}
