//! Random problem selection.
//!
//! Filtering happens in two stages: problems without a contest id or index
//! are dropped first (they cannot be linked to), then an optional rating
//! filter is applied. The rating filter prefers exact matches and widens to
//! a fixed band around the target only when no exact match exists.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::problem::Problem;

/// Half-width of the rating band used when no problem matches the requested
/// rating exactly.
pub const RATING_WINDOW: i32 = 200;

/// Narrows the candidate pool for a random pick.
///
/// Problems missing either identifier are always removed. When `rating` is
/// given, candidates with that exact rating win; if there are none, any
/// candidate within [`RATING_WINDOW`] of the target (inclusive) is kept
/// instead. Unrated problems never satisfy a rating filter.
///
/// An empty result means the caller should report that nothing matched.
pub fn filter_candidates(mut problems: Vec<Problem>, rating: Option<i32>) -> Vec<Problem> {
    problems.retain(Problem::has_identifiers);

    let Some(target) = rating else {
        return problems;
    };

    let has_exact = problems.iter().any(|p| p.rating == Some(target));
    if has_exact {
        problems.retain(|p| p.rating == Some(target));
    } else {
        problems.retain(|p| {
            p.rating
                .is_some_and(|r| (r - target).abs() <= RATING_WINDOW)
        });
    }
    problems
}

/// Picks one candidate uniformly at random, or `None` if the pool is empty.
pub fn pick<'a, R: Rng + ?Sized>(candidates: &'a [Problem], rng: &mut R) -> Option<&'a Problem> {
    candidates.choose(rng)
}
