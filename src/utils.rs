//! Utility functions shared by the solvers

use rand::{SeedableRng, rngs::StdRng};

/// Build the engine RNG: deterministic when seeded, OS-seeded otherwise.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Index of the first maximal value, or `None` for an empty input.
///
/// Later entries only win when strictly greater, so ties resolve to the
/// earliest position.
///
/// ```
/// use tictactoe_mdp::utils::first_max_index;
///
/// assert_eq!(first_max_index([1.0, 3.0, 3.0, 2.0]), Some(1));
/// assert_eq!(first_max_index(Vec::<f64>::new()), None);
/// ```
pub fn first_max_index<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx)
}
