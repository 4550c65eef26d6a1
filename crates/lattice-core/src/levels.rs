//! Read-only, level-by-level projection of a valued lattice.
//!
//! Presentation layers consume this projection instead of the lattice
//! itself, so they never see node linkage. Within a level, entries are
//! ordered from the up-most node (highest price) to the down-most.

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};
use crate::lattice::Lattice;

/// One node as seen by a consumer of [`LatticeEngine::levels`](crate::LatticeEngine::levels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Underlying price.
    pub price: f64,
    /// Elapsed time in years.
    pub time: f64,
    /// Option value at the node.
    pub option_value: f64,
}

/// All entries at one depth.
pub type Level = Vec<LevelEntry>;

pub(crate) fn project(lattice: &Lattice) -> Vec<Level> {
    (0..lattice.depths())
        .map(|depth| {
            lattice
                .level(depth)
                .iter()
                .rev()
                .map(|node| LevelEntry {
                    price: node.price,
                    time: node.time,
                    option_value: node.option_value.unwrap_or(f64::NAN),
                })
                .collect()
        })
        .collect()
}

/// Per-node hedge ratios `Δ = (V_up - V_down) / (S_up - S_down)`.
///
/// Returns one vector per non-terminal level, aligned with that level's
/// entries. Entry `i` of level `k` has its up child at position `i` and its
/// down child at position `i + 1` of level `k + 1`, so every level must hold
/// exactly one entry more than the level before it.
pub fn hedge_ratios(levels: &[Level]) -> LatticeResult<Vec<Vec<f64>>> {
    levels
        .windows(2)
        .enumerate()
        .map(|(depth, pair)| {
            let (current, next) = (&pair[0], &pair[1]);
            if next.len() != current.len() + 1 {
                return Err(LatticeError::invalid_input(
                    "levels",
                    format!(
                        "level {} has {} entries, expected {}",
                        depth + 1,
                        next.len(),
                        current.len() + 1
                    ),
                ));
            }
            Ok(next
                .windows(2)
                .map(|children| {
                    let (up, down) = (children[0], children[1]);
                    (up.option_value - down.option_value) / (up.price - down.price)
                })
                .collect())
        })
        .collect()
}

/// Hedge ratio at the root, if the levels are well formed and span at least
/// one step.
#[must_use]
pub fn root_delta(levels: &[Level]) -> Option<f64> {
    hedge_ratios(levels)
        .ok()?
        .first()
        .and_then(|l| l.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entry(price: f64, option_value: f64) -> LevelEntry {
        LevelEntry {
            price,
            time: 0.0,
            option_value,
        }
    }

    #[test]
    fn test_hedge_ratios_shape() {
        let levels = vec![
            vec![entry(100.0, 13.28)],
            vec![entry(120.0, 24.2), entry(80.0, 0.0)],
            vec![entry(144.0, 44.0), entry(96.0, 0.0), entry(64.0, 0.0)],
        ];
        let deltas = hedge_ratios(&levels).unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].len(), 1);
        assert_eq!(deltas[1].len(), 2);
        assert_relative_eq!(deltas[1][0], 44.0 / 48.0, epsilon = 1e-12);
        assert_relative_eq!(deltas[1][1], 0.0);
        assert_relative_eq!(deltas[0][0], 24.2 / 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_root_delta_single_level() {
        let levels = vec![vec![entry(100.0, 5.0)]];
        assert!(hedge_ratios(&levels).unwrap().is_empty());
        assert_eq!(root_delta(&levels), None);
    }

    #[test]
    fn test_hedge_ratios_reject_malformed_levels() {
        let levels = vec![vec![entry(100.0, 5.0)], vec![entry(110.0, 10.0)]];
        let err = hedge_ratios(&levels).unwrap_err();

        assert!(matches!(err, LatticeError::InvalidInput { field: "levels", .. }));
        assert_eq!(root_delta(&levels), None);

        let levels = vec![
            vec![entry(100.0, 5.0)],
            vec![entry(120.0, 20.0), entry(80.0, 0.0)],
            vec![entry(144.0, 44.0)],
        ];
        assert!(hedge_ratios(&levels).is_err());
    }
}
