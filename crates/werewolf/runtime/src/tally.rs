//! Vote Aggregator — reduces a set of votes to one target
//!
//! Counts how often each distinct target was named, keeps every target at
//! the maximum count, and draws the winner uniformly among them. The same
//! reduction serves the werewolf kill consensus and the day elimination.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use werewolf_types::{PlayerId, WerewolfError, WerewolfResult};

/// Result of one tally
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    /// The selected target
    pub winner: PlayerId,
    /// Votes the winner received
    pub votes: usize,
    /// Every target that reached the maximum, in identity order
    pub tied: Vec<PlayerId>,
    /// Vote count per distinct target
    pub counts: BTreeMap<PlayerId, usize>,
}

impl TallyOutcome {
    pub fn is_tie(&self) -> bool {
        self.tied.len() > 1
    }
}

/// Tally `votes` (voter → target) and pick a winner.
///
/// Fails with [`WerewolfError::EmptyVoteSet`] when nobody voted.
pub fn tally<R: Rng + ?Sized>(
    votes: &BTreeMap<PlayerId, PlayerId>,
    rng: &mut R,
) -> WerewolfResult<TallyOutcome> {
    let mut counts: BTreeMap<PlayerId, usize> = BTreeMap::new();
    for target in votes.values() {
        *counts.entry(target.clone()).or_default() += 1;
    }

    let max = counts
        .values()
        .copied()
        .max()
        .ok_or(WerewolfError::EmptyVoteSet)?;

    let tied: Vec<PlayerId> = counts
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(target, _)| target.clone())
        .collect();

    let winner = tied
        .choose(rng)
        .cloned()
        .ok_or(WerewolfError::EmptyVoteSet)?;

    debug!(
        winner = %winner,
        votes = max,
        tied = tied.len(),
        voters = votes.len(),
        "Votes tallied"
    );

    Ok(TallyOutcome {
        winner,
        votes: max,
        tied,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn p(n: usize) -> PlayerId {
        PlayerId::seat(n)
    }

    fn ballots(pairs: &[(usize, usize)]) -> BTreeMap<PlayerId, PlayerId> {
        pairs.iter().map(|(v, t)| (p(*v), p(*t))).collect()
    }

    #[test]
    fn test_empty_vote_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = tally(&BTreeMap::new(), &mut rng).unwrap_err();
        assert!(matches!(err, WerewolfError::EmptyVoteSet));
    }

    #[test]
    fn test_strict_majority_always_wins() {
        let votes = ballots(&[(1, 5), (2, 5), (3, 5), (4, 6), (5, 7), (6, 8)]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = tally(&votes, &mut rng).unwrap();
            assert_eq!(outcome.winner, p(5));
            assert_eq!(outcome.votes, 3);
            assert!(!outcome.is_tie());
        }
    }

    #[test]
    fn test_counts_targets_not_voters() {
        let votes = ballots(&[(1, 9), (2, 9)]);
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = tally(&votes, &mut rng).unwrap();
        assert_eq!(outcome.counts.len(), 1);
        assert_eq!(outcome.counts[&p(9)], 2);
    }

    #[test]
    fn test_three_way_tie_stays_in_tie_set() {
        let votes = ballots(&[(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3)]);
        let tie: BTreeSet<PlayerId> = [p(1), p(2), p(3)].into_iter().collect();
        let mut seen = BTreeSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = tally(&votes, &mut rng).unwrap();
            assert!(outcome.is_tie());
            assert!(tie.contains(&outcome.winner));
            seen.insert(outcome.winner);
        }
        assert_eq!(seen, tie);
    }

    proptest! {
        #[test]
        fn prop_winner_is_a_voted_target_with_max_count(
            raw in prop::collection::btree_map(1usize..=9, 1usize..=9, 1..9),
            seed in any::<u64>(),
        ) {
            let votes: BTreeMap<PlayerId, PlayerId> =
                raw.iter().map(|(v, t)| (p(*v), p(*t))).collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = tally(&votes, &mut rng).unwrap();

            prop_assert!(votes.values().any(|t| *t == outcome.winner));
            let max = outcome.counts.values().copied().max().unwrap();
            prop_assert_eq!(outcome.counts[&outcome.winner], max);
            prop_assert_eq!(outcome.votes, max);
        }
    }
}
