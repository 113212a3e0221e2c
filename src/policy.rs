//! Action selection over action-value vectors.
//!
//! # Epsilon convention
//!
//! [`EpsilonGreedy`] keeps the grid-game convention where `epsilon` is the
//! probability of *exploiting*: a uniform draw `u` greater than `epsilon`
//! sends the selector to the non-greedy actions. With `epsilon = 0.9` the
//! agent exploits about 90% of the time. This is the reverse of the usual
//! textbook reading of ε.
//!
//! Ties are never broken by position: every action sharing the maximum is
//! an equally likely exploitation choice, and exploration draws only from
//! actions *outside* that set.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::value::ActionValue;

/// Indices of every entry equal to the maximum, in ascending order.
///
/// # Panics
///
/// Panics if `values` is empty or contains NaN.
pub fn argmax_multi<V: ActionValue>(values: &[V]) -> Vec<usize> {
    assert!(!values.is_empty(), "argmax over an empty action-value vector");
    assert!(
        values.iter().all(|v| v.partial_cmp(v).is_some()),
        "argmax over NaN action values: {values:?}"
    );
    let mut best = values[0];
    let mut indexes = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            indexes.clear();
            indexes.push(i);
        } else if v == best {
            indexes.push(i);
        }
    }
    indexes
}

/// Ascending indices in `0..n` that are not in `indexes`.
pub fn complement(n: usize, indexes: &[usize]) -> Vec<usize> {
    (0..n).filter(|i| !indexes.contains(i)).collect()
}

/// Index of the first maximum; used for exploitation-only play.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn greedy_index<V: ActionValue>(values: &[V]) -> usize {
    assert!(!values.is_empty(), "argmax over an empty action-value vector");
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}

/// Epsilon-greedy selector with multi-argmax tie-breaking.
///
/// `epsilon` is the exploitation probability (see the module docs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    pub epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Select an action index from `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty or contains NaN.
    pub fn select<V: ActionValue, R: Rng>(&self, values: &[V], rng: &mut R) -> usize {
        select_with_epsilon(self.epsilon, values, rng)
    }
}

fn select_with_epsilon<V: ActionValue, R: Rng>(
    epsilon: f64,
    values: &[V],
    rng: &mut R,
) -> usize {
    let n_actions = values.len();
    assert!(n_actions >= 1, "epsilon-greedy over an empty action-value vector");
    if n_actions == 1 {
        return 0;
    }

    let mut indexes = argmax_multi(values);
    let draw: f64 = rng.random();
    if draw > epsilon && indexes.len() < n_actions {
        indexes = complement(n_actions, &indexes);
    }

    assert!(!indexes.is_empty(), "no candidate action for {values:?}");
    *indexes.choose(rng).expect("candidate set is non-empty")
}

/// Exploration rate decaying exponentially with completed episodes.
///
/// `explore_rate(step) = stop + (start - stop) * exp(-decay_rate * step)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExploreSchedule {
    pub start: f64,
    pub stop: f64,
    pub decay_rate: f64,
}

impl Default for ExploreSchedule {
    fn default() -> Self {
        Self {
            start: 1.0,
            stop: 0.4,
            decay_rate: 1e-5,
        }
    }
}

impl ExploreSchedule {
    pub fn new(start: f64, stop: f64, decay_rate: f64) -> Self {
        Self {
            start,
            stop,
            decay_rate,
        }
    }

    /// Probability of exploring after `step` completed episodes.
    pub fn explore_rate(&self, step: u64) -> f64 {
        self.stop + (self.start - self.stop) * (-self.decay_rate * step as f64).exp()
    }

    /// Exploitation probability fed to the epsilon-greedy selector.
    pub fn epsilon_at(&self, step: u64) -> f64 {
        1.0 - self.explore_rate(step)
    }
}

/// Exploration strategy of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExplorationPolicy {
    /// Constant epsilon from the hyperparameters
    Fixed(EpsilonGreedy),
    /// Epsilon derived from an [`ExploreSchedule`]
    Scheduled(ExploreSchedule),
}

impl ExplorationPolicy {
    /// Effective epsilon after `completed_episodes`.
    pub fn epsilon(&self, completed_episodes: u64) -> f64 {
        match self {
            ExplorationPolicy::Fixed(greedy) => greedy.epsilon,
            ExplorationPolicy::Scheduled(schedule) => schedule.epsilon_at(completed_episodes),
        }
    }

    pub fn select<V: ActionValue, R: Rng>(
        &self,
        values: &[V],
        completed_episodes: u64,
        rng: &mut R,
    ) -> usize {
        select_with_epsilon(self.epsilon(completed_episodes), values, rng)
    }
}
