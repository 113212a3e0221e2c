//! Action spaces: mapping domain actions to dense indices.
//!
//! The learning core only ever sees action *indices*. Environments speak in
//! their own action vocabulary (compass directions for grid worlds) and an
//! [`ActionSpace`] translates between the two.

use std::fmt;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bidirectional mapping between domain actions and dense indices `0..n_actions`.
pub trait ActionSpace {
    type Action: Clone + PartialEq + fmt::Debug;

    /// Number of actions; every value vector has this length.
    fn n_actions(&self) -> usize;

    /// Dense index of `action`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if the action is not in the space.
    fn index_of(&self, action: &Self::Action) -> Result<usize>;

    /// Action at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_actions()`.
    fn action_at(&self, index: usize) -> Self::Action;

    /// Uniformly sampled action.
    fn random_sample<R: Rng>(&self, rng: &mut R) -> Self::Action {
        let index = rng.random_range(0..self.n_actions());
        self.action_at(index)
    }
}

/// Action space backed by an ordered list of distinct actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteActions<A> {
    actions: Vec<A>,
}

impl<A> DiscreteActions<A>
where
    A: Clone + PartialEq + fmt::Debug,
{
    /// Build an action space; indices follow the order of `actions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the list is empty or
    /// contains duplicates.
    pub fn new(actions: impl IntoIterator<Item = A>) -> Result<Self> {
        let actions: Vec<A> = actions.into_iter().collect();
        if actions.is_empty() {
            return Err(Error::invalid_config("action space must not be empty"));
        }
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].contains(action) {
                return Err(Error::invalid_config(format!(
                    "duplicate action {action:?} in action space"
                )));
            }
        }
        Ok(Self { actions })
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }
}

impl<A> ActionSpace for DiscreteActions<A>
where
    A: Clone + PartialEq + fmt::Debug,
{
    type Action = A;

    fn n_actions(&self) -> usize {
        self.actions.len()
    }

    fn index_of(&self, action: &A) -> Result<usize> {
        self.actions
            .iter()
            .position(|candidate| candidate == action)
            .ok_or_else(|| Error::UnknownAction {
                action: format!("{action:?}"),
            })
    }

    fn action_at(&self, index: usize) -> A {
        self.actions[index].clone()
    }

    fn random_sample<R: Rng>(&self, rng: &mut R) -> A {
        // Non-empty by construction.
        self.actions
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.actions[0].clone())
    }
}

/// Compass moves of a grid-world agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The four-direction action space, indexed N=0, E=1, S=2, W=3.
    pub fn action_space() -> DiscreteActions<Direction> {
        DiscreteActions {
            actions: Self::ALL.to_vec(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        f.write_str(symbol)
    }
}
