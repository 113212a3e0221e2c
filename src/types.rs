//! Core data types shared between drivers and learners.

use serde::{Deserialize, Serialize};

/// A state whose value is known before learning starts.
///
/// Terminal states are announced this way so their whole action-value
/// vector is pinned to the reward collected on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset<S> {
    pub state: S,
    pub value: f64,
    pub is_terminal: bool,
}

impl<S> Preset<S> {
    pub fn new(state: S, value: f64, is_terminal: bool) -> Self {
        Self {
            state,
            value,
            is_terminal,
        }
    }

    /// Terminal preset pinned at `value`.
    pub fn terminal(state: S, value: f64) -> Self {
        Self::new(state, value, true)
    }
}

impl<S> From<(S, f64, bool)> for Preset<S> {
    fn from((state, value, is_terminal): (S, f64, bool)) -> Self {
        Self::new(state, value, is_terminal)
    }
}

/// One recorded step of an episode.
///
/// Within an episode, each transition's `state` equals the previous
/// transition's `next_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    pub state: S,
    pub action: A,
    pub reward: f64,
    pub next_state: S,
}

impl<S, A> Transition<S, A> {
    pub fn new(state: S, action: A, reward: f64, next_state: S) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
        }
    }
}

impl<S, A> From<(S, A, f64, S)> for Transition<S, A> {
    fn from((state, action, reward, next_state): (S, A, f64, S)) -> Self {
        Self::new(state, action, reward, next_state)
    }
}
