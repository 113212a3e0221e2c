//! Tabular TD(λ) learning for grid-world testbeds
//!
//! This crate provides:
//! - A sparse action-value table keyed by any hashable state type
//! - Epsilon-greedy action selection with fair multi-argmax tie-breaking
//! - A generic TD(λ) core with replacing eligibility traces
//! - Q-learning and SARSA agents built on that core
//! - Delayed learning through a double-buffered table
//!
//! Environments, rendering and experience replay live outside this crate;
//! they drive a learner through the [`ports::Learner`] interface.

pub mod actions;
pub mod config;
pub mod error;
pub mod policy;
pub mod ports;
pub mod td;
pub mod types;
pub mod value;

pub use actions::{ActionSpace, Direction, DiscreteActions};
pub use config::{Hyperparameters, TdAlgorithm, TdConfig};
pub use error::{Error, Result};
pub use policy::{EpsilonGreedy, ExplorationPolicy, ExploreSchedule};
pub use td::{DelayedTable, QTable, SavedTdAgent, TdAgent, TdCore};
pub use types::{Preset, Transition};
pub use value::ActionValue;
