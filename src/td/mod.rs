//! Tabular temporal difference learning: Q-learning, SARSA and TD(λ)
//!
//! Both control algorithms share one update engine, [`TdCore`], and differ
//! only in the bootstrap target handed to it.
//!
//! ## Algorithms
//!
//! - **Q-learning**: off-policy, bootstraps on `max_a Q(s', a)`
//! - **SARSA**: on-policy, bootstraps on `Q(s', a')` for the action `a'`
//!   the agent will actually take
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Bootstrap | `None` (max over next state) | `Some(next action)` |
//! | Next action chosen | After the update | Before the update |
//!
//! ## Building blocks
//!
//! - [`QTable`]: sparse state -> action-value vector store
//! - [`EligibilityTraces`]: per-episode decaying credit
//! - [`TdCore`]: the TD(λ) update rule over any [`ValueAccess`](crate::ports::ValueAccess)
//! - [`DelayedTable`]: stable/shadow double buffer for delayed learning
//! - [`TdAgent`]: the pieces wired together with an epsilon-greedy policy
//!
//! ## Usage Example
//!
//! ```no_run
//! use gridlearn::{
//!     actions::{DiscreteActions, Direction},
//!     config::Hyperparameters,
//!     td::TdAgent,
//!     types::Preset,
//! };
//!
//! let mut agent: TdAgent<DiscreteActions<Direction>, (i32, i32)> = TdAgent::sarsa(
//!     Hyperparameters::new(
//!         0.1,  // alpha
//!         0.99, // gamma
//!         0.5,  // lambda
//!         0.9,  // epsilon (exploitation probability)
//!     ),
//! )?;
//! agent.layout(100, Direction::action_space(), &[Preset::terminal((6, 6), 100.0)]);
//! let first = agent.episode_start(0, &(0, 0))?;
//! # Ok::<(), gridlearn::Error>(())
//! ```

pub mod agent;
pub mod delayed;
pub mod eligibility;
pub mod engine;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::TdAgent;
pub use delayed::DelayedTable;
pub use eligibility::EligibilityTraces;
pub use engine::{TdCore, TdParams, TdUpdate};
pub use q_table::QTable;
pub use serialization::SavedTdAgent;
