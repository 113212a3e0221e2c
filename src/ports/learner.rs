//! Learner port - the algorithm plugin an environment driver talks to
//!
//! A driver owns the environment and calls the learner in a fixed rhythm:
//!
//! 1. `layout(...)` once, announcing the action space and preset states
//! 2. For each episode:
//!    - `episode_start(episode, state)` returns the first action
//!    - `one_step(state, action, reward, next_state)` per transition, each
//!      returning the action to take from `next_state`
//!    - `episode_end()` once the driver has seen a terminal transition
//!
//! The learner never decides terminality; the driver stops stepping.

use crate::{
    Result,
    actions::ActionSpace,
    types::Preset,
};

/// Unified interface for tabular learners driven by an environment loop.
///
/// # Examples
///
/// ```no_run
/// use gridlearn::{actions::Direction, ports::Learner};
///
/// fn run_episode<L>(learner: &mut L, start: u32) -> gridlearn::Result<()>
/// where
///     L: Learner<u32, Space = gridlearn::actions::DiscreteActions<Direction>>,
/// {
///     let mut state = start;
///     let mut action = learner.episode_start(0, &state)?;
///     for _ in 0..3 {
///         let next_state = state + 1; // environment step goes here
///         action = learner.one_step(&state, &action, 0.0, &next_state)?;
///         state = next_state;
///     }
///     learner.episode_end();
///     Ok(())
/// }
/// ```
pub trait Learner<S> {
    type Space: ActionSpace;

    /// Announce the environment layout.
    ///
    /// Clears previously learned values and applies every preset, pinning
    /// terminal states to their known value.
    fn layout(&mut self, n_states: usize, action_space: Self::Space, presets: &[Preset<S>]);

    /// Begin an episode from `state` and return the first action.
    fn episode_start(
        &mut self,
        episode: usize,
        state: &S,
    ) -> Result<<Self::Space as ActionSpace>::Action>;

    /// Learn from one transition and return the action to take from `next_state`.
    fn one_step(
        &mut self,
        state: &S,
        action: &<Self::Space as ActionSpace>::Action,
        reward: f64,
        next_state: &S,
    ) -> Result<<Self::Space as ActionSpace>::Action>;

    /// Close the current episode.
    fn episode_end(&mut self);

    /// Exploring action selection for `state`.
    fn next_action(&mut self, state: &S) -> Result<<Self::Space as ActionSpace>::Action>;

    /// Greedy action for `state`, no exploration.
    fn best_action(&self, state: &S) -> Result<<Self::Space as ActionSpace>::Action>;

    /// Short summary of the state's value for a presentation layer.
    ///
    /// Returns `None` for states the learner has never seen.
    fn text_to_display(&self, state: &S) -> Option<String>;

    /// Get the learner's name.
    fn name(&self) -> &str;
}
