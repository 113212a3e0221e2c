//! Q-learning and SARSA agents
//!
//! Both algorithms are the same [`TdAgent`]: a TD(λ) core over a
//! (possibly delayed) Q-table plus an epsilon-greedy policy. They differ
//! only in which next action the bootstrap target uses, which
//! [`TdAlgorithm`] encodes.

use std::{fmt, hash::Hash};

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    actions::ActionSpace,
    config::{Hyperparameters, TdAlgorithm, TdConfig},
    error::{Error, Result},
    policy::{ExplorationPolicy, greedy_index},
    ports::Learner,
    td::{
        TdCore,
        delayed::DelayedTable,
        eligibility::EligibilityTraces,
        q_table::{QTable, max_value},
    },
    types::{Preset, Transition},
    value::ActionValue,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular TD(λ) control agent.
///
/// `A` is the environment's action space, `S` its state key and `V` the
/// element type of the Q-table.
///
/// Unknown states are materialized with zero values the first time a
/// learning or action-selection path touches them. Introspection methods
/// ([`TdAgent::action_values`] and friends) never materialize and return
/// `None` for unseen states.
#[derive(Debug, Clone)]
pub struct TdAgent<A, S, V = f64> {
    config: TdConfig,
    exploration: ExplorationPolicy,
    core: TdCore<S, DelayedTable<S, V>>,
    action_space: Option<A>,
    episodes_completed: u64,
    current_episode: Option<usize>,
    rng: StdRng,
}

impl<A, S, V> TdAgent<A, S, V>
where
    A: ActionSpace,
    S: Clone + Eq + Hash + fmt::Debug,
    V: ActionValue,
{
    /// Create an agent from a validated configuration.
    ///
    /// The agent is unusable until [`TdAgent::layout`] supplies the action
    /// space.
    pub fn new(config: TdConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            exploration: config.exploration(),
            core: TdCore::new(
                config.hyperparameters.td_params(),
                DelayedTable::new(QTable::new(0)),
            ),
            action_space: None,
            episodes_completed: 0,
            current_episode: None,
            rng: build_rng(config.seed),
            config,
        })
    }

    /// Off-policy TD control.
    pub fn q_learning(hyperparameters: Hyperparameters) -> Result<Self> {
        Self::new(TdConfig::new(TdAlgorithm::QLearning, hyperparameters))
    }

    /// On-policy TD control.
    pub fn sarsa(hyperparameters: Hyperparameters) -> Result<Self> {
        Self::new(TdConfig::new(TdAlgorithm::Sarsa, hyperparameters))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &TdConfig {
        &self.config
    }

    pub fn algorithm(&self) -> TdAlgorithm {
        self.config.algorithm
    }

    /// Exploitation probability currently fed to the policy.
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.episodes_completed)
    }

    pub fn episodes_completed(&self) -> u64 {
        self.episodes_completed
    }

    pub fn action_space(&self) -> Option<&A> {
        self.action_space.as_ref()
    }

    /// Table the policy acts on.
    pub fn q_table(&self) -> &QTable<S, V> {
        self.core.table().stable()
    }

    pub fn table_size(&self) -> usize {
        self.q_table().len()
    }

    pub fn eligibility(&self) -> &EligibilityTraces<S> {
        self.core.traces()
    }

    fn space(&self, operation: &str) -> Result<&A> {
        self.action_space
            .as_ref()
            .ok_or_else(|| Error::not_laid_out(operation))
    }

    /// Announce the environment layout.
    ///
    /// Drops everything learned so far and any active episode, sizes the
    /// table for `action_space`, then applies `presets`. If delayed
    /// learning was on it stays on, starting from the fresh table.
    pub fn layout(&mut self, n_states: usize, action_space: A, presets: &[Preset<S>]) {
        let n_actions = action_space.n_actions();
        let delayed = self.core.table().is_delayed();

        self.core.episode_end();
        self.current_episode = None;

        let table = self.core.table_mut();
        table.reset(QTable::with_capacity(n_actions, n_states));
        for preset in presets {
            table.preset_state(
                preset.state.clone(),
                V::from_f64(preset.value),
                preset.is_terminal,
            );
        }
        if delayed {
            table.set_delayed_learning(true);
        }

        debug!(
            n_states = n_states,
            n_actions = n_actions,
            presets = presets.len(),
            algorithm = self.config.algorithm.name(),
            "layout"
        );
        self.action_space = Some(action_space);
    }

    /// Pin `state` to `value` for every action, marking it terminal.
    pub fn pin_value(&mut self, state: S, value: f64) {
        self.core
            .table_mut()
            .preset_state(state, V::from_f64(value), true);
    }

    /// Begin episode `episode` at `state` and return the first action.
    pub fn episode_start(&mut self, episode: usize, state: &S) -> Result<A::Action> {
        self.space("episode_start")?;
        self.core.table_mut().ensure(state);
        self.core.episode_start(state.clone());
        self.current_episode = Some(episode);
        debug!(episode = episode, epsilon = self.epsilon(), "episode start");

        let index = self.select_index(state);
        self.action_at(index)
    }

    /// Learn from `state --action--> next_state` and return the next action.
    ///
    /// SARSA picks the next action before the update and bootstraps on it.
    /// Q-learning bootstraps on the best next value and picks the next
    /// action afterwards, from the updated table.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not where the previous transition ended.
    pub fn one_step(
        &mut self,
        state: &S,
        action: &A::Action,
        reward: f64,
        next_state: &S,
    ) -> Result<A::Action> {
        let action_index = self.space("one_step")?.index_of(action)?;

        let table = self.core.table_mut();
        table.ensure(state);
        table.ensure(next_state);

        let next_index = if self.config.algorithm.next_action_considered() {
            let next_index = self.select_index(next_state);
            self.core
                .step(state, action_index, reward, next_state, Some(next_index));
            next_index
        } else {
            self.core.step(state, action_index, reward, next_state, None);
            self.select_index(next_state)
        };

        self.action_at(next_index)
    }

    /// Close the current episode.
    pub fn episode_end(&mut self) {
        self.core.episode_end();
        if let Some(episode) = self.current_episode.take() {
            self.episodes_completed += 1;
            debug!(
                episode = episode,
                completed = self.episodes_completed,
                "episode end"
            );
        }
    }

    /// Replay a recorded episode through the learner.
    ///
    /// Recorded actions are used as-is; the learner's own action choices
    /// are discarded. An empty record does nothing.
    pub fn whole_episode(&mut self, transitions: &[Transition<S, A::Action>]) -> Result<()> {
        let Some(first) = transitions.first() else {
            return Ok(());
        };

        let episode = usize::try_from(self.episodes_completed).unwrap_or(usize::MAX);
        self.episode_start(episode, &first.state)?;
        for transition in transitions {
            self.one_step(
                &transition.state,
                &transition.action,
                transition.reward,
                &transition.next_state,
            )?;
        }
        self.episode_end();
        Ok(())
    }

    /// Exploring action selection for `state`.
    pub fn next_action(&mut self, state: &S) -> Result<A::Action> {
        self.space("next_action")?;
        let index = self.select_index(state);
        self.action_at(index)
    }

    /// Greedy action for `state`; the first maximum wins ties.
    pub fn best_action(&self, state: &S) -> Result<A::Action> {
        let space = self.space("best_action")?;
        let index = self
            .core
            .table()
            .policy_values(state)
            .map(greedy_index)
            .unwrap_or(0);
        Ok(space.action_at(index))
    }

    pub fn action_values(&self, state: &S) -> Option<&[V]> {
        self.core.table().policy_values(state)
    }

    pub fn action_values_by_action(&self, state: &S) -> Option<Vec<(A::Action, V)>> {
        let space = self.action_space.as_ref()?;
        let values = self.action_values(state)?;
        Some(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (space.action_at(i), v))
                .collect(),
        )
    }

    /// Best value of `state` rounded to two decimals, for display.
    pub fn text_to_display(&self, state: &S) -> Option<String> {
        let values = self.action_values(state)?;
        if values.is_empty() {
            return None;
        }
        Some(format!("{:.2}", max_value(values).to_f64()))
    }

    /// Route updates to a shadow table (see [`DelayedTable`]).
    pub fn set_delayed_learning(&mut self, enabled: bool) {
        self.core.table_mut().set_delayed_learning(enabled);
    }

    pub fn is_delayed_learning(&self) -> bool {
        self.core.table().is_delayed()
    }

    /// Let the policy see updates accumulated while learning is delayed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelayedLearningInactive`] when delayed learning is off.
    pub fn catch_up(&mut self) -> Result<()> {
        self.core.table_mut().catch_up()
    }

    fn select_index(&mut self, state: &S) -> usize {
        self.core.table_mut().ensure(state);
        let values = self.core.table().policy_values(state).unwrap_or(&[]);
        self.exploration
            .select(values, self.episodes_completed, &mut self.rng)
    }

    fn action_at(&self, index: usize) -> Result<A::Action> {
        Ok(self.space("action selection")?.action_at(index))
    }

    pub(crate) fn restore(
        config: TdConfig,
        action_space: A,
        table: QTable<S, V>,
        episodes_completed: u64,
    ) -> Result<Self> {
        if table.n_actions() != action_space.n_actions() {
            return Err(Error::invalid_config(format!(
                "saved table has {} actions, action space has {}",
                table.n_actions(),
                action_space.n_actions()
            )));
        }
        if let Some(state) = table
            .states()
            .find(|state| table.get(state).map_or(0, <[V]>::len) != table.n_actions())
        {
            return Err(Error::invalid_config(format!(
                "saved row for state {state:?} does not have {} actions",
                table.n_actions()
            )));
        }
        let mut agent = Self::new(config)?;
        agent.core.table_mut().reset(table);
        agent.action_space = Some(action_space);
        agent.episodes_completed = episodes_completed;
        Ok(agent)
    }
}

impl<A, S, V> Learner<S> for TdAgent<A, S, V>
where
    A: ActionSpace,
    S: Clone + Eq + Hash + fmt::Debug,
    V: ActionValue,
{
    type Space = A;

    fn layout(&mut self, n_states: usize, action_space: A, presets: &[Preset<S>]) {
        TdAgent::layout(self, n_states, action_space, presets);
    }

    fn episode_start(&mut self, episode: usize, state: &S) -> Result<A::Action> {
        TdAgent::episode_start(self, episode, state)
    }

    fn one_step(
        &mut self,
        state: &S,
        action: &A::Action,
        reward: f64,
        next_state: &S,
    ) -> Result<A::Action> {
        TdAgent::one_step(self, state, action, reward, next_state)
    }

    fn episode_end(&mut self) {
        TdAgent::episode_end(self);
    }

    fn next_action(&mut self, state: &S) -> Result<A::Action> {
        TdAgent::next_action(self, state)
    }

    fn best_action(&self, state: &S) -> Result<A::Action> {
        TdAgent::best_action(self, state)
    }

    fn text_to_display(&self, state: &S) -> Option<String> {
        TdAgent::text_to_display(self, state)
    }

    fn name(&self) -> &str {
        self.config.algorithm.name()
    }
}
