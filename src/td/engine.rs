//! Generic TD(λ) update engine.
//!
//! [`TdCore`] knows nothing about how values are stored. It owns a table
//! implementing [`ValueAccess`] and drives it through one rule:
//!
//! ```text
//! predict = Q(s, a)
//! target  = r + γ·λ·Q(s', a')      a' = None -> max over s'
//! δ       = α·(target - predict)
//! ```
//!
//! With λ = 0 only `(s, a)` receives δ. With λ > 0, `(s, a)` is marked with
//! full credit and every traced pair receives `δ·e` before its weight `e`
//! is decayed by λ.
//!
//! The same λ scales the bootstrap term of the target and decays the
//! traces, so with λ = 0 the target reduces to the immediate reward.
//!
//! Passing `None` as the next action gives the off-policy (Q-learning)
//! target; passing the action actually chosen gives the on-policy (SARSA)
//! target. Nothing else differs between the two.

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::eligibility::EligibilityTraces;
use crate::ports::ValueAccess;

/// Step-size, discount and trace-decay of the update rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdParams {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Eligibility decay λ
    pub lambda: f64,
}

impl TdParams {
    pub fn new(alpha: f64, gamma: f64, lambda: f64) -> Self {
        Self {
            alpha,
            gamma,
            lambda,
        }
    }
}

/// Quantities computed by one [`TdCore::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    pub predict: f64,
    pub target: f64,
    /// α·(target − predict)
    pub delta: f64,
}

/// TD(λ) learner state: parameters, owned value table, traces and the
/// episode cursor used to check transition continuity.
#[derive(Debug, Clone)]
pub struct TdCore<S, T> {
    params: TdParams,
    table: T,
    traces: EligibilityTraces<S>,
    last_state: Option<S>,
}

impl<S, T> TdCore<S, T>
where
    S: Clone + Eq + Hash + std::fmt::Debug,
    T: ValueAccess<S>,
{
    pub fn new(params: TdParams, table: T) -> Self {
        Self {
            params,
            table,
            traces: EligibilityTraces::new(),
            last_state: None,
        }
    }

    pub fn params(&self) -> &TdParams {
        &self.params
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut T {
        &mut self.table
    }

    pub fn into_table(self) -> T {
        self.table
    }

    pub fn traces(&self) -> &EligibilityTraces<S> {
        &self.traces
    }

    /// State the next transition must start from, if an episode is active.
    pub fn last_state(&self) -> Option<&S> {
        self.last_state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.last_state.is_some()
    }

    /// Start (or restart) an episode at `state`, dropping all traces.
    pub fn episode_start(&mut self, state: S) {
        self.traces.clear();
        self.last_state = Some(state);
    }

    /// Apply one TD(λ) update for the transition `state --action--> next_state`.
    ///
    /// `next_action` selects the bootstrap: `None` uses the maximum over
    /// `next_state`'s values, `Some(a)` uses that action's value.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not the state the previous transition ended in
    /// (or no episode is active).
    pub fn step(
        &mut self,
        state: &S,
        action: usize,
        reward: f64,
        next_state: &S,
        next_action: Option<usize>,
    ) -> TdUpdate {
        assert!(
            self.last_state.as_ref() == Some(state),
            "transition continuity violated: expected {:?}, got {:?}",
            self.last_state,
            state
        );

        let TdParams {
            alpha,
            gamma,
            lambda,
        } = self.params;

        let predict = self.table.value_of(state, Some(action));
        let target = reward + gamma * lambda * self.table.value_of(next_state, next_action);
        let delta = alpha * (target - predict);

        if lambda == 0.0 {
            self.table.apply_delta(state, action, delta);
        } else {
            self.traces.mark(state, action);
            let table = &mut self.table;
            self.traces
                .propagate(delta, lambda, |s, a, weighted| table.apply_delta(s, a, weighted));
        }

        trace!(
            predict = predict,
            target = target,
            delta = delta,
            traced = self.traces.len(),
            "td step"
        );

        self.last_state = Some(next_state.clone());
        TdUpdate {
            predict,
            target,
            delta,
        }
    }

    /// Close the episode: forget the cursor and every trace.
    pub fn episode_end(&mut self) {
        self.last_state = None;
        self.traces.clear();
    }
}
