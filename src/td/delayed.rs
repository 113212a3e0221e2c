//! Double-buffered Q-table for delayed learning.
//!
//! While delayed learning is on, every TD read and write goes to a *shadow*
//! copy of the table, and action selection keeps reading the *stable* table.
//! The policy therefore behaves as if nothing had been learned until the
//! shadow is published, either by [`DelayedTable::catch_up`] (publish, keep
//! delaying) or by turning delayed learning off.
//!
//! Note that bootstrapping reads the shadow as well, so targets computed
//! during a delay window already see earlier updates from the same window.
//!
//! Enabling an active delay or disabling an inactive one is a logged no-op,
//! and [`DelayedTable::catch_up`] outside a delay is an error.
//!
//! States first seen during a delay window are materialized as zero rows in
//! the stable table too, so action selection always has a row to read. No
//! readable value changes, but `policy_values` for such a state turns from
//! `None` into `Some` of zeros before the next catch-up.

use std::hash::Hash;

use tracing::{debug, warn};

use super::q_table::QTable;
use crate::{
    error::{Error, Result},
    ports::ValueAccess,
    value::ActionValue,
};

/// Stable table plus an optional shadow receiving updates.
#[derive(Debug, Clone)]
pub struct DelayedTable<S, V = f64> {
    stable: QTable<S, V>,
    shadow: Option<QTable<S, V>>,
}

impl<S, V> DelayedTable<S, V>
where
    S: Clone + Eq + Hash,
    V: ActionValue,
{
    pub fn new(stable: QTable<S, V>) -> Self {
        Self {
            stable,
            shadow: None,
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.shadow.is_some()
    }

    /// Turn delayed learning on or off.
    ///
    /// Turning it on deep-copies the stable table into the shadow. Turning it
    /// off promotes the shadow to be the new stable table. Requesting the
    /// mode that is already active does nothing.
    pub fn set_delayed_learning(&mut self, enabled: bool) {
        match (enabled, self.shadow.take()) {
            (true, None) => {
                debug!(states = self.stable.len(), "delayed learning enabled");
                self.shadow = Some(self.stable.clone());
            }
            (false, Some(shadow)) => {
                debug!(states = shadow.len(), "delayed learning disabled, shadow promoted");
                self.stable = shadow;
            }
            (enabled, shadow) => {
                warn!(enabled = enabled, "delayed learning already in requested mode");
                self.shadow = shadow;
            }
        }
    }

    /// Publish the shadow to the stable table while staying in delayed mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelayedLearningInactive`] when delayed learning is off.
    pub fn catch_up(&mut self) -> Result<()> {
        let shadow = self.shadow.as_ref().ok_or(Error::DelayedLearningInactive)?;
        self.stable = shadow.clone();
        debug!(states = self.stable.len(), "caught up with delayed updates");
        Ok(())
    }

    /// Table read by the policy.
    pub fn stable(&self) -> &QTable<S, V> {
        &self.stable
    }

    pub fn shadow(&self) -> Option<&QTable<S, V>> {
        self.shadow.as_ref()
    }

    /// Values the policy acts on for `state`.
    pub fn policy_values(&self, state: &S) -> Option<&[V]> {
        self.stable.get(state)
    }

    /// Table receiving TD reads and writes.
    fn learning_mut(&mut self) -> &mut QTable<S, V> {
        match self.shadow.as_mut() {
            Some(shadow) => shadow,
            None => &mut self.stable,
        }
    }

    /// Materialize `state` in every live table.
    ///
    /// Only unseen states gain a zero vector; values already readable from
    /// the stable table are untouched.
    pub fn ensure(&mut self, state: &S) {
        self.stable.ensure(state);
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.ensure(state);
        }
    }

    /// Preset `state` in every live table.
    pub fn preset_state(&mut self, state: S, value: V, is_terminal: bool) {
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.preset_state(state.clone(), value, is_terminal);
        }
        self.stable.preset_state(state, value, is_terminal);
    }

    /// Replace both tables with an empty one, leaving delayed mode.
    pub fn reset(&mut self, table: QTable<S, V>) {
        self.stable = table;
        self.shadow = None;
    }

    pub fn into_stable(self) -> QTable<S, V> {
        self.stable
    }
}

impl<S, V> ValueAccess<S> for DelayedTable<S, V>
where
    S: Clone + Eq + Hash,
    V: ActionValue,
{
    fn value_of(&mut self, state: &S, action: Option<usize>) -> f64 {
        self.learning_mut().value_of(state, action).to_f64()
    }

    fn apply_delta(&mut self, state: &S, action: usize, delta: f64) {
        self.learning_mut()
            .apply_delta(state, action, V::from_f64(delta));
    }
}
