//! Sparse action-value table for temporal difference learning

use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::Hash,
};

use serde::{Deserialize, Serialize};

use crate::{ports::ValueAccess, value::ActionValue};

/// Q-table mapping each state to a vector of per-action values.
///
/// Every stored vector has exactly `n_actions` entries. States are
/// materialized lazily: the first learning-path read or write of an unseen
/// state inserts a zero vector. [`QTable::get`] is the non-materializing
/// read used for introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + Hash, V: Serialize",
    deserialize = "S: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"
))]
pub struct QTable<S, V = f64> {
    n_actions: usize,
    values: HashMap<S, Vec<V>>,
    /// States pinned as terminal through a preset
    terminals: HashSet<S>,
}

impl<S, V> QTable<S, V>
where
    S: Clone + Eq + Hash,
    V: ActionValue,
{
    /// Create an empty table for `n_actions` actions per state.
    pub fn new(n_actions: usize) -> Self {
        Self::with_capacity(n_actions, 0)
    }

    pub fn with_capacity(n_actions: usize, n_states: usize) -> Self {
        Self {
            n_actions,
            values: HashMap::with_capacity(n_states),
            terminals: HashSet::new(),
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Materialize `state` with a zero vector if it has never been seen.
    pub fn ensure(&mut self, state: &S) -> &mut Vec<V> {
        let n_actions = self.n_actions;
        self.values
            .entry(state.clone())
            .or_insert_with(|| vec![V::ZERO; n_actions])
    }

    /// Value of `action` in `state`, or the state's maximum when `action` is `None`.
    pub fn value_of(&mut self, state: &S, action: Option<usize>) -> V {
        let row = self.ensure(state);
        match action {
            Some(action) => row[action],
            None => max_value(row),
        }
    }

    /// Add `delta` to the value of `action` in `state`.
    pub fn apply_delta(&mut self, state: &S, action: usize, delta: V) {
        self.ensure(state)[action] += delta;
    }

    /// Fill the whole vector of `state` with `value`.
    ///
    /// Terminal presets are remembered for diagnostics only; nothing in the
    /// update rule treats them specially.
    pub fn preset_state(&mut self, state: S, value: V, is_terminal: bool) {
        if is_terminal {
            self.terminals.insert(state.clone());
        } else {
            self.terminals.remove(&state);
        }
        self.values.insert(state, vec![value; self.n_actions]);
    }

    pub fn is_terminal(&self, state: &S) -> bool {
        self.terminals.contains(state)
    }

    /// Stored vector for `state`, without materializing it.
    pub fn get(&self, state: &S) -> Option<&[V]> {
        self.values.get(state).map(Vec::as_slice)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.values.contains_key(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.values.keys()
    }

    /// Number of materialized states
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every stored state (and terminal marker).
    pub fn clear(&mut self) {
        self.values.clear();
        self.terminals.clear();
    }
}

/// Largest entry of a non-empty row.
pub(crate) fn max_value<V: ActionValue>(row: &[V]) -> V {
    assert!(!row.is_empty(), "action-value vector must not be empty");
    row.iter()
        .copied()
        .fold(row[0], |best, v| if v > best { v } else { best })
}

impl<S, V> ValueAccess<S> for QTable<S, V>
where
    S: Clone + Eq + Hash,
    V: ActionValue,
{
    fn value_of(&mut self, state: &S, action: Option<usize>) -> f64 {
        QTable::value_of(self, state, action).to_f64()
    }

    fn apply_delta(&mut self, state: &S, action: usize, delta: f64) {
        QTable::apply_delta(self, state, action, V::from_f64(delta));
    }
}

impl<S, V> fmt::Display for QTable<S, V>
where
    S: fmt::Display,
    V: ActionValue,
{
    /// One `state<TAB>v0  v1  ...` line per state, ordered by the state's text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<(String, &Vec<V>)> = self
            .values
            .iter()
            .map(|(state, row)| (state.to_string(), row))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (state, row) in rows {
            write!(f, "{state}\t")?;
            for value in row {
                write!(f, "{}  ", value.to_f64())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
