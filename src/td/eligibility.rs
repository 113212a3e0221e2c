//! Eligibility traces for TD(λ).
//!
//! A trace is a decaying credit weight per visited (state, action) pair.
//! Visiting a pair *replaces* its weight with 1 rather than adding to it, so
//! a weight never exceeds 1 no matter how often a pair is revisited within
//! an episode. After every update each weight is multiplied by λ.
//!
//! Traces only live for one episode; the TD core clears them at both
//! episode boundaries.

use std::{collections::HashMap, hash::Hash};

/// Sparse (state, action) -> weight storage.
#[derive(Debug, Clone)]
pub struct EligibilityTraces<S> {
    traces: HashMap<(S, usize), f64>,
}

impl<S> Default for EligibilityTraces<S> {
    fn default() -> Self {
        Self {
            traces: HashMap::new(),
        }
    }
}

impl<S> EligibilityTraces<S>
where
    S: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `(state, action)` full credit, overwriting any decayed weight.
    #[inline]
    pub fn mark(&mut self, state: &S, action: usize) {
        self.traces.insert((state.clone(), action), 1.0);
    }

    /// Current weight; 0.0 for pairs not visited this episode.
    #[inline]
    pub fn weight(&self, state: &S, action: usize) -> f64 {
        self.traces
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Hand `delta * weight` to `apply` for every traced pair, then decay
    /// every weight by `lambda`.
    ///
    /// The key set is snapshotted first so `apply` sees each pair exactly
    /// once, independent of map iteration order.
    pub fn propagate<F>(&mut self, delta: f64, lambda: f64, mut apply: F)
    where
        F: FnMut(&S, usize, f64),
    {
        let keys: Vec<(S, usize)> = self.traces.keys().cloned().collect();
        for key in keys {
            if let Some(weight) = self.traces.get_mut(&key) {
                apply(&key.0, key.1, delta * *weight);
                *weight *= lambda;
            }
        }
    }

    pub fn clear(&mut self) {
        self.traces.clear();
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, usize, f64)> {
        self.traces
            .iter()
            .map(|((state, action), &weight)| (state, *action, weight))
    }
}
