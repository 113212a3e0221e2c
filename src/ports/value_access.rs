//! Value-access port used by the TD core.

/// Read/update capability over an action-value table.
///
/// The TD core is written against this trait only, so it works the same
/// over a plain [`QTable`](crate::td::QTable), a
/// [`DelayedTable`](crate::td::DelayedTable) or a test double.
///
/// Values cross this boundary as `f64`; implementations backed by a
/// narrower element type convert on their side.
pub trait ValueAccess<S> {
    /// Value of `action` in `state`; with `None`, the maximum over all
    /// actions of `state` (the off-policy bootstrap estimate).
    fn value_of(&mut self, state: &S, action: Option<usize>) -> f64;

    /// Add `delta` to the value of `action` in `state`.
    fn apply_delta(&mut self, state: &S, action: usize, delta: f64);
}
