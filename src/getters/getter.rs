//! Computed read-only values derived from state.

use super::view::{StateRef, StateView};
use crate::core::State;
use std::sync::Arc;

/// A derived, read-only value over the state tree.
///
/// The value is recomputed on every [`get`](Getter::get); nothing is cached
/// and nothing is invalidated. A getter has no way to write to the state it
/// reads.
///
/// Getters compose: [`map`](Getter::map) derives from one getter,
/// [`zip`](Getter::zip) from two, and [`from_fn`](Getter::from_fn) from any
/// number of captured getters.
///
/// # Example
///
/// ```rust
/// use flowstate::getters::Getter;
///
/// let base = Getter::constant(21);
/// let doubled = base.map(|n| n * 2);
/// let label = doubled.map(|n| format!("answer: {n}"));
///
/// assert_eq!(label.get(), "answer: 42");
/// ```
pub struct Getter<T> {
    compute: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<T: 'static> Getter<T> {
    /// Derive a value from one slice of the tree.
    pub fn new<S, Sub, F>(view: &StateView<S, Sub>, compute: F) -> Self
    where
        S: State,
        Sub: 'static,
        F: Fn(&Sub) -> T + Send + Sync + 'static,
    {
        let view = view.clone();
        Self::from_fn(move || view.read(|sub| compute(sub)))
    }

    /// Derive a value from the whole tree.
    pub fn from_state<S, F>(state: &StateRef<S>, compute: F) -> Self
    where
        S: State,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let state = state.clone();
        Self::from_fn(move || state.read(|s| compute(s)))
    }

    /// Wrap an arbitrary computation, typically one reading other getters.
    pub fn from_fn<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            compute: Arc::new(compute),
        }
    }

    /// A getter that always yields `value`.
    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Self::from_fn(move || value.clone())
    }

    /// Compute the current value.
    pub fn get(&self) -> T {
        (self.compute)()
    }

    /// Derive a new getter from this one's value.
    pub fn map<U, F>(&self, f: F) -> Getter<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        Getter::from_fn(move || f(source.get()))
    }

    /// Pair this getter with another.
    pub fn zip<U: 'static>(&self, other: &Getter<U>) -> Getter<(T, U)> {
        let left = self.clone();
        let right = other.clone();
        Getter::from_fn(move || (left.get(), right.get()))
    }
}
