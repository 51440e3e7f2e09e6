//! Read-only handles onto the store's state tree.

use crate::core::State;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

type Projection<S, Sub> = Arc<dyn Fn(&S) -> &Sub + Send + Sync>;

// Pins the closure to a higher-ranked signature so the returned borrow is
// tied to the argument.
fn projection<S, Sub, F>(project: F) -> Projection<S, Sub>
where
    S: 'static,
    Sub: 'static,
    F: Fn(&S) -> &Sub + Send + Sync + 'static,
{
    Arc::new(project)
}

/// Shared, read-only handle to a store's state tree.
///
/// Obtained from [`Store::state`](crate::store::Store::state). Cloning is
/// cheap; every clone observes the same tree. There is no way to write
/// through a `StateRef`.
pub struct StateRef<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> Clone for StateRef<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State> fmt::Debug for StateRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateRef").field(&*self.inner.read()).finish()
    }
}

impl<S: State> StateRef<S> {
    pub(crate) fn new(inner: Arc<RwLock<S>>) -> Self {
        Self { inner }
    }

    /// Run `f` against the current state.
    ///
    /// Uses a recursive read lock, so getters may read other getters from
    /// inside `f`. Do not call [`Store::commit`](crate::store::Store::commit)
    /// from inside `f`.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.inner.read_recursive();
        f(&guard)
    }

    /// Owned copy of the current state.
    pub fn get(&self) -> S {
        self.read(S::clone)
    }

    /// Narrow this handle to one slice of the tree.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowstate::{mutation_enum, StoreBuilder};
    /// use flowstate::core::NoAction;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    /// struct Counter { count: i64 }
    ///
    /// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    /// struct Root { counter: Counter }
    ///
    /// mutation_enum! {
    ///     enum RootMutation { Bump }
    /// }
    ///
    /// let store = StoreBuilder::<Root, RootMutation, NoAction>::new()
    ///     .state(Root::default())
    ///     .commit_fn(|state, _| state.counter.count += 1)
    ///     .build()
    ///     .unwrap();
    ///
    /// let counter = store.state().view(|root| &root.counter);
    /// store.commit(RootMutation::Bump);
    /// assert_eq!(counter.read(|c| c.count), 1);
    /// ```
    pub fn view<Sub, F>(&self, project: F) -> StateView<S, Sub>
    where
        Sub: 'static,
        F: Fn(&S) -> &Sub + Send + Sync + 'static,
    {
        StateView {
            state: self.clone(),
            project: projection(project),
        }
    }
}

/// Read-only handle onto one slice of a state tree.
///
/// Built with [`StateRef::view`]; module getters hold one of these for the
/// slice they derive from.
pub struct StateView<S, Sub> {
    state: StateRef<S>,
    project: Projection<S, Sub>,
}

impl<S, Sub> Clone for StateView<S, Sub> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<S: State, Sub: 'static> StateView<S, Sub> {
    /// Run `f` against the current slice.
    pub fn read<R>(&self, f: impl FnOnce(&Sub) -> R) -> R {
        self.state.read(|state| f((self.project)(state)))
    }

    /// Owned copy of the current slice.
    pub fn get(&self) -> Sub
    where
        Sub: Clone,
    {
        self.read(Sub::clone)
    }

    /// Narrow further into a nested slice.
    pub fn view<Inner, F>(&self, project: F) -> StateView<S, Inner>
    where
        Inner: 'static,
        F: Fn(&Sub) -> &Inner + Send + Sync + 'static,
    {
        let outer = Arc::clone(&self.project);
        StateView {
            state: self.state.clone(),
            project: projection(move |state: &S| project(outer(state))),
        }
    }

    /// The whole-tree handle this view was narrowed from.
    pub fn root(&self) -> &StateRef<S> {
        &self.state
    }
}
