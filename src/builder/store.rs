//! Builder for constructing stores.

use super::config::StoreConfig;
use super::error::BuildError;
use crate::commit::{Committer, FnCommitter};
use crate::core::{Action, Mutation, State};
use crate::dispatch::{Commit, Dispatcher, FnDispatcher};
use crate::store::{DispatchContext, RootCommitter, RootDispatcher, Store};
use std::future::Future;
use tokio::runtime::Handle;

/// Builder for constructing stores with a fluent API.
///
/// # Example
///
/// ```rust
/// use flowstate::{action_enum, mutation_enum, StoreBuilder};
/// use flowstate::dispatch::Commit;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct Counter { count: i64 }
///
/// mutation_enum! {
///     enum CounterMutation { AddAmount(i64) }
/// }
///
/// action_enum! {
///     enum CounterAction { AddLater(i64) }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = StoreBuilder::new()
///     .name("counter")
///     .state(Counter::default())
///     .commit_fn(|state: &mut Counter, m: CounterMutation| match m {
///         CounterMutation::AddAmount(n) => state.count += n,
///     })
///     .dispatch_fn(|action: CounterAction, commit: Commit<CounterMutation>| async move {
///         match action {
///             CounterAction::AddLater(n) => commit.commit(CounterMutation::AddAmount(n)),
///         }
///     })
///     .build()
///     .unwrap();
///
/// store.dispatch(CounterAction::AddLater(3)).unwrap().await.unwrap();
/// assert_eq!(store.read(|s| s.count), 3);
/// # }
/// ```
pub struct StoreBuilder<S, M, A> {
    state: Option<S>,
    committer: Option<RootCommitter<S, M>>,
    dispatcher: Option<RootDispatcher<A, M>>,
    runtime: Option<Handle>,
    config: StoreConfig,
}

impl<S: State, M: Mutation, A: Action> StoreBuilder<S, M, A> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            state: None,
            committer: None,
            dispatcher: None,
            runtime: None,
            config: StoreConfig::default(),
        }
    }

    /// Set the initial state tree (required).
    pub fn state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the root committer (required).
    pub fn committer<C>(mut self, committer: C) -> Self
    where
        C: Committer<State = S, Mutation = M>,
    {
        self.committer = Some(Box::new(committer));
        self
    }

    /// Set the root committer from a closure.
    pub fn commit_fn<F>(self, apply: F) -> Self
    where
        F: Fn(&mut S, M) + Send + Sync + 'static,
    {
        self.committer(FnCommitter::new(apply))
    }

    /// Set the root dispatcher (optional).
    pub fn dispatcher<D>(mut self, dispatcher: D) -> Self
    where
        D: Dispatcher<Action = A, Mutation = M>,
    {
        self.dispatcher = Some(Box::new(dispatcher));
        self
    }

    /// Set the root dispatcher from an async closure.
    pub fn dispatch_fn<F, Fut>(self, perform: F) -> Self
    where
        F: Fn(A, Commit<M>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.dispatcher(FnDispatcher::new(perform))
    }

    /// Runtime that dispatched work is spawned on.
    ///
    /// Defaults to the runtime current at [`build`](StoreBuilder::build).
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Build the store.
    /// Returns an error if required parts are missing or the configuration is invalid.
    pub fn build(self) -> Result<Store<S, M, A>, BuildError> {
        let state = self.state.ok_or(BuildError::MissingState)?;
        let committer = self.committer.ok_or(BuildError::MissingCommitter)?;
        self.config.validate()?;

        let dispatch = match self.dispatcher {
            Some(dispatcher) => {
                let runtime = match self.runtime {
                    Some(handle) => handle,
                    None => Handle::try_current().map_err(|_| BuildError::MissingRuntime)?,
                };
                Some(DispatchContext {
                    dispatcher,
                    runtime,
                })
            }
            None => None,
        };

        Ok(Store::from_parts(self.config, state, committer, dispatch))
    }
}

impl<S: State, M: Mutation, A: Action> Default for StoreBuilder<S, M, A> {
    fn default() -> Self {
        Self::new()
    }
}
