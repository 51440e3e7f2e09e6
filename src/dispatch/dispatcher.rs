//! Dispatcher trait and closure adapter.

use super::commit_handle::Commit;
use crate::core::{Action, Mutation};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

/// Pending work produced by a dispatcher.
pub type Dispatched = BoxFuture<'static, ()>;

/// Result of offering an action to a dispatcher.
pub enum DispatchOutcome {
    /// The action was accepted; the future performs it and commits.
    Pending(Dispatched),

    /// No dispatcher owns this action.
    Unhandled,
}

impl DispatchOutcome {
    /// Wrap a future as pending work.
    pub fn pending<F>(work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::Pending(work.boxed())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl fmt::Debug for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(_) => f.write_str("Pending"),
            Self::Unhandled => f.write_str("Unhandled"),
        }
    }
}

/// Performs the operation an action names.
///
/// `dispatch` must not block: it returns the operation as a future, and the
/// store spawns that future on its runtime. The future commits through the
/// [`Commit`] handle strictly after the operation resolves.
///
/// # Example
///
/// ```rust
/// use flowstate::dispatch::{Commit, DispatchOutcome, Dispatcher};
/// use flowstate::{action_enum, mutation_enum};
/// use std::time::Duration;
///
/// action_enum! {
///     enum CounterAction { IncrementLater }
/// }
///
/// mutation_enum! {
///     enum CounterMutation { AddAmount(i64) }
/// }
///
/// struct CounterDispatcher;
///
/// impl Dispatcher for CounterDispatcher {
///     type Action = CounterAction;
///     type Mutation = CounterMutation;
///
///     fn dispatch(&self, action: CounterAction, commit: Commit<CounterMutation>) -> DispatchOutcome {
///         match action {
///             CounterAction::IncrementLater => DispatchOutcome::pending(async move {
///                 tokio::time::sleep(Duration::from_millis(5)).await;
///                 commit.commit(CounterMutation::AddAmount(1));
///             }),
///         }
///     }
/// }
/// ```
pub trait Dispatcher: Send + Sync + 'static {
    type Action: Action;
    type Mutation: Mutation;

    fn dispatch(&self, action: Self::Action, commit: Commit<Self::Mutation>) -> DispatchOutcome;
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    type Action = D::Action;
    type Mutation = D::Mutation;

    fn dispatch(&self, action: Self::Action, commit: Commit<Self::Mutation>) -> DispatchOutcome {
        (**self).dispatch(action, commit)
    }
}

/// Dispatcher built from an async closure.
///
/// Every action is accepted; the closure's future is the pending work.
pub struct FnDispatcher<A, M, F> {
    perform: F,
    _phantom: PhantomData<fn(A, M)>,
}

impl<A, M, F, Fut> FnDispatcher<A, M, F>
where
    F: Fn(A, Commit<M>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(perform: F) -> Self {
        Self {
            perform,
            _phantom: PhantomData,
        }
    }
}

impl<A, M, F> fmt::Debug for FnDispatcher<A, M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDispatcher").finish_non_exhaustive()
    }
}

impl<A, M, F, Fut> Dispatcher for FnDispatcher<A, M, F>
where
    A: Action,
    M: Mutation,
    F: Fn(A, Commit<M>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    type Action = A;
    type Mutation = M;

    fn dispatch(&self, action: A, commit: Commit<M>) -> DispatchOutcome {
        DispatchOutcome::pending((self.perform)(action, commit))
    }
}
