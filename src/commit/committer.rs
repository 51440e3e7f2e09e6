//! Committer trait and closure adapter.

use crate::core::Mutation;
use std::fmt;
use std::marker::PhantomData;

/// Result of offering a mutation to a committer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The state was transformed.
    Applied,

    /// No committer owns this mutation; the state was left untouched.
    Unhandled,
}

impl CommitOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Applies mutations to a state slice.
///
/// The transformation happens in place on the `&mut` slice it is handed;
/// nothing else in the crate ever gets mutable access to state. A module
/// committer matching on its own mutation enum is exhaustive at compile time
/// and always returns [`CommitOutcome::Applied`].
///
/// # Example
///
/// ```rust
/// use flowstate::commit::{CommitOutcome, Committer};
/// use flowstate::core::Mutation;
///
/// #[derive(Default)]
/// struct CounterState { count: i64 }
///
/// #[derive(Debug)]
/// enum CounterMutation { Increment, AddAmount(i64) }
///
/// impl Mutation for CounterMutation {
///     fn name(&self) -> &str {
///         match self {
///             Self::Increment => "Increment",
///             Self::AddAmount(_) => "AddAmount",
///         }
///     }
/// }
///
/// struct CounterCommitter;
///
/// impl Committer for CounterCommitter {
///     type State = CounterState;
///     type Mutation = CounterMutation;
///
///     fn commit(&self, state: &mut CounterState, mutation: CounterMutation) -> CommitOutcome {
///         match mutation {
///             CounterMutation::Increment => state.count += 1,
///             CounterMutation::AddAmount(n) => state.count += n,
///         }
///         CommitOutcome::Applied
///     }
/// }
///
/// let mut state = CounterState::default();
/// CounterCommitter.commit(&mut state, CounterMutation::AddAmount(5));
/// assert_eq!(state.count, 5);
/// ```
pub trait Committer: Send + Sync + 'static {
    type State;
    type Mutation: Mutation;

    fn commit(&self, state: &mut Self::State, mutation: Self::Mutation) -> CommitOutcome;
}

impl<C: Committer + ?Sized> Committer for Box<C> {
    type State = C::State;
    type Mutation = C::Mutation;

    fn commit(&self, state: &mut Self::State, mutation: Self::Mutation) -> CommitOutcome {
        (**self).commit(state, mutation)
    }
}

/// Committer built from a closure.
///
/// The closure owns every mutation it is given, so the committer always
/// reports [`CommitOutcome::Applied`].
pub struct FnCommitter<S, M, F> {
    apply: F,
    _phantom: PhantomData<fn(&mut S, M)>,
}

impl<S, M, F> FnCommitter<S, M, F>
where
    F: Fn(&mut S, M) + Send + Sync + 'static,
{
    pub fn new(apply: F) -> Self {
        Self {
            apply,
            _phantom: PhantomData,
        }
    }
}

impl<S, M, F> fmt::Debug for FnCommitter<S, M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommitter").finish_non_exhaustive()
    }
}

impl<S, M, F> Committer for FnCommitter<S, M, F>
where
    S: 'static,
    M: Mutation,
    F: Fn(&mut S, M) + Send + Sync + 'static,
{
    type State = S;
    type Mutation = M;

    fn commit(&self, state: &mut S, mutation: M) -> CommitOutcome {
        (self.apply)(state, mutation);
        CommitOutcome::Applied
    }
}
