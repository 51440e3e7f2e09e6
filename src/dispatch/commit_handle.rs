//! One-shot commit capability handed to dispatchers.

use crate::core::Mutation;
use std::fmt;
use std::sync::Arc;

type CommitFn<M> = Arc<dyn Fn(M) + Send + Sync>;

/// Capability to commit exactly one mutation.
///
/// A dispatcher receives one `Commit` per action and calls
/// [`commit`](Commit::commit) once its operation resolves. `commit` takes
/// `self`, so a second commit for the same action does not compile; dropping
/// the handle without committing (the operation never resolved, or failed
/// silently) commits nothing.
///
/// # Example
///
/// ```rust
/// use flowstate::dispatch::Commit;
/// use flowstate::mutation_enum;
/// use std::sync::{Arc, Mutex};
///
/// mutation_enum! {
///     enum CounterMutation { AddAmount(i64) }
/// }
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let commit = Commit::new(move |m: CounterMutation| sink.lock().unwrap().push(m));
///
/// commit.commit(CounterMutation::AddAmount(3));
/// assert_eq!(*seen.lock().unwrap(), vec![CounterMutation::AddAmount(3)]);
/// ```
pub struct Commit<M> {
    sink: CommitFn<M>,
}

impl<M: Mutation> Commit<M> {
    /// Build a capability around an arbitrary commit sink.
    ///
    /// Stores hand out capabilities bound to themselves; this constructor is
    /// for driving a dispatcher directly, as in tests.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(M) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Commit the action's resulting mutation, consuming the capability.
    pub fn commit(self, mutation: M) {
        (self.sink)(mutation);
    }

    /// Adapt to a module's own mutation type.
    pub fn map<N, F>(self, embed: F) -> Commit<N>
    where
        N: Mutation,
        F: Fn(N) -> M + Send + Sync + 'static,
    {
        let sink = self.sink;
        Commit {
            sink: Arc::new(move |mutation: N| sink(embed(mutation))),
        }
    }
}

impl<M> fmt::Debug for Commit<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit").finish_non_exhaustive()
    }
}
