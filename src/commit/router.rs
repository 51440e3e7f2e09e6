//! Root committer that routes mutations to module committers.

use super::committer::{CommitOutcome, Committer};
use crate::core::Mutation;
use tracing::{debug, trace};

type RouteFn<S, M> = Box<dyn Fn(&mut S, M) -> Result<CommitOutcome, M> + Send + Sync>;

struct CommitRoute<S, M> {
    module: String,
    apply: RouteFn<S, M>,
}

/// Routes each mutation to the module committer that owns it.
///
/// Routes are tried in registration order. A route claims a mutation when
/// its extractor returns `Ok`; the module committer then receives the
/// sub-mutation together with the slice its lens selects. A mutation no
/// route claims is reported as unhandled and the state is left untouched;
/// the store logs it at `warn`.
///
/// # Example
///
/// ```rust
/// use flowstate::commit::{CommitOutcome, CommitRouter, Committer, FnCommitter};
/// use flowstate::mutation_enum;
///
/// #[derive(Default)]
/// struct Root { count: i64, title: String }
///
/// mutation_enum! {
///     enum CounterMutation { Increment }
/// }
///
/// mutation_enum! {
///     enum RootMutation {
///         Counter(CounterMutation),
///         Rename(String),
///     }
/// }
///
/// let router = CommitRouter::new().module(
///     "counter",
///     |root: &mut Root| &mut root.count,
///     |m: RootMutation| match m {
///         RootMutation::Counter(inner) => Ok(inner),
///         other => Err(other),
///     },
///     FnCommitter::new(|count: &mut i64, _: CounterMutation| *count += 1),
/// );
///
/// let mut root = Root::default();
/// assert_eq!(router.commit(&mut root, RootMutation::Counter(CounterMutation::Increment)), CommitOutcome::Applied);
/// assert_eq!(router.commit(&mut root, RootMutation::Rename("x".into())), CommitOutcome::Unhandled);
/// assert_eq!(root.count, 1);
/// assert_eq!(root.title, "");
/// ```
pub struct CommitRouter<S, M> {
    routes: Vec<CommitRoute<S, M>>,
}

impl<S: 'static, M: Mutation> CommitRouter<S, M> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a module committer.
    ///
    /// - `lens` selects the slice of the root state the module owns
    /// - `extract` claims the module's mutations, handing back the rest
    pub fn module<Sub, C, L, E>(mut self, name: &str, lens: L, extract: E, committer: C) -> Self
    where
        Sub: 'static,
        C: Committer<State = Sub>,
        L: Fn(&mut S) -> &mut Sub + Send + Sync + 'static,
        E: Fn(M) -> Result<C::Mutation, M> + Send + Sync + 'static,
    {
        let apply = move |state: &mut S, mutation: M| -> Result<CommitOutcome, M> {
            let claimed = extract(mutation)?;
            Ok(committer.commit(lens(state), claimed))
        };
        self.routes.push(CommitRoute {
            module: name.to_string(),
            apply: Box::new(apply),
        });
        self
    }

    /// Registered module names, in routing order.
    pub fn modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.routes.iter().map(|route| route.module.as_str())
    }
}

impl<S: 'static, M: Mutation> Default for CommitRouter<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, M: Mutation> Committer for CommitRouter<S, M> {
    type State = S;
    type Mutation = M;

    fn commit(&self, state: &mut S, mutation: M) -> CommitOutcome {
        let mut unclaimed = mutation;
        for route in &self.routes {
            match (route.apply)(state, unclaimed) {
                Ok(outcome) => {
                    trace!(module = %route.module, ?outcome, "mutation routed");
                    return outcome;
                }
                Err(rest) => unclaimed = rest,
            }
        }

        debug!(
            mutation = unclaimed.name(),
            "no committer registered for mutation"
        );
        CommitOutcome::Unhandled
    }
}
