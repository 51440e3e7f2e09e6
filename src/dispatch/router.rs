//! Root dispatcher that routes actions to module dispatchers.

use super::commit_handle::Commit;
use super::dispatcher::{DispatchOutcome, Dispatcher};
use crate::core::{Action, Mutation};
use std::sync::Arc;
use tracing::{debug, trace};

type RouteFn<A, M> =
    Box<dyn Fn(A, Commit<M>) -> Result<DispatchOutcome, (A, Commit<M>)> + Send + Sync>;

struct DispatchRoute<A, M> {
    module: String,
    apply: RouteFn<A, M>,
}

/// Routes each action to the module dispatcher that owns it.
///
/// A route claims an action when its extractor returns `Ok`. The module
/// dispatcher gets the sub-action and a commit handle that embeds its
/// module mutation back into the root mutation type. An action no route
/// claims is reported as unhandled; the store logs it at `warn` and drops it.
pub struct DispatchRouter<A, M> {
    routes: Vec<DispatchRoute<A, M>>,
}

impl<A: Action, M: Mutation> DispatchRouter<A, M> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a module dispatcher.
    ///
    /// - `extract` claims the module's actions, handing back the rest
    /// - `embed` lifts the module's mutation into the root mutation
    pub fn module<D, E, I>(mut self, name: &str, extract: E, embed: I, dispatcher: D) -> Self
    where
        D: Dispatcher,
        E: Fn(A) -> Result<D::Action, A> + Send + Sync + 'static,
        I: Fn(D::Mutation) -> M + Send + Sync + 'static,
    {
        let embed = Arc::new(embed);
        let apply = move |action: A,
                          commit: Commit<M>|
              -> Result<DispatchOutcome, (A, Commit<M>)> {
            match extract(action) {
                Ok(claimed) => {
                    let embed = Arc::clone(&embed);
                    Ok(dispatcher.dispatch(claimed, commit.map(move |m: D::Mutation| embed(m))))
                }
                Err(rest) => Err((rest, commit)),
            }
        };
        self.routes.push(DispatchRoute {
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

impl<A: Action, M: Mutation> Default for DispatchRouter<A, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action, M: Mutation> Dispatcher for DispatchRouter<A, M> {
    type Action = A;
    type Mutation = M;

    fn dispatch(&self, action: A, commit: Commit<M>) -> DispatchOutcome {
        let mut unclaimed = (action, commit);
        for route in &self.routes {
            let (action, commit) = unclaimed;
            match (route.apply)(action, commit) {
                Ok(outcome) => {
                    trace!(module = %route.module, ?outcome, "action routed");
                    return outcome;
                }
                Err(rest) => unclaimed = rest,
            }
        }

        debug!(
            action = unclaimed.0.name(),
            "no dispatcher registered for action"
        );
        DispatchOutcome::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::FnDispatcher;
    use std::sync::Mutex;

    #[derive(Debug)]
    enum CounterAction {
        IncrementLater,
    }

    impl Action for CounterAction {
        fn name(&self) -> &str {
            "IncrementLater"
        }
    }

    #[derive(Debug)]
    enum RootAction {
        Counter(CounterAction),
        Logout,
    }

    impl Action for RootAction {
        fn name(&self) -> &str {
            match self {
                Self::Counter(inner) => inner.name(),
                Self::Logout => "Logout",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CounterMutation {
        AddAmount(i64),
    }

    impl Mutation for CounterMutation {
        fn name(&self) -> &str {
            "AddAmount"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum RootMutation {
        Counter(CounterMutation),
    }

    impl Mutation for RootMutation {
        fn name(&self) -> &str {
            match self {
                Self::Counter(inner) => inner.name(),
            }
        }
    }

    fn router() -> DispatchRouter<RootAction, RootMutation> {
        DispatchRouter::new().module(
            "counter",
            |a: RootAction| match a {
                RootAction::Counter(inner) => Ok(inner),
                other => Err(other),
            },
            RootMutation::Counter,
            FnDispatcher::new(
                |_: CounterAction, commit: Commit<CounterMutation>| async move {
                    tokio::task::yield_now().await;
                    commit.commit(CounterMutation::AddAmount(1));
                },
            ),
        )
    }

    fn recording() -> (Arc<Mutex<Vec<RootMutation>>>, Commit<RootMutation>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let commit = Commit::new(move |m: RootMutation| sink.lock().unwrap().push(m));
        (seen, commit)
    }

    #[tokio::test]
    async fn routes_and_embeds_module_mutation() {
        let (seen, commit) = recording();

        let outcome = router().dispatch(RootAction::Counter(CounterAction::IncrementLater), commit);
        let DispatchOutcome::Pending(work) = outcome else {
            panic!("Expected Pending outcome");
        };
        work.await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![RootMutation::Counter(CounterMutation::AddAmount(1))]
        );
    }

    #[test]
    fn unmatched_action_is_dropped() {
        let (seen, commit) = recording();

        let outcome = router().dispatch(RootAction::Logout, commit);

        assert!(matches!(outcome, DispatchOutcome::Unhandled));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn modules_listed_in_registration_order() {
        let router = router();
        let names: Vec<&str> = router.modules().collect();
        assert_eq!(names, vec!["counter"]);
    }
}
