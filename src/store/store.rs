//! The store: composition root for state, committers and dispatchers.

use super::subscription::{Observers, Subscription};
use crate::builder::StoreConfig;
use crate::commit::{CommitOutcome, Committer};
use crate::core::{Action, Change, ChangeHistory, Mutation, State};
use crate::dispatch::{Commit, DispatchOutcome, Dispatcher};
use crate::getters::{Getter, StateRef};
use crate::snapshot::{Snapshot, SnapshotError};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

pub(crate) type RootCommitter<S, M> = Box<dyn Committer<State = S, Mutation = M>>;
pub(crate) type RootDispatcher<A, M> = Box<dyn Dispatcher<Action = A, Mutation = M>>;

struct Ledger {
    revision: u64,
    history: ChangeHistory,
}

/// Changes waiting for observer delivery, in revision order.
///
/// One thread at a time drains the queue. A commit made while another
/// thread is draining waits until its change has been delivered; a commit
/// made by an observer on the draining thread is delivered after the
/// current change.
struct Outbox {
    pending: VecDeque<Change>,
    drainer: Option<ThreadId>,
    delivered: u64,
}

pub(crate) struct DispatchContext<A, M> {
    pub(crate) dispatcher: RootDispatcher<A, M>,
    pub(crate) runtime: Handle,
}

struct StoreInner<S, M, A> {
    name: String,
    state: Arc<RwLock<S>>,
    ledger: Mutex<Ledger>,
    committer: RootCommitter<S, M>,
    dispatch: Option<DispatchContext<A, M>>,
    observers: Arc<Observers<A>>,
    changes: broadcast::Sender<Change>,
    outbox: Mutex<Outbox>,
    drained: Condvar,
}

/// Single source of truth for application state.
///
/// - [`commit`](Store::commit) applies a mutation synchronously and notifies
///   observers once.
/// - [`dispatch`](Store::dispatch) hands an action to the root dispatcher,
///   whose work runs on the store's runtime and commits when it resolves.
///   Without a dispatcher it does nothing.
/// - [`state`](Store::state) and getters read the tree; nothing outside a
///   committer can write it.
///
/// Cloning a store is cheap and every clone shares the same state.
///
/// # Example
///
/// ```rust
/// use flowstate::{mutation_enum, Store};
/// use flowstate::commit::FnCommitter;
/// use flowstate::core::NoAction;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct Counter { count: i64 }
///
/// mutation_enum! {
///     enum CounterMutation {
///         Increment,
///         AddAmount(i64),
///     }
/// }
///
/// let store: Store<Counter, CounterMutation, NoAction> = Store::new(
///     Counter::default(),
///     FnCommitter::new(|state: &mut Counter, m: CounterMutation| match m {
///         CounterMutation::Increment => state.count += 1,
///         CounterMutation::AddAmount(n) => state.count += n,
///     }),
/// );
///
/// store.commit(CounterMutation::Increment);
/// store.commit(CounterMutation::AddAmount(5));
/// assert_eq!(store.read(|s| s.count), 6);
/// assert_eq!(store.revision(), 2);
/// ```
pub struct Store<S, M, A> {
    inner: Arc<StoreInner<S, M, A>>,
}

impl<S, M, A> Clone for Store<S, M, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, M: Mutation, A: Action> Store<S, M, A> {
    /// Create a store with the default configuration and no dispatcher.
    pub fn new<C>(state: S, committer: C) -> Self
    where
        C: Committer<State = S, Mutation = M>,
    {
        Self::from_parts(StoreConfig::default(), state, Box::new(committer), None)
    }

    pub(crate) fn from_parts(
        config: StoreConfig,
        state: S,
        committer: RootCommitter<S, M>,
        dispatch: Option<DispatchContext<A, M>>,
    ) -> Self {
        let (changes, _) = broadcast::channel(config.channel_capacity.max(1));
        let inner = StoreInner {
            name: config.name,
            state: Arc::new(RwLock::new(state)),
            ledger: Mutex::new(Ledger {
                revision: 0,
                history: ChangeHistory::with_capacity(config.history_capacity),
            }),
            committer,
            dispatch,
            observers: Observers::new(),
            changes,
            outbox: Mutex::new(Outbox {
                pending: VecDeque::new(),
                drainer: None,
                delivered: 0,
            }),
            drained: Condvar::new(),
        };
        debug!(
            store = %inner.name,
            dispatcher = inner.dispatch.is_some(),
            "store created"
        );
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Apply a mutation through the root committer.
    ///
    /// Synchronous: when this returns, the state reflects the mutation and
    /// every change observer has been notified exactly once. Observers see
    /// changes in revision order, also across threads. A commit made from
    /// inside an observer returns at once; its change is delivered right after
    /// the one being observed. A mutation the root committer does not handle
    /// leaves the state untouched, logs a warning and notifies nobody.
    ///
    /// Must not be called from inside [`StateRef::read`].
    pub fn commit(&self, mutation: M) -> CommitOutcome {
        self.inner.commit(mutation)
    }

    /// Hand an action to the root dispatcher.
    ///
    /// Returns immediately. The dispatcher's work is spawned on the store's
    /// runtime; its join handle is returned so callers can wait for the
    /// resulting commit. Returns `None`, without touching state or notifying
    /// anyone, when no dispatcher is configured or the dispatcher does not
    /// handle the action.
    pub fn dispatch(&self, action: A) -> Option<JoinHandle<()>> {
        let Some(context) = &self.inner.dispatch else {
            trace!(
                store = %self.inner.name,
                action = action.name(),
                "no dispatcher configured, ignoring action"
            );
            return None;
        };

        self.inner.observers.notify_action(&action);

        let name = action.name().to_string();
        match context.dispatcher.dispatch(action, self.commit_handle()) {
            DispatchOutcome::Pending(work) => {
                debug!(store = %self.inner.name, action = %name, "action dispatched");
                Some(context.runtime.spawn(work))
            }
            DispatchOutcome::Unhandled => {
                warn!(store = %self.inner.name, action = %name, "action not handled, dropping it");
                None
            }
        }
    }

    /// A commit capability bound to this store.
    ///
    /// The handle does not keep the store alive; committing after every
    /// store clone is dropped logs a warning and does nothing.
    pub fn commit_handle(&self) -> Commit<M> {
        let store = Arc::downgrade(&self.inner);
        let name = self.inner.name.clone();
        Commit::new(move |mutation: M| match store.upgrade() {
            Some(inner) => {
                inner.commit(mutation);
            }
            None => warn!(
                store = %name,
                mutation = mutation.name(),
                "store dropped before commit, dropping mutation"
            ),
        })
    }

    /// Read-only handle to the state tree.
    pub fn state(&self) -> StateRef<S> {
        StateRef::new(Arc::clone(&self.inner.state))
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.state().read(f)
    }

    /// Owned copy of the current state.
    pub fn get(&self) -> S {
        self.state().get()
    }

    /// Number of changes applied so far; 0 for the initial state.
    pub fn revision(&self) -> u64 {
        self.inner.ledger.lock().revision
    }

    /// Copy of the recent change history.
    pub fn history(&self) -> ChangeHistory {
        self.inner.ledger.lock().history.clone()
    }

    pub fn has_dispatcher(&self) -> bool {
        self.inner.dispatch.is_some()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of registered change and action observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Call `listener` after every applied change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Change) + Send + Sync + 'static,
    {
        self.inner.observers.on_change(Arc::new(listener))
    }

    /// Call `listener` with every action handed to the dispatcher, before it
    /// runs. Not called when no dispatcher is configured.
    pub fn subscribe_action<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.inner.observers.on_action(Arc::new(listener))
    }

    /// Receive every applied change on a channel.
    ///
    /// A receiver that falls more than `channel_capacity` changes behind
    /// gets [`RecvError::Lagged`](tokio::sync::broadcast::error::RecvError::Lagged).
    pub fn changes(&self) -> broadcast::Receiver<Change> {
        self.inner.changes.subscribe()
    }

    /// Call `on_change` whenever a change alters the getter's value.
    pub fn watch<T, F>(&self, getter: Getter<T>, on_change: F) -> Subscription
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let last = Mutex::new(getter.get());
        self.subscribe(move |_change: &Change| {
            let current = getter.get();
            let changed = {
                let mut last = last.lock();
                if *last == current {
                    false
                } else {
                    *last = current.clone();
                    true
                }
            };
            if changed {
                on_change(&current);
            }
        })
    }

    /// Capture the current state tree.
    pub fn snapshot(&self) -> Snapshot<S> {
        let state = self.inner.state.read();
        let revision = self.inner.ledger.lock().revision;
        Snapshot::new(revision, state.clone())
    }

    /// Replace the whole state tree with a snapshot's.
    ///
    /// Counts as one change: the revision advances and observers are
    /// notified once.
    pub fn restore(&self, snapshot: Snapshot<S>) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        let Snapshot { id, state, .. } = snapshot;

        let change = {
            let mut current = self.inner.state.write();
            *current = state;
            self.inner.record(|revision| Change::restore(revision, &id))
        };

        debug!(
            store = %self.inner.name,
            snapshot = %id,
            revision = change.revision,
            "state restored"
        );
        self.inner.deliver(change.revision);
        Ok(())
    }
}

impl<S: State, M: Mutation, A: Action> StoreInner<S, M, A> {
    fn commit(&self, mutation: M) -> CommitOutcome {
        let name = mutation.name().to_string();

        let change = {
            let mut state = self.state.write();
            match self.committer.commit(&mut state, mutation) {
                CommitOutcome::Applied => self.record(|revision| Change::commit(revision, &name)),
                CommitOutcome::Unhandled => {
                    warn!(store = %self.name, mutation = %name, "mutation not handled, dropping it");
                    return CommitOutcome::Unhandled;
                }
            }
        };

        debug!(
            store = %self.name,
            mutation = %name,
            revision = change.revision,
            "mutation committed"
        );
        self.deliver(change.revision);
        CommitOutcome::Applied
    }

    // Callers hold the state write lock, so revisions, the broadcast channel
    // and the outbox all follow apply order.
    fn record(&self, make: impl FnOnce(u64) -> Change) -> Change {
        let change = {
            let mut ledger = self.ledger.lock();
            ledger.revision += 1;
            let change = make(ledger.revision);
            ledger.history.record(change.clone());
            change
        };
        // No receivers is fine.
        let _ = self.changes.send(change.clone());
        self.outbox.lock().pending.push_back(change.clone());
        change
    }

    // Called without the state lock, after `record` queued `revision`.
    fn deliver(&self, revision: u64) {
        let current = thread::current().id();
        {
            let mut outbox = self.outbox.lock();
            loop {
                if outbox.delivered >= revision {
                    return;
                }
                match outbox.drainer {
                    None => break,
                    Some(drainer) if drainer == current => return,
                    Some(_) => self.drained.wait(&mut outbox),
                }
            }
            outbox.drainer = Some(current);
        }

        let _draining = Draining(self);
        loop {
            let next = self.outbox.lock().pending.pop_front();
            let Some(change) = next else {
                break;
            };
            self.observers.notify_change(&change);
            self.outbox.lock().delivered = change.revision;
        }
    }
}

// Releases the drainer slot even if an observer panics.
struct Draining<'a, S, M, A>(&'a StoreInner<S, M, A>);

impl<S, M, A> Drop for Draining<'_, S, M, A> {
    fn drop(&mut self) {
        self.0.outbox.lock().drainer = None;
        self.0.drained.notify_all();
    }
}

impl<S: State, M: Mutation, A: Action> fmt::Debug for Store<S, M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name)
            .field("revision", &self.revision())
            .field("dispatcher", &self.has_dispatcher())
            .finish_non_exhaustive()
    }
}
