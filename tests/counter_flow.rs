//! End-to-end flow through a modular store: root and module mutations,
//! an async module action, module getters, observers and snapshots.

use flowstate::commit::{CommitRouter, FnCommitter};
use flowstate::core::ChangeKind;
use flowstate::dispatch::{Commit, DispatchRouter, FnDispatcher};
use flowstate::getters::StateView;
use flowstate::{action_enum, mutation_enum, Committer, Getter, Store, StoreBuilder};
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
struct CounterState {
    count: i64,
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
struct AppState {
    counter: CounterState,
    title: String,
}

mutation_enum! {
    enum CounterMutation {
        Increment,
        AddAmount(i64),
    }
}

mutation_enum! {
    enum AppMutation {
        Counter(CounterMutation),
        Rename(String),
    }
}

action_enum! {
    enum CounterAction {
        IncrementRandom,
    }
}

action_enum! {
    enum AppAction {
        Counter(CounterAction),
        Refresh,
    }
}

type AppStore = Store<AppState, AppMutation, AppAction>;

/// Every mutation the counter module applied, in order.
type Journal = Arc<Mutex<Vec<CounterMutation>>>;

fn counter_committer(journal: Journal) -> impl Committer<State = CounterState, Mutation = CounterMutation> {
    FnCommitter::new(move |state: &mut CounterState, mutation: CounterMutation| {
        journal.lock().push(mutation.clone());
        match mutation {
            CounterMutation::Increment => state.count += 1,
            CounterMutation::AddAmount(n) => state.count += n,
        }
    })
}

async fn increment_random(action: CounterAction, commit: Commit<CounterMutation>) {
    match action {
        CounterAction::IncrementRandom => {
            let amount = rand::thread_rng().gen_range(1..100);
            tokio::task::yield_now().await;
            commit.commit(CounterMutation::AddAmount(amount));
        }
    }
}

fn root_committer(journal: Journal) -> CommitRouter<AppState, AppMutation> {
    CommitRouter::new()
        .module(
            "counter",
            |app: &mut AppState| &mut app.counter,
            |m: AppMutation| match m {
                AppMutation::Counter(inner) => Ok(inner),
                other => Err(other),
            },
            counter_committer(journal),
        )
        .module(
            "title",
            |app: &mut AppState| &mut app.title,
            |m: AppMutation| match m {
                AppMutation::Rename(title) => Ok(TitleMutation(title)),
                other => Err(other),
            },
            FnCommitter::new(|title: &mut String, new_title: TitleMutation| {
                *title = new_title.0;
            }),
        )
}

// The title module's only mutation carries the new title.
#[derive(Debug)]
struct TitleMutation(String);

impl flowstate::Mutation for TitleMutation {
    fn name(&self) -> &str {
        "Rename"
    }
}

// Only counter actions have a module; `Refresh` is left unrouted.
fn root_dispatcher() -> DispatchRouter<AppAction, AppMutation> {
    DispatchRouter::new().module(
        "counter",
        |a: AppAction| match a {
            AppAction::Counter(inner) => Ok(inner),
            other => Err(other),
        },
        AppMutation::Counter,
        FnDispatcher::new(increment_random),
    )
}

struct CounterGetters {
    count: Getter<i64>,
    is_even: Getter<bool>,
}

impl CounterGetters {
    fn new(view: &StateView<AppState, CounterState>) -> Self {
        let count = Getter::new(view, |c: &CounterState| c.count);
        let is_even = count.map(|n| n % 2 == 0);
        Self { count, is_even }
    }
}

fn store_without_dispatcher(state: AppState) -> (AppStore, Journal) {
    let journal = Journal::default();
    let store = StoreBuilder::new()
        .name("app")
        .state(state)
        .committer(root_committer(Arc::clone(&journal)))
        .build()
        .unwrap();
    (store, journal)
}

fn store_with_dispatcher(state: AppState) -> (AppStore, Journal) {
    let journal = Journal::default();
    let store = StoreBuilder::new()
        .name("app")
        .state(state)
        .committer(root_committer(Arc::clone(&journal)))
        .dispatcher(root_dispatcher())
        .build()
        .unwrap();
    (store, journal)
}

fn record_changes(store: &AppStore) -> (Arc<Mutex<Vec<String>>>, flowstate::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |change| {
        if let ChangeKind::Commit { mutation } = &change.kind {
            sink.lock().push(mutation.clone());
        }
    });
    (seen, subscription)
}

#[tokio::test]
async fn counter_scenario_end_to_end() {
    let (plain, plain_journal) = store_without_dispatcher(AppState::default());
    let getters = CounterGetters::new(&plain.state().view(|app: &AppState| &app.counter));
    let (seen, _subscription) = record_changes(&plain);
    assert_eq!(getters.count.get(), 0);

    plain.commit(AppMutation::Counter(CounterMutation::Increment));
    assert_eq!(getters.count.get(), 1);
    assert_eq!(seen.lock().len(), 1);

    plain.commit(AppMutation::Counter(CounterMutation::AddAmount(5)));
    assert_eq!(getters.count.get(), 6);
    assert_eq!(seen.lock().len(), 2);

    let handle = plain.dispatch(AppAction::Counter(CounterAction::IncrementRandom));
    assert!(handle.is_none());
    assert_eq!(getters.count.get(), 6);
    assert_eq!(seen.lock().len(), 2);
    assert_eq!(
        *plain_journal.lock(),
        vec![CounterMutation::Increment, CounterMutation::AddAmount(5)]
    );

    let (dispatching, journal) = store_with_dispatcher(plain.get());
    let getters = CounterGetters::new(&dispatching.state().view(|app: &AppState| &app.counter));
    let (seen, _subscription) = record_changes(&dispatching);

    dispatching
        .dispatch(AppAction::Counter(CounterAction::IncrementRandom))
        .unwrap()
        .await
        .unwrap();

    let applied = journal.lock().clone();
    let [CounterMutation::AddAmount(n)] = applied.as_slice() else {
        panic!("Expected exactly one AddAmount, got {applied:?}");
    };
    assert!((1..100).contains(n), "unexpected increment {n}");
    assert_eq!(getters.count.get(), 6 + n);
    assert_eq!(*seen.lock(), vec!["Counter"]);
}

#[test]
fn module_mutations_update_their_slice() {
    let (store, _journal) = store_without_dispatcher(AppState::default());
    let getters = CounterGetters::new(&store.state().view(|app: &AppState| &app.counter));
    let (seen, _subscription) = record_changes(&store);

    store.commit(AppMutation::Counter(CounterMutation::Increment));
    assert_eq!(getters.count.get(), 1);
    assert!(!getters.is_even.get());

    store.commit(AppMutation::Counter(CounterMutation::AddAmount(5)));
    assert_eq!(getters.count.get(), 6);
    assert!(getters.is_even.get());

    store.commit(AppMutation::Rename("tally".to_string()));
    assert_eq!(store.read(|app| app.title.clone()), "tally");
    assert_eq!(getters.count.get(), 6);

    assert_eq!(*seen.lock(), vec!["Counter", "Counter", "Rename"]);
    assert_eq!(store.revision(), 3);
}

#[tokio::test]
async fn module_action_commits_exactly_once() {
    let (store, journal) = store_with_dispatcher(AppState::default());
    store.commit(AppMutation::Counter(CounterMutation::Increment));
    store.commit(AppMutation::Counter(CounterMutation::AddAmount(5)));
    journal.lock().clear();

    let mut changes = store.changes();
    let actions = Arc::new(Mutex::new(Vec::new()));
    let action_sink = Arc::clone(&actions);
    let _actions_subscription = store.subscribe_action(move |action: &AppAction| {
        action_sink.lock().push(flowstate::Action::name(action).to_string());
    });

    store
        .dispatch(AppAction::Counter(CounterAction::IncrementRandom))
        .unwrap()
        .await
        .unwrap();

    let applied = journal.lock().clone();
    let [CounterMutation::AddAmount(n)] = applied.as_slice() else {
        panic!("Expected exactly one AddAmount, got {applied:?}");
    };
    assert_eq!(store.read(|app| app.counter.count), 6 + n);

    let change = changes.recv().await.unwrap();
    assert_eq!(change.revision, 3);
    assert_eq!(change.mutation(), Some("Counter"));
    assert!(changes.try_recv().is_err());

    assert_eq!(*actions.lock(), vec!["Counter"]);
    assert_eq!(store.revision(), 3);
}

#[tokio::test]
async fn unrouted_action_leaves_store_untouched() {
    let (store, journal) = store_with_dispatcher(AppState::default());
    store.commit(AppMutation::Counter(CounterMutation::AddAmount(6)));
    let (seen, _subscription) = record_changes(&store);

    let handle = store.dispatch(AppAction::Refresh);

    assert!(handle.is_none());
    assert_eq!(store.read(|app| app.counter.count), 6);
    assert_eq!(store.revision(), 1);
    assert!(seen.lock().is_empty());
    assert_eq!(journal.lock().len(), 1);
}

#[tokio::test]
async fn watchers_see_only_value_changes() {
    let (store, _journal) = store_with_dispatcher(AppState::default());
    let getters = CounterGetters::new(&store.state().view(|app: &AppState| &app.counter));
    let parity = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&parity);
    let _watch = store.watch(getters.is_even.clone(), move |even| sink.lock().push(*even));

    store.commit(AppMutation::Counter(CounterMutation::AddAmount(2)));
    store.commit(AppMutation::Rename("still even".to_string()));
    store.commit(AppMutation::Counter(CounterMutation::Increment));

    assert_eq!(*parity.lock(), vec![false]);
}

#[tokio::test]
async fn snapshot_round_trip_through_json() {
    let (store, _journal) = store_with_dispatcher(AppState::default());
    store.commit(AppMutation::Counter(CounterMutation::AddAmount(40)));
    store.commit(AppMutation::Rename("saved".to_string()));
    let saved = store.snapshot().to_json().unwrap();

    store.commit(AppMutation::Counter(CounterMutation::Increment));
    store.commit(AppMutation::Rename("changed".to_string()));

    store
        .restore(flowstate::Snapshot::from_json(&saved).unwrap())
        .unwrap();

    assert_eq!(
        store.get(),
        AppState {
            counter: CounterState { count: 40 },
            title: "saved".to_string(),
        }
    );
    assert_eq!(store.revision(), 5);
    assert!(matches!(
        store.history().last().map(|c| &c.kind),
        Some(ChangeKind::Restore { .. })
    ));
}
