//! Counter store with a module committer, an async module action and getters.
//!
//! ```bash
//! RUST_LOG=flowstate=debug cargo run --example counter
//! ```

use flowstate::commit::{CommitRouter, FnCommitter};
use flowstate::dispatch::{Commit, DispatchRouter, FnDispatcher};
use flowstate::{action_enum, mutation_enum, Getter, StoreBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct CounterState {
    count: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AppState {
    counter: CounterState,
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
    }
}

action_enum! {
    enum CounterAction {
        AddSlowly(i64),
    }
}

action_enum! {
    enum AppAction {
        Counter(CounterAction),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

async fn add_slowly(action: CounterAction, commit: Commit<CounterMutation>) {
    match action {
        CounterAction::AddSlowly(amount) => {
            tokio::time::sleep(Duration::from_millis(50)).await;
            commit.commit(CounterMutation::AddAmount(amount));
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let committer = CommitRouter::new().module(
        "counter",
        |app: &mut AppState| &mut app.counter,
        |m: AppMutation| match m {
            AppMutation::Counter(inner) => Ok(inner),
        },
        FnCommitter::new(|state: &mut CounterState, m: CounterMutation| match m {
            CounterMutation::Increment => state.count += 1,
            CounterMutation::AddAmount(n) => state.count += n,
        }),
    );

    let dispatcher = DispatchRouter::new().module(
        "counter",
        |a: AppAction| match a {
            AppAction::Counter(inner) => Ok(inner),
        },
        AppMutation::Counter,
        FnDispatcher::new(add_slowly),
    );

    let store = StoreBuilder::new()
        .name("counter-demo")
        .state(AppState::default())
        .committer(committer)
        .dispatcher(dispatcher)
        .build()?;

    let count = Getter::new(&store.state().view(|app: &AppState| &app.counter), |c: &CounterState| c.count);
    let _log = store.subscribe(|change| println!("revision {}: {:?}", change.revision, change.kind));

    store.commit(AppMutation::Counter(CounterMutation::Increment));
    println!("count = {}", count.get());

    if let Some(work) = store.dispatch(AppAction::Counter(CounterAction::AddSlowly(41))) {
        work.await?;
    }
    println!("count = {}", count.get());

    let snapshot = store.snapshot();
    println!("snapshot {}", snapshot.to_json()?);

    Ok(())
}
