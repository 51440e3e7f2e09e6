//! Flowstate: a unidirectional state store
//!
//! Application state lives in a single [`Store`]. The only way to change it
//! is to commit a typed mutation, which a synchronous committer applies in
//! place. Asynchronous work goes through actions: a dispatcher receives the
//! action plus a one-shot [`Commit`] capability, does its work on the store's
//! runtime, and commits a mutation when done. Getters derive values from the
//! tree and are recomputed on every read.
//!
//! # Core Concepts
//!
//! - **State**: Any cloneable, serializable tree via the [`State`] trait
//! - **Mutations**: Synchronous, named changes applied by a [`Committer`]
//! - **Actions**: Asynchronous requests handled by a [`Dispatcher`]
//! - **Getters**: Pure derived values over the tree or a sub-tree
//! - **Routers**: [`CommitRouter`](commit::CommitRouter) and
//!   [`DispatchRouter`](dispatch::DispatchRouter) compose per-module handlers
//!   into the root ones
//!
//! # Example
//!
//! ```rust
//! use flowstate::{mutation_enum, Getter, StoreBuilder};
//! use flowstate::core::NoAction;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! struct Counter { count: i64 }
//!
//! mutation_enum! {
//!     enum CounterMutation {
//!         Increment,
//!         AddAmount(i64),
//!     }
//! }
//!
//! let store = StoreBuilder::<Counter, CounterMutation, NoAction>::new()
//!     .state(Counter::default())
//!     .commit_fn(|state, m| match m {
//!         CounterMutation::Increment => state.count += 1,
//!         CounterMutation::AddAmount(n) => state.count += n,
//!     })
//!     .build()
//!     .unwrap();
//!
//! let doubled = Getter::from_state(&store.state(), |s: &Counter| s.count * 2);
//!
//! store.commit(CounterMutation::Increment);
//! store.commit(CounterMutation::AddAmount(5));
//!
//! assert_eq!(store.read(|s| s.count), 6);
//! assert_eq!(doubled.get(), 12);
//! ```

pub mod builder;
pub mod commit;
pub mod core;
pub mod dispatch;
pub mod getters;
pub mod snapshot;
pub mod store;

// Re-export commonly used types
pub use builder::{BuildError, StoreBuilder, StoreConfig};
pub use commit::{CommitOutcome, Committer};
pub use core::{Action, Change, Mutation, State};
pub use dispatch::{Commit, Dispatcher};
pub use getters::Getter;
pub use snapshot::{Snapshot, SnapshotError};
pub use store::{Store, Subscription};
