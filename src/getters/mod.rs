//! Read-only derived views over the state tree.
//!
//! - [`StateRef`]: the whole tree, read-only
//! - [`StateView`]: one slice of the tree, read-only
//! - [`Getter`]: a computed value, recomputed on every read
//!
//! Application getter objects are plain structs holding views and other
//! getters, assembled once after the store is built:
//!
//! ```rust
//! use flowstate::getters::{Getter, StateView};
//! # use flowstate::{mutation_enum, StoreBuilder};
//! # use flowstate::core::NoAction;
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! # struct Counter { count: i64 }
//! # #[derive(Clone, Debug, Default, Serialize, Deserialize)]
//! # struct Root { counter: Counter }
//! # mutation_enum! { enum RootMutation { Bump } }
//!
//! struct CounterGetters {
//!     counter: StateView<Root, Counter>,
//! }
//!
//! impl CounterGetters {
//!     fn formatted(&self) -> Getter<String> {
//!         Getter::new(&self.counter, |c: &Counter| format!("#{}", c.count))
//!     }
//! }
//!
//! # let store = StoreBuilder::<Root, RootMutation, NoAction>::new()
//! #     .state(Root::default())
//! #     .commit_fn(|s, _| s.counter.count += 1)
//! #     .build()
//! #     .unwrap();
//! let getters = CounterGetters { counter: store.state().view(|r| &r.counter) };
//! let formatted = getters.formatted();
//! store.commit(RootMutation::Bump);
//! assert_eq!(formatted.get(), "#1");
//! ```

mod getter;
mod view;

pub use getter::Getter;
pub use view::{StateRef, StateView};
