//! Core State trait for store state trees.
//!
//! A state tree is plain application data: one root struct whose fields are
//! the states of its submodules. The store is the single owner of the tree
//! and only committers ever receive it mutably.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for store state trees.
///
/// Implemented automatically for every type meeting the bounds, so a state
/// tree only needs the usual derives.
///
/// # Required Traits
///
/// - `Clone`: Readers can take owned copies with [`StateRef::get`](crate::getters::StateRef::get)
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for snapshots
/// - `Send` + `Sync`: The tree is shared with dispatch tasks and getters
///
/// # Example
///
/// ```rust
/// use flowstate::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct CounterState {
///     count: i64,
/// }
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// struct RootState {
///     counter: CounterState,
/// }
///
/// fn assert_state<S: State>() {}
/// assert_state::<RootState>();
/// ```
pub trait State:
    Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> State for T where T: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {}
