//! The store and its observers.
//!
//! The [`Store`] owns the state tree, the root committer and the optional
//! root dispatcher. Observers hear about every applied change through a
//! callback ([`Store::subscribe`]), a broadcast channel ([`Store::changes`])
//! or a getter watch ([`Store::watch`]).

mod store;
mod subscription;

pub(crate) use store::{DispatchContext, RootCommitter, RootDispatcher};
pub use store::Store;
pub use subscription::Subscription;
