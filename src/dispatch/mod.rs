//! Asynchronous operations.
//!
//! A [`Dispatcher`] turns an action into pending work. The work runs on the
//! store's runtime and, once its operation resolves, commits exactly one
//! mutation through the one-shot [`Commit`] handle it was given.
//!
//! # Key Concepts
//!
//! - **Commit handle**: consumed on use, so at most one commit per action
//! - **Routing**: [`DispatchRouter`] forwards actions to module dispatchers
//! - **No ordering**: completions of two dispatched actions may interleave

mod commit_handle;
mod dispatcher;
mod router;

pub use commit_handle::Commit;
pub use dispatcher::{DispatchOutcome, Dispatched, Dispatcher, FnDispatcher};
pub use router::DispatchRouter;
