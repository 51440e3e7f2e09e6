//! Synchronous state changes.
//!
//! A [`Committer`] applies mutations to a state slice in place. Each state
//! module has one; the root committer is usually a [`CommitRouter`] that
//! forwards every mutation to the module owning it, or a hand-written
//! committer with an exhaustive `match` over the root mutation enum.

mod committer;
mod router;

pub use committer::{CommitOutcome, Committer, FnCommitter};
pub use router::CommitRouter;
