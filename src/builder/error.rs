//! Build errors for the store builder.

use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .state(initial) before .build()")]
    MissingState,

    #[error("Root committer not specified. Call .committer(c) or .commit_fn(f)")]
    MissingCommitter,

    #[error("A dispatcher is configured but no tokio runtime is available. Call .runtime(handle) or build inside a runtime")]
    MissingRuntime,

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}
