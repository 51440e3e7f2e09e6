//! Mutation and Action traits.
//!
//! Both are immutable values built by callers and consumed exactly once:
//! a mutation by a committer, an action by a dispatcher. The variant name is
//! what routers log and what the change history records.

use std::fmt::Debug;

/// Immutable description of a synchronous state change.
///
/// Usually an enum declared with [`mutation_enum!`](crate::mutation_enum).
///
/// # Example
///
/// ```rust
/// use flowstate::core::Mutation;
///
/// #[derive(Debug)]
/// enum CounterMutation {
///     Increment,
///     AddAmount(i64),
/// }
///
/// impl Mutation for CounterMutation {
///     fn name(&self) -> &str {
///         match self {
///             Self::Increment => "Increment",
///             Self::AddAmount(_) => "AddAmount",
///         }
///     }
/// }
///
/// assert_eq!(CounterMutation::AddAmount(5).name(), "AddAmount");
/// ```
pub trait Mutation: Debug + Send + 'static {
    /// Name of the variant, for logging and history.
    fn name(&self) -> &str;
}

/// Immutable description of an asynchronous operation request.
///
/// Usually an enum declared with [`action_enum!`](crate::action_enum).
pub trait Action: Debug + Send + 'static {
    /// Name of the variant, for logging.
    fn name(&self) -> &str;
}

/// Placeholder action type for stores that never dispatch.
///
/// Uninhabited, so a `Store<S, M, NoAction>` cannot be handed an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAction {}

impl Action for NoAction {
    fn name(&self) -> &str {
        match *self {}
    }
}
