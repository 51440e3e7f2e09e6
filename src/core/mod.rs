//! Core store types.
//!
//! This module contains the pure vocabulary of the store:
//! - State trees via the `State` trait
//! - Mutations and actions via the `Mutation` and `Action` traits
//! - Change records and the bounded change history

mod history;
mod message;
mod state;

pub use history::{Change, ChangeHistory, ChangeKind};
pub use message::{Action, Mutation, NoAction};
pub use state::State;
