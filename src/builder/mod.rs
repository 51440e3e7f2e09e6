//! Builder API and configuration for stores.
//!
//! This module provides the fluent [`StoreBuilder`], the serde-backed
//! [`StoreConfig`], and macros for declaring mutation and action enums with
//! minimal boilerplate.

pub mod config;
pub mod error;
pub mod macros;
pub mod store;

pub use config::{
    StoreConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_HISTORY_CAPACITY, MAX_CHANNEL_CAPACITY,
};
pub use error::BuildError;
pub use store::StoreBuilder;
