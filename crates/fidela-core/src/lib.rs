//! # Fidela Core
//!
//! Shared foundation for the Fidela client-retention engine: the error type,
//! the configuration system, the domain model (clients, tasks, message log),
//! and the `Sender` trait that abstracts the outbound messaging channel.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::FidelaConfig;
pub use error::{FidelaError, Result};
pub use traits::Sender;
pub use types::{Client, LogEntry, LogOutcome, NewClient, RuleKind, Task, TaskStatus};
