//! Domain layer of the Parley chat client.
//!
//! Holds the data model, the collaborator traits the application layer is
//! written against, and the observable stores renderers read from.

pub mod auth;
pub mod config;
pub mod error;
pub mod notice;
pub mod session;
pub mod state;

// Re-export common error type
pub use error::{ParleyError, Result};
