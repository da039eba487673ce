//! Application layer of the Parley chat client.
//!
//! - [`ChatSessionController`]: session lifecycle (resume, switch, create,
//!   delete, send) behind a single-flight busy gate
//! - [`AuthUseCase`]: login and registration

mod auth_usecase;
mod controller;


pub use auth_usecase::AuthUseCase;
pub use controller::{ChatSessionController, SendOutcome};
