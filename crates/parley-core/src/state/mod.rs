//! Client state that outlives a single controller instance.

pub mod repository;

pub use repository::StateRepository;
