//! Infrastructure layer of the Parley chat client.
//!
//! Concrete implementations of the collaborator traits defined in
//! `parley-core`: the REST gateways, volatile session storage, and
//! configuration loading.

pub mod config_service;
pub mod dto;
pub mod http_auth_gateway;
pub mod http_chat_gateway;
pub mod http_client;
pub mod paths;
pub mod session_storage;

pub use config_service::ConfigService;
pub use http_auth_gateway::HttpAuthGateway;
pub use http_chat_gateway::HttpChatGateway;
pub use http_client::ApiClient;
pub use paths::ParleyPaths;
pub use session_storage::SessionStorage;
