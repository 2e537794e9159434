/// Route paths shared by the registry service and its clients
pub mod routes;
/// Wire payloads exchanged with the registry service
pub mod types;

pub use types::{MessageResponse, UpsertCredentials};
