//! HTTP request handlers organized by functionality

pub mod creds;
pub mod service;

pub use creds::{clear_creds_handler, list_creds_handler, update_creds_handler};
pub use service::{health_handler, ping_handler};
