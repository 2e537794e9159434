//! Scoring-service callbacks fired for every confirmed credential.

pub mod pwnboard;

pub use pwnboard::PwnboardNotifier;
