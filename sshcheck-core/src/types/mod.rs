pub mod credential;
pub mod probe;
pub mod registry;

pub use credential::CredentialPair;
pub use probe::{ProbeResult, ProbeTask};
pub use registry::{RegistryEntry, RegistryKey};

/// One-based team identifier; each team owns an isolated network segment.
pub type TeamNumber = u32;
