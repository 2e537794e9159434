//! Static probe inputs: the credential list and the per-team host templates.

pub mod credentials;
pub mod hosts;

pub use credentials::{CredentialList, load_credentials, parse_credentials};
pub use hosts::{HostTemplate, PLACEHOLDER, expand, load_host_templates};

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}
