use std::{fs, path::Path};

use tracing::{debug, warn};

use super::is_skippable;
use crate::{
    error::{CoreError, Result},
    types::CredentialPair,
};

/// Credentials parsed from a `user:password` list, in file order.
#[derive(Debug, Default)]
pub struct CredentialList {
    pub credentials: Vec<CredentialPair>,
    /// Lines that were skipped because they had no usable `user:password`.
    pub rejected: Vec<CoreError>,
}

/// Parse a credential list. Malformed lines, including lines that are not
/// valid UTF-8, are collected in [`CredentialList::rejected`] and never fail
/// the whole load.
pub fn parse_credentials(contents: impl AsRef<[u8]>) -> CredentialList {
    let mut list = CredentialList::default();

    let lines = contents.as_ref().split(|byte| *byte == b'\n');
    for (index, raw) in lines.enumerate() {
        let Ok(decoded) = std::str::from_utf8(raw) else {
            list.rejected
                .push(CoreError::UndecodableCredentialLine { line: index + 1 });
            continue;
        };
        let line = decoded.trim();
        if is_skippable(line) {
            continue;
        }

        // Passwords may themselves contain ':'.
        match line.split_once(':') {
            Some((user, password)) if !user.trim().is_empty() => {
                list.credentials
                    .push(CredentialPair::new(user.trim(), password));
            }
            _ => list.rejected.push(CoreError::InvalidCredentialLine {
                line: index + 1,
                content: line.to_string(),
            }),
        }
    }

    list
}

/// Read and parse the credential file at `path`, logging skipped lines.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<Vec<CredentialPair>> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|err| CoreError::io(path, err))?;

    let CredentialList {
        credentials,
        rejected,
    } = parse_credentials(&contents);

    for error in &rejected {
        warn!(path = %path.display(), %error, "skipping credential line");
    }
    debug!(
        path = %path.display(),
        loaded = credentials.len(),
        skipped = rejected.len(),
        "credential list loaded"
    );

    Ok(credentials)
}
