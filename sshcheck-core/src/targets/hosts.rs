use std::{fmt, fs, path::Path};

use tracing::debug;

use super::is_skippable;
use crate::{
    error::{CoreError, Result},
    types::TeamNumber,
};

/// Token replaced by the team number in every host template.
pub const PLACEHOLDER: char = 'X';

/// Address pattern shared by every team, e.g. `10.X.1.5`.
///
/// Templates without a placeholder are legal and expand to the same address
/// for every team (shared infrastructure hosts).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostTemplate(String);

impl HostTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_team_invariant(&self) -> bool {
        !self.0.contains(PLACEHOLDER)
    }

    pub fn expand(&self, team: TeamNumber) -> String {
        expand(&self.0, team)
    }
}

impl fmt::Display for HostTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every placeholder in `template` with the decimal team number.
pub fn expand(template: &str, team: TeamNumber) -> String {
    template.replace(PLACEHOLDER, &team.to_string())
}

/// Parse one template per line, skipping blanks and `#` comments.
pub fn parse_host_templates(contents: &str) -> Vec<HostTemplate> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !is_skippable(line))
        .map(HostTemplate::new)
        .collect()
}

pub fn load_host_templates(path: impl AsRef<Path>) -> Result<Vec<HostTemplate>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).map_err(|err| CoreError::io(path, err))?;
    let templates = parse_host_templates(&contents);
    debug!(
        path = %path.display(),
        templates = templates.len(),
        "host templates loaded"
    );
    Ok(templates)
}
