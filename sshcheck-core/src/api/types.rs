use serde::{Deserialize, Serialize};

use crate::types::{CredentialPair, TeamNumber};

/// Body of `POST /api/update_creds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertCredentials {
    pub team: TeamNumber,
    pub ip: String,
    pub user: String,
    pub password: String,
}

impl UpsertCredentials {
    pub fn new(
        team: TeamNumber,
        ip: impl Into<String>,
        credential: &CredentialPair,
    ) -> Self {
        Self {
            team,
            ip: ip.into(),
            user: credential.username.clone(),
            password: credential.password.clone(),
        }
    }
}

/// Plain acknowledgement returned by the mutating registry endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of the scoring callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxAccessEvent {
    pub ip: String,
    #[serde(rename = "type")]
    pub access_type: String,
}

impl BoxAccessEvent {
    pub fn bash(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            access_type: "bash".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upsert_body_uses_wire_field_names() {
        let credential = CredentialPair::new("root", "toor");
        let body = UpsertCredentials::new(3, "10.3.1.1", &credential);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"team": 3, "ip": "10.3.1.1", "user": "root", "password": "toor"})
        );
    }

    #[test]
    fn box_access_event_serializes_type_key() {
        let value = serde_json::to_value(BoxAccessEvent::bash("10.1.1.5")).unwrap();
        assert_eq!(value, json!({"ip": "10.1.1.5", "type": "bash"}));
    }
}
