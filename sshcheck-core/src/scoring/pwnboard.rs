use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{
    api::types::BoxAccessEvent,
    error::{CoreError, Result},
    orchestration::ScoreNotifier,
};

/// Posts `{ip, type: "bash"}` box-access events to a pwnboard endpoint.
#[derive(Debug, Clone)]
pub struct PwnboardNotifier {
    http: Client,
    endpoint: Url,
}

impl PwnboardNotifier {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|source| CoreError::InvalidUrl {
                url: endpoint.to_string(),
                source,
            })?;
        let http = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScoreNotifier for PwnboardNotifier {
    async fn notify(&self, host: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&BoxAccessEvent::bash(host))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::UnexpectedStatus {
                endpoint: self.endpoint.to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        debug!(target: "scan::report", host, "posted to pwnboard");
        Ok(())
    }
}
