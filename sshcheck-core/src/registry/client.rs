use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::{
    api::{MessageResponse, UpsertCredentials, routes},
    error::{CoreError, Result},
    orchestration::RegistryPort,
    types::RegistryEntry,
};

/// HTTP client for a remote registry service.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: Url,
}

impl RegistryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|source| CoreError::InvalidUrl {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        // Keep any path prefix on the base URL (e.g. a reverse-proxy mount).
        let joined = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            route
        );
        Url::parse(&joined).map_err(|source| CoreError::InvalidUrl {
            url: joined,
            source,
        })
    }

    pub async fn upsert(
        &self,
        update: &UpsertCredentials,
    ) -> Result<MessageResponse> {
        let url = self.endpoint(routes::creds::UPDATE)?;
        let response = self.http.post(url).json(update).send().await?;
        let ack: MessageResponse =
            expect_success(routes::creds::UPDATE, response)
                .await?
                .json()
                .await?;
        debug!(
            target: "registry",
            team = update.team,
            host = %update.ip,
            message = %ack.message,
            "upsert acknowledged"
        );
        Ok(ack)
    }

    pub async fn prune(&self) -> Result<MessageResponse> {
        let url = self.endpoint(routes::creds::CLEAR)?;
        let response = self.http.post(url).send().await?;
        let ack: MessageResponse = expect_success(routes::creds::CLEAR, response)
            .await?
            .json()
            .await?;
        debug!(target: "registry", message = %ack.message, "prune acknowledged");
        Ok(ack)
    }

    pub async fn list(&self) -> Result<Vec<RegistryEntry>> {
        let url = self.endpoint(routes::creds::LIST)?;
        let response = self.http.get(url).send().await?;
        Ok(expect_success(routes::creds::LIST, response)
            .await?
            .json()
            .await?)
    }
}

async fn expect_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CoreError::UnexpectedStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RegistryPort for RegistryClient {
    async fn upsert(&self, update: &UpsertCredentials) -> Result<()> {
        RegistryClient::upsert(self, update).await.map(|_| ())
    }

    async fn prune(&self) -> Result<()> {
        RegistryClient::prune(self).await.map(|_| ())
    }
}
