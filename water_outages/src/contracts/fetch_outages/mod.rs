use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use shared_kernel::http_client::HttpClient;
use thiserror::Error as ThisError;
use url::Url;

use crate::config::OutagesSettings;
use crate::outage::Outage;

/// Why the outage list could not be retrieved.
///
/// Every variant is shown to the user as the same message; the distinction only feeds logs.
#[derive(ThisError, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: Url },
    #[error("request to {url} failed")]
    Transport {
        url: Url,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: Url, status: StatusCode },
    #[error("failed to decode the outage list from {url}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait OutageSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Outage>, FetchError>;
}

/// Retrieves the outage list from the İZSU endpoint with a single bounded attempt.
pub struct OutagesFetcher {
    client: HttpClient,
    endpoint: Url,
}

impl OutagesFetcher {
    pub fn new(settings: &OutagesSettings) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .with_context(|| format!("Invalid outages endpoint {}", settings.endpoint))?;
        let client = HttpClient::new(settings.timeout())?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl OutageSource for OutagesFetcher {
    async fn fetch(&self) -> Result<Vec<Outage>, FetchError> {
        fetch::execute(&self.client, &self.endpoint).await
    }
}

mod fetch {
    use crate::contracts::fetch_outages::FetchError;
    use crate::outage::Outage;
    use shared_kernel::http_client::HttpClient;
    use tracing::info;
    use url::Url;

    #[tracing::instrument(err, skip(client), level = "info")]
    pub(super) async fn execute(
        client: &HttpClient,
        endpoint: &Url,
    ) -> Result<Vec<Outage>, FetchError> {
        let response = client
            .get(endpoint.clone())
            .await
            .map_err(|err| transport_error(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: endpoint.clone(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(endpoint, err.into()))?;
        let outages =
            serde_json::from_slice::<Vec<Outage>>(&body).map_err(|source| FetchError::Decode {
                url: endpoint.clone(),
                source,
            })?;

        info!(count = outages.len(), "Fetched outages");
        Ok(outages)
    }

    fn transport_error(endpoint: &Url, source: reqwest_middleware::Error) -> FetchError {
        let timed_out =
            matches!(&source, reqwest_middleware::Error::Reqwest(err) if err.is_timeout());
        if timed_out {
            return FetchError::Timeout {
                url: endpoint.clone(),
            };
        }
        FetchError::Transport {
            url: endpoint.clone(),
            source,
        }
    }
}
