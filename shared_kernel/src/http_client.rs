use std::time::Duration;

use anyhow::Context;
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use url::Url;

/// Thin wrapper over a traced `reqwest` client with a fixed request timeout.
///
/// Requests are attempted once. Callers decide what a failed attempt means.
#[derive(Clone)]
pub struct HttpClient {
    client: ClientWithMiddleware,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;
        let client = ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build();
        Ok(Self { client })
    }

    pub async fn get(&self, url: Url) -> reqwest_middleware::Result<Response> {
        self.client.get(url).send().await
    }
}
