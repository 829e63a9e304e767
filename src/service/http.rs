//! HTTP download of bundled libraries

use super::LibraryFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct HttpLibraryFetcher {
    client: Client,
}

impl HttpLibraryFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("extwizard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LibraryFetcher for HttpLibraryFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{} answered {}", url, status);
        }

        response
            .text()
            .await
            .with_context(|| format!("failed to read body from {}", url))
    }
}
