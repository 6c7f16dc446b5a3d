//! Trusted-baker configuration published outside the chain.

use async_trait::async_trait;
use log::{info, warn};
use tokio::time::{sleep, Duration};

use crate::error::{Error, Result};
use crate::models::BakerConfig;

#[async_trait]
pub trait RemoteConfigProvider: Send + Sync {
    /// Ordered list of trusted bakers; the first entry is the featured one.
    async fn baker_configs(&self) -> Result<Vec<BakerConfig>>;
}

pub struct StaticRemoteConfig {
    bakers: Vec<BakerConfig>,
}

impl StaticRemoteConfig {
    pub fn new(bakers: Vec<BakerConfig>) -> Self {
        Self { bakers }
    }
}

#[async_trait]
impl RemoteConfigProvider for StaticRemoteConfig {
    async fn baker_configs(&self) -> Result<Vec<BakerConfig>> {
        Ok(self.bakers.clone())
    }
}

pub struct HttpRemoteConfig {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
    backoff: Duration,
}

impl HttpRemoteConfig {
    pub fn new(url: impl Into<String>, max_retries: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            max_retries: max_retries.max(1),
            backoff: Duration::from_secs(5),
        }
    }

    /// Wait between two attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

#[async_trait]
impl RemoteConfigProvider for HttpRemoteConfig {
    /// Transport errors, HTTP 429 and 5xx responses are retried; other error statuses fail at
    /// once.
    async fn baker_configs(&self) -> Result<Vec<BakerConfig>> {
        let mut last_failure = String::new();

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                sleep(self.backoff).await;
            }
            info!("Fetching baker configuration from {} (Attempt {})", self.url, attempt);

            let response = match self.client.get(&self.url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Baker configuration request failed: {}", e);
                    last_failure = e.to_string();
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!("Rate limit reached. Waiting before retrying...");
                last_failure = status.to_string();
                continue;
            }
            if status.is_server_error() {
                warn!("Baker configuration server answered {}", status);
                last_failure = status.to_string();
                continue;
            }

            let bakers: Vec<BakerConfig> = response.error_for_status()?.json().await?;
            info!("Fetched {} baker configurations", bakers.len());
            return Ok(bakers);
        }

        Err(Error::RemoteConfig(format!(
            "max retries reached fetching {}: {}",
            self.url, last_failure
        )))
    }
}
