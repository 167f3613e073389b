//! Page retrieval for the extractor

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::extractor::config::ExtractorConfig;
use crate::extractor::error::{ExtractError, FetchError};

/// Performs the single GET request issued per URL
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Build a fetcher from the extractor configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ExtractError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Fetch `url` and return the decoded response body
    ///
    /// Redirects are followed by the client. Anything other than a 2xx final
    /// status is an error; there are no retries.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        debug!("{} responded with {}", url, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(err)
        }
    }
}
