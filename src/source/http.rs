//! Implements the `Source` trait with a single HTTP GET.

use crate::model::Payload;
use crate::source::Source;
use crate::Result;
use anyhow::{bail, Context};
use tracing::{debug, trace};
use url::Url;

/// Fetches the payload from an HTTP(S) endpoint. No authentication, no retry, and no timeout
/// other than the client's defaults.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    url: Url,
}

impl HttpSource {
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Payload> {
        debug!("GET {}", self.url);
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        let status = response.status();
        trace!("{} responded with {status}", self.url);
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("{} responded with HTTP {status}: {body}", self.url);
        }

        response
            .json::<Payload>()
            .await
            .with_context(|| format!("Failed to parse the response from {}", self.url))
    }
}
