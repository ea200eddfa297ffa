//! Where the customer and transaction payload comes from.
//!
//! The `Source` trait is a seam so that the rest of the program does not care whether the payload
//! is fetched over HTTP or read from a local file. Use `from_endpoint` to pick an implementation
//! from the configured endpoint string.

mod file;
mod http;

use crate::model::Payload;
use crate::Result;
use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

pub use file::FileSource;
pub use http::HttpSource;

/// The endpoint used when neither the config file nor the command line names one.
pub const DEFAULT_ENDPOINT: &str = "https://m-khairy-b.github.io/api/data-customers.json";

/// Produces the raw payload. Each call performs one attempt: there is no retry and no caching.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// A short description of where the data comes from, used in log and error messages.
    fn describe(&self) -> String;

    /// Fetches and parses the payload.
    async fn fetch(&self) -> Result<Payload>;
}

/// Chooses a `Source` for `endpoint`.
///
/// - `http://` and `https://` URLs are fetched with `HttpSource`.
/// - `file://` URLs and plain paths are read with `FileSource`.
/// - Any other scheme is an error.
pub fn from_endpoint(endpoint: &str) -> Result<Box<dyn Source>> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        bail!("The endpoint is empty")
    }

    let url = match Url::parse(endpoint) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            debug!("Treating endpoint '{endpoint}' as a file path");
            return Ok(Box::new(FileSource::new(PathBuf::from(endpoint))));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Invalid endpoint '{endpoint}'"));
        }
    };

    match url.scheme() {
        "http" | "https" => Ok(Box::new(HttpSource::new(url))),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow::anyhow!("Invalid file URL '{endpoint}'"))?;
            Ok(Box::new(FileSource::new(path)))
        }
        // A single-letter scheme is a Windows drive letter, e.g. C:\data\customers.json
        scheme if scheme.len() == 1 => Ok(Box::new(FileSource::new(PathBuf::from(endpoint)))),
        scheme => bail!("Unsupported endpoint scheme '{scheme}' in '{endpoint}'"),
    }
}
