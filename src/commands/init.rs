use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use std::path::Path;

/// Writes an initial `config.json` with default settings.
///
/// # Arguments
/// - `path` - Where to write the config file. Defaults to `$HOME/.ledger/config.json`.
/// - `endpoint` - The URL or path of the customer data to store in the file.
/// - `force` - Overwrite the file if it already exists.
///
/// # Errors
/// - Returns an error if the home directory cannot be found, the file exists and `force` is false,
///   or any file operation fails.
pub async fn init(path: Option<&Path>, endpoint: Option<&str>, force: bool) -> Result<Out<()>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path()
            .ok_or_else(|| anyhow!("Unable to find the home directory, use --config"))?,
    };
    let config = Config::create(&path, endpoint, force)
        .await
        .context("Unable to create the config file")?;
    Ok(format!(
        "Successfully created the config file at {} reading from {}",
        path.display(),
        config.endpoint()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let out = init(Some(&path), Some("customers.json"), false).await.unwrap();
        assert!(out.message().contains("customers.json"));
        assert!(out.structure().is_none());

        let config = Config::load(Some(path.as_path())).await.unwrap();
        assert_eq!(config.endpoint(), "customers.json");

        assert!(init(Some(&path), None, false).await.is_err());
        init(Some(&path), None, true).await.unwrap();
    }
}
