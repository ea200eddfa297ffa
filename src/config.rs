//! Configuration file handling for the ledger.
//!
//! The configuration file is optional. It is looked for at `$HOME/.ledger/config.json` unless a
//! path is given with `--config` or `LEDGER_CONFIG`. When the default file does not exist, built-in
//! defaults are used; when an explicitly given file does not exist, that is an error.

use crate::source::{self, Source, DEFAULT_ENDPOINT};
use crate::state::{AmountScope, AppState};
use crate::table::PLACEHOLDER;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "ledger";
const CONFIG_VERSION: u8 = 1;
const CONFIG_DIR: &str = ".ledger";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app: the settings from the config file
/// (or the defaults) plus any overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The file the settings were loaded from, `None` when running on defaults.
    path: Option<PathBuf>,
    config_file: ConfigFile,
}

impl Config {
    /// The config file location used when none is given: `$HOME/.ledger/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_JSON))
    }

    /// Writes a new config file at `path`, creating its parent directory.
    ///
    /// # Arguments
    /// - `path` - Where to write the config file.
    /// - `endpoint` - The data endpoint to store. Defaults to `DEFAULT_ENDPOINT`.
    /// - `force` - Overwrite an existing file.
    ///
    /// # Errors
    /// - Returns an error if the file exists and `force` is false, or if any file operation fails.
    pub async fn create(
        path: impl Into<PathBuf>,
        endpoint: Option<&str>,
        force: bool,
    ) -> Result<Self> {
        let path = path.into();
        if path.exists() && !force {
            bail!(
                "The config file '{}' already exists, use --force to overwrite it",
                path.display()
            )
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::make_dir(parent)
                .await
                .context("Unable to create the config directory")?;
        }

        let config_file = ConfigFile {
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
            ..ConfigFile::default()
        };
        config_file.validate()?;
        config_file.save(&path).await?;

        Ok(Self {
            path: Some(path),
            config_file,
        })
    }

    /// Loads the configuration.
    ///
    /// - `Some(path)`: the file must exist and be valid.
    /// - `None`: the default path is used if a file exists there, otherwise the defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.is_file() {
                    bail!("The config file is missing '{}'", p.display())
                }
                p.to_path_buf()
            }
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => p,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading config from {}", path.display());
        let config_file = ConfigFile::load(&path).await?;
        Ok(Self {
            path: Some(path),
            config_file,
        })
    }

    /// Replaces the configured endpoint when `endpoint` is `Some`.
    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(endpoint) = endpoint {
            self.config_file.endpoint = endpoint.to_string();
        }
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        &self.config_file.endpoint
    }

    pub fn amount_scope(&self) -> AmountScope {
        self.config_file.amount_scope
    }

    pub fn placeholder(&self) -> &str {
        &self.config_file.placeholder
    }

    /// Creates the `Source` for the configured endpoint.
    pub fn source(&self) -> Result<Box<dyn Source>> {
        source::from_endpoint(self.endpoint())
    }

    /// An empty application state using the configured display settings.
    pub fn initial_state(&self) -> AppState {
        AppState::new(self.amount_scope(), self.placeholder())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger",
///   "config_version": 1,
///   "endpoint": "https://m-khairy-b.github.io/api/data-customers.json",
///   "amount_scope": "ignored",
///   "placeholder": "N/A"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL or path of the customer data
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Whether the minimum-amount query changes what the table and chart display
    #[serde(default)]
    amount_scope: AmountScope,

    /// Text shown for missing dates and amounts
    #[serde(default = "default_placeholder")]
    placeholder: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_placeholder() -> String {
    PLACEHOLDER.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            endpoint: default_endpoint(),
            amount_scope: AmountScope::default(),
            placeholder: default_placeholder(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or fails validation
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        anyhow::ensure!(
            self.config_version <= CONFIG_VERSION,
            "Config version {} is unsupported. Is a newer version of ledger available?",
            self.config_version
        );
        anyhow::ensure!(
            !self.endpoint.trim().is_empty(),
            "The endpoint in the config file is empty"
        );
        Ok(())
    }
}
