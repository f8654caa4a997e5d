//! Run settings and secret loading.

use crate::error::{Error, Result};
use dailyrecap_oauth::{ClientSecret, InstalledAppFlow, TokenStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "DAILYRECAP_CONFIG";

/// Environment variable that overrides the `OpenAI` key file.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for one run. Every field has a default, so an empty or absent
/// settings file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// OAuth client secret downloaded from the Google console.
    pub credentials_path: PathBuf,
    /// Credential cache written after consent or refresh.
    pub token_path: PathBuf,
    /// JSON file holding `{"api_key": "..."}`.
    pub openai_key_path: PathBuf,
    /// Digest recipient. The authenticated account itself when unset.
    pub recipient: Option<String>,
    /// Gmail search selecting the messages to process.
    pub query: String,
    /// Model used for classification.
    pub classify_model: String,
    /// Model used for markdown to HTML conversion.
    pub convert_model: String,
    /// Gmail API root.
    pub gmail_base_url: String,
    /// `OpenAI` API root.
    pub openai_base_url: String,
    /// Loopback port for the consent redirect. 0 lets the OS choose.
    pub redirect_port: u16,
    /// How long consent may take before the run gives up.
    pub consent_timeout_secs: u64,
    /// Launch a browser for consent. Turn off on headless machines and open
    /// the logged URL by hand.
    pub open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("secrets/credentials.json"),
            token_path: PathBuf::from("secrets/token.json"),
            openai_key_path: PathBuf::from("secrets/openai.json"),
            recipient: None,
            query: "is:unread newer_than:1d".to_string(),
            classify_model: "gpt-4o".to_string(),
            convert_model: "o1-preview".to_string(),
            gmail_base_url: "https://gmail.googleapis.com".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            redirect_port: 0,
            consent_timeout_secs: 300,
            open_browser: true,
        }
    }
}

#[derive(Deserialize)]
struct ApiKeyFile {
    api_key: String,
}

impl Settings {
    /// `<config dir>/dailyrecap/settings.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dailyrecap")
            .join("settings.json")
    }

    /// Loads settings from `$DAILYRECAP_CONFIG`, else [`Settings::default_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV).map_or_else(Self::default_path, PathBuf::from);
        Self::load_from(&path)
    }

    /// Loads settings from `path`, falling back to defaults if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Checks values that would otherwise fail late in the run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::Config("query must not be empty".to_string()));
        }
        if self.classify_model.trim().is_empty() || self.convert_model.trim().is_empty() {
            return Err(Error::Config("model names must not be empty".to_string()));
        }
        if let Some(recipient) = &self.recipient {
            if !recipient.contains('@') || recipient.contains(['\r', '\n']) {
                return Err(Error::Config(format!("invalid recipient {recipient:?}")));
            }
        }
        Ok(())
    }

    /// The credential cache.
    #[must_use]
    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.token_path)
    }

    /// Builds the consent flow from the client secret file.
    ///
    /// # Errors
    ///
    /// Returns an error if the client secret file is missing or invalid.
    pub fn consent_flow(&self) -> Result<InstalledAppFlow> {
        let client = ClientSecret::from_file(&self.credentials_path)?.into_client()?;
        let flow = InstalledAppFlow::new(client)
            .with_port(self.redirect_port)
            .with_timeout_secs(self.consent_timeout_secs);
        Ok(if self.open_browser {
            flow
        } else {
            flow.without_browser()
        })
    }

    /// The `OpenAI` key, from `$OPENAI_API_KEY` or the key file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source yields a non-empty key.
    pub fn openai_api_key(&self) -> Result<String> {
        api_key_from(std::env::var(API_KEY_ENV).ok(), &self.openai_key_path)
    }
}

fn api_key_from(env_value: Option<String>, path: &Path) -> Result<String> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        return Ok(key.trim().to_string());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read OpenAI key file {}: {e}", path.display()))
    })?;
    let file: ApiKeyFile = serde_json::from_str(&contents)?;
    let key = file.api_key.trim();
    if key.is_empty() {
        return Err(Error::Config(format!("empty api_key in {}", path.display())));
    }
    Ok(key.to_string())
}
