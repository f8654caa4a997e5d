//! Google OAuth client secret files.

use crate::error::{Error, Result};
use crate::flow::OAuthClient;
use crate::provider::Provider;
use serde::Deserialize;
use std::path::Path;

/// Contents of the `credentials.json` downloaded from the Google Cloud console.
///
/// Desktop clients are wrapped in `installed`, web clients in `web`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    #[serde(alias = "web")]
    installed: ClientSecretEntry,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientSecretEntry {
    client_id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    auth_uri: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ClientSecret {
    /// Reads a client secret file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a client secret.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses client secret JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON has neither an `installed` nor a `web` entry,
    /// or the client id is empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let secret: Self = serde_json::from_str(json)?;
        if secret.installed.client_id.is_empty() {
            return Err(Error::InvalidConfig("client_id is empty".to_string()));
        }
        Ok(secret)
    }

    /// The OAuth client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.installed.client_id
    }

    /// Builds an [`OAuthClient`] against the endpoints named in the file,
    /// requesting the Gmail modify scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints are not valid URLs.
    pub fn into_client(self) -> Result<OAuthClient> {
        let entry = self.installed;
        let provider = Provider::google_with_endpoints(&entry.auth_uri, &entry.token_uri)?;
        provider.validate()?;

        let client = OAuthClient::new(entry.client_id, provider);
        Ok(match entry.client_secret {
            Some(secret) => client.with_client_secret(secret),
            None => client,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "123.apps.googleusercontent.com",
            "project_id": "recap",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
            "client_secret": "GOCSPX-secret",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    #[test]
    fn test_installed_secret() {
        let secret = ClientSecret::from_json(INSTALLED).unwrap();
        assert_eq!(secret.client_id(), "123.apps.googleusercontent.com");

        let client = secret.into_client().unwrap();
        assert_eq!(client.client_secret.as_deref(), Some("GOCSPX-secret"));
        assert_eq!(client.provider.name, "Google");
        assert_eq!(
            client.provider.default_scopes,
            vec![crate::GMAIL_MODIFY_SCOPE]
        );
    }

    #[test]
    fn test_web_secret_with_default_endpoints() {
        let secret =
            ClientSecret::from_json(r#"{"web":{"client_id":"abc","client_secret":"s"}}"#).unwrap();
        let client = secret.into_client().unwrap();
        assert_eq!(
            client.provider.token_url.as_str(),
            "https://oauth2.googleapis.com/token"
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(ClientSecret::from_json(r#"{"api_key":"sk-..."}"#).is_err());
        assert!(matches!(
            ClientSecret::from_json(r#"{"installed":{"client_id":""}}"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ClientSecret::from_file("/nonexistent/credentials.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
