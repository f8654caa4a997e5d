//! `OAuth2` provider configurations.

use crate::error::{Error, Result};
use url::Url;

/// Read, label, and send access to Gmail. Enough to list, mark read, and send.
pub const GMAIL_MODIFY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Google").
    pub name: String,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Default scopes.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// Google `OAuth2` provider configuration.
    ///
    /// Requests only [`GMAIL_MODIFY_SCOPE`].
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn google() -> Result<Self> {
        Ok(Self::new(
            "Google",
            "https://accounts.google.com/o/oauth2/v2/auth",
            "https://oauth2.googleapis.com/token",
        )?
        .with_default_scopes(vec![GMAIL_MODIFY_SCOPE.to_string()]))
    }

    /// Google configuration with endpoints taken from a client secret file.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn google_with_endpoints(auth_url: &str, token_url: &str) -> Result<Self> {
        Ok(Self::new("Google", auth_url, token_url)?
            .with_default_scopes(vec![GMAIL_MODIFY_SCOPE.to_string()]))
    }

    /// Validates the provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints are not HTTP(S) or no scope is set.
    pub fn validate(&self) -> Result<()> {
        for url in [&self.auth_url, &self.token_url] {
            if !matches!(url.scheme(), "https" | "http") {
                return Err(Error::InvalidConfig(format!(
                    "{} endpoint must be http(s): {url}",
                    self.name
                )));
            }
        }

        if self.default_scopes.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "{} provider has no scopes",
                self.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_google_provider() {
        let provider = Provider::google().unwrap();
        assert_eq!(provider.name, "Google");
        assert_eq!(provider.default_scopes, vec![GMAIL_MODIFY_SCOPE]);
        assert_eq!(provider.token_url.host_str(), Some("oauth2.googleapis.com"));
        assert!(provider.validate().is_ok());
    }

    #[test]
    fn test_custom_endpoints() {
        let provider = Provider::google_with_endpoints(
            "https://accounts.google.com/o/oauth2/auth",
            "http://127.0.0.1:9999/token",
        )
        .unwrap();
        assert_eq!(provider.token_url.port(), Some(9999));
        assert!(provider.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_scopes() {
        let provider =
            Provider::new("Custom", "https://a.example/auth", "https://a.example/token").unwrap();
        assert!(matches!(
            provider.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let provider = Provider::new("Custom", "ftp://a.example/auth", "https://a.example/token")
            .unwrap()
            .with_default_scopes(vec!["email".to_string()]);
        assert!(provider.validate().is_err());
    }

    #[test]
    fn test_invalid_url() {
        assert!(Provider::new("Bad", "not a url", "https://a.example/token").is_err());
    }
}
