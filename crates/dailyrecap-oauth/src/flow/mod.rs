//! `OAuth2` authorization flows.

mod code;
mod installed;
mod loopback;

pub use code::{AuthorizationCodeFlow, Pkce};
pub use installed::InstalledAppFlow;
pub use loopback::{LoopbackListener, RedirectParams};

use crate::error::Result;
use crate::provider::Provider;
use crate::token::{ErrorResponse, Token, TokenResponse};
use reqwest::Client;
use tracing::debug;

/// Common `OAuth2` client configuration.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from provider.
    pub client_id: String,
    /// Client secret (installed apps still receive one from Google).
    pub client_secret: Option<String>,
    /// Redirect URI for authorization code flow.
    pub redirect_uri: Option<String>,
    /// Provider configuration.
    pub provider: Provider,
    /// HTTP client.
    http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
            provider,
            http_client: Client::new(),
        }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Refreshes an access token using a refresh token.
    ///
    /// The returned token keeps the old refresh token and scope when the
    /// server does not send new ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or if the token has no refresh token.
    pub async fn refresh_token(&self, token: &Token) -> Result<Token> {
        let refresh_token = token.refresh_token()?;

        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        params.extend(self.client_params());

        debug!(provider = %self.provider.name, "refreshing access token");
        let new_token = self.request_token(&params).await?;
        Ok(new_token.inherit_from(token))
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails.
    pub(crate) async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
        code_verifier: Option<&str>,
    ) -> Result<Token> {
        let mut params = vec![("grant_type", "authorization_code"), ("code", code)];
        params.extend(self.client_params());

        if let Some(uri) = redirect_uri.or(self.redirect_uri.as_deref()) {
            params.push(("redirect_uri", uri));
        }

        if let Some(verifier) = code_verifier {
            params.push(("code_verifier", verifier));
        }

        debug!(provider = %self.provider.name, "exchanging authorization code");
        self.request_token(&params).await
    }

    fn client_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("client_id", self.client_id.as_str())];
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret.as_str()));
        }
        params
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token> {
        let response = self
            .http_client
            .post(self.provider.token_url.clone())
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        let token_response: TokenResponse = response.json().await?;
        Token::from_response(token_response)
    }
}
