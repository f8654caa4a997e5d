//! Authorization Code Flow with PKCE (RFC 7636).

use super::OAuthClient;
use crate::error::Result;
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use url::Url;

fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// PKCE verifier and its S256 challenge.
#[derive(Debug, Clone)]
pub struct Pkce {
    verifier: String,
    challenge: String,
}

impl Pkce {
    /// Challenge method sent with the authorization request.
    pub const METHOD: &'static str = "S256";

    /// Generates a fresh 43-character verifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_verifier(random_urlsafe(32))
    }

    /// Derives the challenge for a known verifier.
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    /// Returns the verifier, sent only with the code exchange.
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Returns the challenge, sent with the authorization request.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }
}

/// Authorization Code Flow for `OAuth2`.
///
/// One instance covers one consent attempt: it owns the `state` value the
/// redirect must echo back and the PKCE verifier the exchange must present.
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    pkce: Option<Pkce>,
    state: String,
}

impl AuthorizationCodeFlow {
    /// Creates a new authorization code flow with a random `state`.
    #[must_use]
    pub fn new(client: OAuthClient) -> Self {
        Self {
            client,
            pkce: None,
            state: random_urlsafe(16),
        }
    }

    /// Enables PKCE.
    #[must_use]
    pub fn with_pkce(mut self) -> Self {
        self.pkce = Some(Pkce::generate());
        self
    }

    /// The `state` the redirect has to carry.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the PKCE verifier if PKCE is enabled.
    #[must_use]
    pub fn pkce_verifier(&self) -> Option<&str> {
        self.pkce.as_ref().map(Pkce::verifier)
    }

    /// Builds the authorization URL for user consent.
    ///
    /// Requests the provider's default scopes. For Google, also asks for
    /// offline access so the response includes a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be constructed.
    pub fn authorization_url(&self) -> Result<Url> {
        let mut url = self.client.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client.client_id)
                .append_pair("response_type", "code");

            if let Some(redirect_uri) = &self.client.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }

            let scope = self.client.provider.default_scopes.join(" ");
            if !scope.is_empty() {
                pairs.append_pair("scope", &scope);
            }

            pairs.append_pair("state", &self.state);

            if let Some(pkce) = &self.pkce {
                pairs
                    .append_pair("code_challenge", pkce.challenge())
                    .append_pair("code_challenge_method", Pkce::METHOD);
            }

            if self.client.provider.name == "Google" {
                pairs
                    .append_pair("access_type", "offline")
                    .append_pair("prompt", "consent");
            }
        }

        Ok(url)
    }

    /// Exchanges the authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        self.client
            .exchange_code(code, None, self.pkce_verifier())
            .await
    }
}
