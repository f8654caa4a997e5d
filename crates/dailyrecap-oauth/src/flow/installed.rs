//! Interactive consent for installed (desktop) applications.

use super::{AuthorizationCodeFlow, LoopbackListener, OAuthClient};
use crate::error::{Error, Result};
use crate::session::TokenSource;
use crate::token::Token;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Browser consent with the redirect captured on a loopback listener,
/// plus silent refresh through the same client.
#[derive(Debug, Clone)]
pub struct InstalledAppFlow {
    client: OAuthClient,
    port: u16,
    timeout_secs: u64,
    open_browser: bool,
}

impl InstalledAppFlow {
    /// Creates a flow on an OS-chosen port with a five minute timeout.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self {
            client,
            port: 0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            open_browser: true,
        }
    }

    /// Listens on a fixed port instead of an OS-chosen one.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// How long to wait for the user to finish the consent page.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Only log the URL; don't try to launch a browser.
    #[must_use]
    pub const fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Runs the full consent round trip and returns the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind, the user declines,
    /// the wait times out, or the code exchange fails.
    pub async fn run(&self) -> Result<Token> {
        let listener = LoopbackListener::bind(self.port).await?;
        let client = self
            .client
            .clone()
            .with_redirect_uri(listener.redirect_uri());
        let flow = AuthorizationCodeFlow::new(client).with_pkce();
        let url = flow.authorization_url()?;

        info!("Please visit this URL to authorize access: {url}");
        if self.open_browser {
            if let Err(e) = opener::open(url.as_str()) {
                warn!("Could not open a browser: {e}");
            }
        }

        let params = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            listener.accept_redirect(),
        )
        .await
        .map_err(|_| Error::Timeout(self.timeout_secs))??;

        let code = params.into_code(flow.state())?;
        let token = flow.exchange_code(&code).await?;
        info!("Authorization granted");
        Ok(token)
    }
}

#[async_trait]
impl TokenSource for InstalledAppFlow {
    async fn refresh(&self, token: &Token) -> Result<Token> {
        self.client.refresh_token(token).await
    }

    async fn authorize(&self) -> Result<Token> {
        self.run().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[tokio::test(start_paused = true)]
    async fn test_consent_times_out() {
        let client = OAuthClient::new("id", Provider::google().unwrap());
        let flow = InstalledAppFlow::new(client)
            .without_browser()
            .with_timeout_secs(5);

        let err = flow.run().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(5)));
    }
}
