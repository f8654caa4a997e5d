//! Obtaining a usable credential at startup.

use crate::error::{Error, Result};
use crate::provider::GMAIL_MODIFY_SCOPE;
use crate::store::TokenStore;
use crate::token::Token;
use async_trait::async_trait;
use tracing::{info, warn};

/// Where fresh tokens come from.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Exchanges the refresh token of `token` for a new access token.
    async fn refresh(&self, token: &Token) -> Result<Token>;

    /// Runs interactive consent.
    async fn authorize(&self) -> Result<Token>;
}

/// Returns a valid token, consulting `store` first.
///
/// 1. A cached, unexpired token is returned as is.
/// 2. An expired token with a refresh token is refreshed silently.
/// 3. Otherwise, or if the refresh fails, consent runs again.
///
/// Every newly obtained token is written back to `store`. An unreadable cache
/// is treated like a missing one, and so is a cached token that was granted
/// without [`GMAIL_MODIFY_SCOPE`]. A refresh token the server rejects is
/// removed from the cache before consent starts.
///
/// # Errors
///
/// Returns an error if consent fails, if the user grants consent without
/// [`GMAIL_MODIFY_SCOPE`], or if the new token cannot be persisted.
pub async fn authenticate(store: &TokenStore, source: &dyn TokenSource) -> Result<Token> {
    let cached = store.load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable credential cache {}: {e}", store.path().display());
        None
    });

    if let Some(token) = cached.filter(|t| {
        let usable = t.has_scope(GMAIL_MODIFY_SCOPE);
        if !usable {
            warn!("Cached credentials lack {GMAIL_MODIFY_SCOPE}, asking for consent again");
        }
        usable
    }) {
        if token.is_valid() {
            info!("Using cached credentials");
            return Ok(token);
        }

        if token.can_refresh() {
            info!("Cached credentials expired, refreshing");
            match source.refresh(&token).await {
                Ok(refreshed) => {
                    store.save(&refreshed)?;
                    return Ok(refreshed);
                }
                Err(e) if e.is_grant_rejected() => {
                    warn!("Refresh token was revoked or has expired: {e}");
                    if let Err(e) = store.clear() {
                        warn!("Could not remove {}: {e}", store.path().display());
                    }
                }
                Err(e) => warn!("Token refresh failed, falling back to consent: {e}"),
            }
        }
    }

    info!("Initiating OAuth flow for new credentials");
    let token = source.authorize().await?;
    if !token.has_scope(GMAIL_MODIFY_SCOPE) {
        return Err(Error::MissingScope(GMAIL_MODIFY_SCOPE.to_string()));
    }
    store.save(&token)?;
    Ok(token)
}
