//! Loopback HTTP listener that captures the authorization redirect.

use crate::error::{Error, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};
use url::Url;

/// Query parameters of an authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectParams {
    /// Authorization code, present on success.
    pub code: Option<String>,
    /// Echoed `state`.
    pub state: Option<String>,
    /// Error code, present when the user declined or the request was bad.
    pub error: Option<String>,
}

impl RedirectParams {
    /// Parses the request line of an HTTP request (`GET /?code=..&state=.. HTTP/1.1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRedirect`] when the line is not a GET request.
    pub fn from_request_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
            return Err(Error::InvalidRedirect(line.trim().to_string()));
        };

        let url = Url::parse("http://localhost")?.join(target)?;
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Whether this request is the redirect, rather than a stray browser request.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }

    /// Validates the redirect and returns the authorization code.
    ///
    /// # Errors
    ///
    /// - [`Error::AccessDenied`] if the user declined consent
    /// - [`Error::OAuth`] for any other error the provider reports
    /// - [`Error::StateMismatch`] if `state` does not match `expected_state`
    /// - [`Error::InvalidRedirect`] if no code is present
    pub fn into_code(self, expected_state: &str) -> Result<String> {
        if let Some(error) = self.error {
            return Err(if error == "access_denied" {
                Error::AccessDenied
            } else {
                Error::oauth_error(error, "authorization redirect reported an error")
            });
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }
        self.code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| Error::InvalidRedirect("missing code".to_string()))
    }
}

/// A listener on `127.0.0.1` used as the redirect target.
#[derive(Debug)]
pub struct LoopbackListener {
    listener: TcpListener,
    port: u16,
}

impl LoopbackListener {
    /// Binds the listener. Port `0` lets the OS pick one.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound.
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    /// The port actually bound.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Redirect URI to register with the authorization request.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Accepts connections until one carries the authorization redirect.
    ///
    /// Other requests (a browser's favicon fetch, say) get a 404. A connection
    /// that fails mid-request is dropped and the listener keeps waiting.
    ///
    /// # Errors
    ///
    /// Returns an error only if the listening socket itself fails.
    pub async fn accept_redirect(&self) -> Result<RedirectParams> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            debug!(%peer, "loopback connection");
            match Self::handle(stream).await {
                Ok(Some(params)) => return Ok(params),
                Ok(None) => {}
                Err(e) => warn!(%peer, "Dropped loopback connection: {e}"),
            }
        }
    }

    async fn handle(stream: TcpStream) -> Result<Option<RedirectParams>> {
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;

        let params = match RedirectParams::from_request_line(&request_line) {
            Ok(params) if params.is_redirect() => params,
            _ => {
                respond(reader.get_mut(), "404 Not Found", "Not found.").await?;
                return Ok(None);
            }
        };

        let message = if params.code.is_some() {
            "Authorization complete. You can close this tab."
        } else {
            "Authorization was not granted. You can close this tab."
        };
        // The redirect already arrived; a browser that hangs up early does not undo it.
        if let Err(e) = respond(reader.get_mut(), "200 OK", message).await {
            warn!("Could not answer the authorization redirect: {e}");
        }
        Ok(Some(params))
    }
}

async fn respond(stream: &mut TcpStream, status: &str, message: &str) -> Result<()> {
    let body = format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding: 40px;\">\
         <h2>{message}</h2></body></html>"
    );
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}
