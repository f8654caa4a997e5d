//! # dailyrecap-oauth
//!
//! `OAuth2` authentication for the Gmail REST API, as used by an unattended
//! desktop program.
//!
//! ## Features
//!
//! - **Installed-app flow**: authorization code with PKCE, redirect captured on
//!   a loopback listener
//! - **Token management**: silent refresh, expiration checking
//! - **Credential cache**: [`TokenStore`] persists the token between runs
//! - **Client secrets**: reads the JSON file downloaded from the Google console
//!
//! ## Quick Start
//!
//! ```ignore
//! use dailyrecap_oauth::{ClientSecret, InstalledAppFlow, TokenStore, session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientSecret::from_file("secrets/credentials.json")?.into_client()?;
//!     let flow = InstalledAppFlow::new(client);
//!     let store = TokenStore::new("secrets/token.json");
//!
//!     // Reuses the cached token, refreshes it, or asks for consent.
//!     let token = session::authenticate(&store, &flow).await?;
//!     println!("Access token: {}", token.access_token);
//!     Ok(())
//! }
//! ```
//!
//! ## Provider Support
//!
//! - **Gmail** - `https://www.googleapis.com/auth/gmail.modify` scope
//! - **Custom** - any provider speaking the authorization-code grant

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod secret;
pub mod session;
pub mod store;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, InstalledAppFlow, OAuthClient};
pub use provider::{GMAIL_MODIFY_SCOPE, Provider};
pub use secret::ClientSecret;
pub use session::{TokenSource, authenticate};
pub use store::TokenStore;
pub use token::Token;
