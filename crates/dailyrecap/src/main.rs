//! `dailyrecap` - unattended daily Gmail digest.
//!
//! Run once a day (cron, systemd timer). Takes no arguments; settings come
//! from `$DAILYRECAP_CONFIG` or the user config directory.

use anyhow::{Context, Result};
use dailyrecap_core::{GmailClient, OpenAiClient, Settings};
use dailyrecap_oauth::authenticate;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dailyrecap=info,dailyrecap_core=info,dailyrecap_oauth=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting daily recap");

    let settings = Settings::load().context("loading settings")?;
    let api_key = settings
        .openai_api_key()
        .context("loading OpenAI API key")?;

    let flow = settings
        .consent_flow()
        .with_context(|| format!("loading {}", settings.credentials_path.display()))?;
    let store = settings.token_store();
    let token = authenticate(&store, &flow)
        .await
        .context("authenticating with Google")?;

    let mailbox = GmailClient::from_token(&token).with_base_url(&settings.gmail_base_url);
    let model = OpenAiClient::new(api_key).with_base_url(&settings.openai_base_url);

    let today = chrono::Local::now().date_naive();
    let summary = dailyrecap_core::run(&mailbox, &model, &settings, today).await;

    info!(
        fetched = summary.fetched,
        marked = summary.marks.marked.len(),
        sent = summary.sent.is_some(),
        "Run completed"
    );
    Ok(())
}
