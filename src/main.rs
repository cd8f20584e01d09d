use anyhow::Context as AnyhowContext;
use serenity::Client;
use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

mod completion;
mod config;
mod constant;
mod handler;
mod responder;
mod util;

use config::Configuration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Configuration::load()?;

    let api = completion::OpenAi::new(
        config.completion.base_url.as_str(),
        config.authentication.openai_api_key.clone(),
        Duration::from_secs(config.completion.timeout_secs),
    )
    .context("Error creating completion client")?;
    if config.authentication.openai_api_key.is_none() {
        tracing::warn!(
            "no completion API key set; every message will be answered with an error until {} is provided",
            constant::env::OPENAI_API_KEY
        );
    }
    let responder = responder::Responder::new(Arc::new(api), config.completion.clone());

    let mut client = Client::builder(
        config
            .authentication
            .discord_token
            .as_deref()
            .with_context(|| {
                format!(
                    "Expected {} to be set or authentication.discord_token to be filled in config",
                    constant::env::BOT_TOKEN
                )
            })?,
        handler::Handler::intents(),
    )
    .event_handler(handler::Handler::new(responder))
    .await
    .context("Error creating client")?;

    client.start().await.context("Client error")?;

    Ok(())
}
