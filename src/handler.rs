use crate::{
    responder::{Reply, Responder},
    util::{DiscordMessage, IncomingMessage},
};
use serenity::{
    async_trait,
    client::{Context, EventHandler},
    model::prelude::*,
};
use std::{future::Future, sync::Arc};
use tokio::task::JoinHandle;

pub struct Handler {
    responder: Arc<Responder>,
}
impl Handler {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }

    /// Intents needed to see and read messages in guilds and DMs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}
#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            guilds = ready.guilds.len(),
            "logged in as {}",
            ready.user.tag()
        );
    }

    async fn resume(&self, _ctx: Context, _: ResumedEvent) {
        tracing::info!("gateway session resumed");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let http = ctx.http.clone();
        // fire and forget; the reply task is never joined
        let _ = dispatch(self.responder.clone(), msg.author.bot, || async move {
            DiscordMessage::fetch(http, &msg).await
        })
        .await;
    }
}

/// Fetches the full message and hands it to `responder` on a new task.
///
/// Bot messages are dropped before fetching. A failed fetch is logged and the
/// message is dropped without a reply. Returns the reply task, if one was
/// started.
pub async fn dispatch<M, F, Fut>(
    responder: Arc<Responder>,
    from_bot: bool,
    fetch: F,
) -> Option<JoinHandle<Option<Reply>>>
where
    M: IncomingMessage + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<M>>,
{
    if from_bot {
        return None;
    }

    let message = match fetch().await {
        Ok(message) => message,
        Err(err) => {
            tracing::error!("error fetching message: {err:?}");
            return None;
        }
    };

    Some(tokio::spawn(async move { responder.handle(&message).await }))
}
