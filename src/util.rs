use anyhow::Context;
use serenity::{async_trait, http::Http, model::prelude::Message};
use std::sync::Arc;

/// A chat message the bot may answer.
#[async_trait]
pub trait IncomingMessage: Send + Sync {
    /// Whether the author is an automated account; these are never answered.
    fn is_from_bot(&self) -> bool;
    fn content(&self) -> &str;
    /// Replies to the message in the channel it was sent in.
    async fn reply(&self, text: &str) -> anyhow::Result<()>;
}

/// A Discord message together with the HTTP handle needed to answer it.
pub struct DiscordMessage {
    http: Arc<Http>,
    message: Message,
}
impl DiscordMessage {
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self { http, message }
    }

    /// Re-fetches the message from its channel so the full content is loaded.
    pub async fn fetch(http: Arc<Http>, message: &Message) -> anyhow::Result<Self> {
        let message = message
            .channel_id
            .message(&http, message.id)
            .await
            .with_context(|| format!("failed to fetch message {}", message.id))?;
        Ok(Self::new(http, message))
    }
}
#[async_trait]
impl IncomingMessage for DiscordMessage {
    fn is_from_bot(&self) -> bool {
        self.message.author.bot
    }

    fn content(&self) -> &str {
        &self.message.content
    }

    async fn reply(&self, text: &str) -> anyhow::Result<()> {
        self.message.reply(self.http.as_ref(), text).await?;
        Ok(())
    }
}
