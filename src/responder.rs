use std::sync::Arc;

use crate::{
    completion::{self, CompletionApi},
    config, constant,
    util::IncomingMessage,
};

/// What the bot answers with for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Completion(String),
    UnexpectedResponse,
    SomethingWentWrong,
}
impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::Completion(text) => text.as_str(),
            Self::UnexpectedResponse => constant::reply::UNEXPECTED_RESPONSE,
            Self::SomethingWentWrong => constant::reply::SOMETHING_WENT_WRONG,
        }
    }
}

pub fn build_prompt(content: &str) -> String {
    format!(
        "{}{content}{}",
        constant::prompt::PREFIX,
        constant::prompt::SUFFIX
    )
}

/// Answers one message at a time with a single completion call.
pub struct Responder {
    api: Arc<dyn CompletionApi>,
    params: config::Completion,
}
impl Responder {
    pub fn new(api: Arc<dyn CompletionApi>, params: config::Completion) -> Self {
        Self { api, params }
    }

    /// Sends exactly one reply to `message`, unless it comes from a bot, in
    /// which case nothing is sent and `None` is returned.
    pub async fn handle(&self, message: &dyn IncomingMessage) -> Option<Reply> {
        if message.is_from_bot() {
            return None;
        }

        let reply = self.respond(message.content()).await;
        if let Err(err) = message.reply(reply.text()).await {
            tracing::error!("failed to send reply: {err:?}");
        }

        Some(reply)
    }

    pub async fn respond(&self, content: &str) -> Reply {
        tracing::info!(content, "answering message");

        let request = completion::Request::new(&self.params, build_prompt(content));
        match self.api.create(&request).await {
            Ok(response) => match response.choices.into_iter().next() {
                Some(choice) => Reply::Completion(choice.text),
                None => {
                    tracing::warn!(model = %request.model, "completion returned no choices");
                    Reply::UnexpectedResponse
                }
            },
            Err(err) => {
                tracing::error!(model = %request.model, "completion failed: {err:?}");
                Reply::SomethingWentWrong
            }
        }
    }
}
