use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReplyParameters};

use crate::config::NetworkConfig;
use crate::platform::{InfoRequest, RenderMode, Replier, Reply, Sender};

/// Build a bot whose HTTP client honors the configured timeouts.
pub fn build_bot(token: &str, network: &NetworkConfig) -> Result<Bot> {
    let client: reqwest::Client = teloxide::net::default_reqwest_settings()
        .connect_timeout(network.connect_timeout())
        .timeout(network.request_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    Ok(Bot::with_client(token, client))
}

#[async_trait]
impl Replier for Bot {
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply: &Reply,
        reply_to: Option<MessageId>,
    ) -> Result<()> {
        let mut request = self.send_message(chat_id, reply.text.clone());
        if reply.mode == RenderMode::MarkdownV2 {
            request = request.parse_mode(ParseMode::MarkdownV2);
        }
        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(message_id));
        }

        request
            .await
            .with_context(|| format!("Failed to send Telegram message to chat {}", chat_id.0))?;

        Ok(())
    }
}

impl From<&Message> for InfoRequest {
    fn from(msg: &Message) -> Self {
        Self {
            sender: msg.from.as_ref().map(|user| Sender {
                id: user.id.0,
                username: user.username.clone(),
            }),
            chat_id: Some(msg.chat.id),
            message_id: Some(msg.id),
        }
    }
}
