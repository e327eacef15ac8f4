pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};

/// How the platform should render a reply's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Plain,
    MarkdownV2,
}

/// One outgoing message, built per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mode: RenderMode,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: RenderMode::Plain,
        }
    }

    /// `text` must already be escaped for MarkdownV2.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: RenderMode::MarkdownV2,
        }
    }
}

/// The user who issued a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
}

/// A `/getinfo` invocation, reduced to the identifiers the reply needs.
#[derive(Debug, Clone)]
pub struct InfoRequest {
    pub sender: Option<Sender>,
    pub chat_id: Option<ChatId>,
    /// Message to reply to, when known
    pub message_id: Option<MessageId>,
}

/// Outbound side of the platform client.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn send_reply(
        &self,
        chat_id: ChatId,
        reply: &Reply,
        reply_to: Option<MessageId>,
    ) -> Result<()>;
}
