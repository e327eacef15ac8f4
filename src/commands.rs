use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use teloxide::utils::markdown;
use tracing::{error, info, warn};

use crate::fault::HandlerError;
use crate::platform::{InfoRequest, Replier, Reply, Sender};

pub const IDENTIFY_FALLBACK: &str = "Sorry, I couldn't identify your chat. Please try again.";
pub const CHAT_ID_FALLBACK: &str = "Sorry, I couldn't get your chat ID. Please try again.";
pub const RETRIEVE_FALLBACK: &str =
    "Sorry, I couldn't retrieve the info right now. Please try again later.";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show your user ID, username and chat ID.")]
    GetInfo,
    #[command(description = "show this message.")]
    Start,
    #[command(description = "show this message.")]
    Help,
}

/// Render the `/getinfo` answer as MarkdownV2.
pub fn render_info(sender: &Sender, chat_id: ChatId) -> Reply {
    let username = match sender.username.as_deref() {
        Some(name) if !name.is_empty() => format!("@{}", markdown::escape(name)),
        _ => r"\(Not Set\)".to_string(),
    };
    // Only the leading minus of a group ID actually needs it.
    let chat = markdown::escape(&chat_id.0.to_string());

    Reply::markdown(format!(
        "🆔 Your Telegram User ID: `{user_id}`\n\
         👤 Username: {username}\n\
         💬 This Chat ID: `{chat}`\n\n\
         Please copy the *Chat ID* \\(`{chat}`\\) and paste it into the \
         Trendy Notification Settings page\\.",
        user_id = sender.id,
    ))
}

/// Answer `/getinfo`. Sends exactly one message per call unless the info
/// reply fails, in which case one plain fallback follows it.
pub async fn get_info<R: Replier + ?Sized>(
    replier: &R,
    request: &InfoRequest,
) -> Result<(), HandlerError> {
    let Some(chat_id) = request.chat_id else {
        warn!("No chat found in update, nothing to reply to");
        return Ok(());
    };

    let Some(sender) = request.sender.as_ref() else {
        error!(chat_id = chat_id.0, "No user found in update");
        return send_plain(replier, chat_id, IDENTIFY_FALLBACK, request).await;
    };

    if chat_id.0 == 0 {
        error!(user_id = sender.id, "No chat ID found");
        return send_plain(replier, chat_id, CHAT_ID_FALLBACK, request).await;
    }

    info!(
        user_id = sender.id,
        chat_id = chat_id.0,
        "Received /getinfo from user {} in chat {}",
        sender.id,
        chat_id.0
    );

    let reply = render_info(sender, chat_id);
    if let Err(e) = replier
        .send_reply(chat_id, &reply, request.message_id)
        .await
    {
        error!(chat_id = chat_id.0, "Failed to send message for /getinfo: {:#}", e);
        return send_plain(replier, chat_id, RETRIEVE_FALLBACK, request).await;
    }

    Ok(())
}

/// Answer `/start` and `/help` with the command list.
pub async fn help<R: Replier + ?Sized>(replier: &R, chat_id: ChatId) -> Result<(), HandlerError> {
    replier
        .send_reply(chat_id, &Reply::plain(Command::descriptions().to_string()), None)
        .await
        .map_err(|e| HandlerError::new(e, Some(chat_id)))
}

async fn send_plain<R: Replier + ?Sized>(
    replier: &R,
    chat_id: ChatId,
    text: &str,
    request: &InfoRequest,
) -> Result<(), HandlerError> {
    replier
        .send_reply(chat_id, &Reply::plain(text), request.message_id)
        .await
        .map_err(|e| HandlerError::new(e, Some(chat_id)))
}
