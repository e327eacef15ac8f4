use anyhow::{Context, Result};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::commands::{self, Command};
use crate::config::Config;
use crate::fault::{FaultReporter, HandlerError};
use crate::platform::telegram::build_bot;
use crate::platform::InfoRequest;

/// Start the Telegram bot and poll until Ctrl-C
pub async fn run(config: &Config) -> Result<()> {
    let bot = build_bot(&config.telegram.bot_token, &config.network)?;

    let me = bot
        .get_me()
        .await
        .context("Failed to reach Telegram with the configured bot token")?;
    info!("Authorized as @{}", me.username());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register command menu: {}", e);
    }

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    info!("Starting Telegram bot...");

    Dispatcher::builder(bot.clone(), handler)
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(FaultReporter::new(bot))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

#[tracing::instrument(skip_all, fields(chat_id = msg.chat.id.0, message_id = msg.id.0))]
async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), HandlerError> {
    match cmd {
        Command::GetInfo => commands::get_info(&bot, &InfoRequest::from(&msg)).await,
        Command::Start | Command::Help => commands::help(&bot, msg.chat.id).await,
    }
}
