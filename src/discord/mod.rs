use anyhow::{Context as _, Result};
use serenity::prelude::*;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

mod command;
mod handler;
mod util;

use crate::app::App;
use handler::Handler;

pub const DISCORD_MAX_LEN: usize = 2000;
pub const MAX_ATTACHMENT_SIZE: u32 = 25 * 1024 * 1024; // 25MB

/// Serves the assistant in Discord: one session per channel, commands are
/// messages that mention the bot.
pub struct Bot {
    token: String,
    app: Arc<App>,
}

impl Bot {
    pub fn new(token: Option<String>, app: Arc<App>) -> Result<Self> {
        let token = token
            .context("Discord token is missing: set DISCORD_TOKEN or [discord] token")?;
        Ok(Self { token, app })
    }

    pub async fn start(self) -> Result<()> {
        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = Handler {
            app: self.app,
            bot_id: Arc::new(RwLock::new(None)),
            http_client: reqwest::Client::new(),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        };

        let mut client = Client::builder(&self.token, intents)
            .event_handler(handler)
            .await?;

        client.start().await?;

        Ok(())
    }
}
