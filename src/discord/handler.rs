use super::{DISCORD_MAX_LEN, command, util};
use crate::app::{Action, App, Reply, SessionState};
use crate::error::AppResult;
use serenity::{
    async_trait,
    model::{
        channel::Message,
        gateway::Ready,
        id::{ChannelId, UserId},
    },
    prelude::*,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub(super) struct Handler {
    pub app: Arc<App>,
    pub bot_id: Arc<RwLock<Option<UserId>>>,
    pub http_client: reqwest::Client,
    /// One entry per channel that ever talked to the bot, kept until restart.
    pub sessions: Arc<Mutex<HashMap<ChannelId, Arc<Mutex<SessionState>>>>>,
}

impl Handler {
    fn extract_content(msg: &Message, bot_id: UserId) -> String {
        msg.content
            .replace(&format!("<@{}>", bot_id), "")
            .replace(&format!("<@!{}>", bot_id), "")
            .trim()
            .to_string()
    }

    async fn session(&self, channel_id: ChannelId) -> Arc<Mutex<SessionState>> {
        self.sessions
            .lock()
            .await
            .entry(channel_id)
            .or_default()
            .clone()
    }

    /// Downloads the first image attached to `msg`. With no image the
    /// buffer stays empty for the app to reject.
    async fn download_image(&self, msg: &Message) -> AppResult<Vec<u8>> {
        let Some(attachment) = msg.attachments.iter().find(|a| util::is_image(a)) else {
            return Ok(Vec::new());
        };

        let bytes = util::download(&self.http_client, &attachment.url, attachment.size).await?;
        info!(
            "Downloaded attachment '{}' ({} bytes)",
            attachment.filename,
            bytes.len()
        );
        Ok(bytes)
    }

    async fn send_reply(&self, ctx: &Context, msg: &Message, reply: &Reply) {
        let text = reply.render();
        let mut chunks = util::split_message(&text, DISCORD_MAX_LEN).into_iter();

        if let Some(first) = chunks.next()
            && let Err(e) = msg.reply(ctx, &first).await
        {
            error!("Failed to send reply: {}", e);
            return;
        }

        for chunk in chunks {
            if let Err(e) = msg.channel_id.say(&ctx.http, &chunk).await {
                error!(
                    "Failed to send response chunk to channel {}: {}",
                    msg.channel_id, e
                );
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let bot_id = match *self.bot_id.read().await {
            Some(id) => id,
            None => return,
        };

        if !msg.mentions.iter().any(|u| u.id == bot_id) {
            return;
        }

        let content = Self::extract_content(&msg, bot_id);
        let mut action = match command::parse(&content) {
            Ok(action) => action,
            Err(usage) => {
                self.send_reply(&ctx, &msg, &Reply::warning(usage)).await;
                return;
            }
        };

        let _ = msg.react(&ctx, '👀').await;
        let typing = msg.channel_id.start_typing(&ctx.http);

        if let Action::Classify { image } = &mut action {
            match self.download_image(&msg).await {
                Ok(bytes) => *image = bytes,
                Err(e) => {
                    warn!("Attachment download failed: {}", e);
                    typing.stop();
                    self.send_reply(&ctx, &msg, &Reply::from_error(&e)).await;
                    return;
                }
            }
        }

        info!("Channel {}: {}", msg.channel_id, action_label(&action));
        let session = self.session(msg.channel_id).await;
        let reply = {
            let mut state = session.lock().await;
            self.app.handle(&mut state, action).await
        };

        typing.stop();
        if reply.has_error() {
            let _ = msg.react(&ctx, '❌').await;
        }
        self.send_reply(&ctx, &msg, &reply).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Bot connected as {}", ready.user.name);
        *self.bot_id.write().await = Some(ready.user.id);
    }
}

/// Variant name only; image bytes and user text stay out of the logs.
fn action_label(action: &Action) -> &'static str {
    match action {
        Action::Help => "help",
        Action::ListFavorites => "list favorites",
        Action::AddFavorite { .. } => "add favorite",
        Action::UpdateFavorite { .. } => "update favorite",
        Action::DeleteFavorite { .. } => "delete favorite",
        Action::ListProducts => "list products",
        Action::AddProduct { .. } => "add product",
        Action::UpdateProduct { .. } => "update product",
        Action::DeleteProduct { .. } => "delete product",
        Action::Generate { .. } => "generate",
        Action::SaveGenerated => "save generated",
        Action::StartChat => "start chat",
        Action::Ask { .. } => "ask",
        Action::ShowChat => "show chat",
        Action::PlanMeals { .. } => "plan meals",
        Action::ShowPlan => "show plan",
        Action::Recommend { .. } => "recommend",
        Action::Classify { .. } => "classify",
        Action::FindVideo { .. } => "find video",
    }
}
