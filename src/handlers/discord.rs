use std::collections::HashMap;
use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::Mutex;

use crate::models::chat::{Session, Speaker};
use crate::service::assistant::AssistantService;

/// Message-driven Discord surface. Every non-bot message runs through
/// the assistant against a per-user session; requests are serialized by
/// the sessions lock, matching the one-command-per-round model.
pub struct BotHandler {
    assistant: Arc<AssistantService>,
    calendar_authenticated: bool,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl BotHandler {
    pub fn new(assistant: Arc<AssistantService>, calendar_authenticated: bool) -> Self {
        BotHandler {
            assistant,
            calendar_authenticated,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        println!("{} is connected!", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let content = msg.content.trim().to_string();
        if content.is_empty() {
            return;
        }

        let user_key = format!("@{}", msg.author.id);

        if content.to_lowercase() == "clear chat" {
            let mut sessions = self.sessions.lock().await;
            if let Some(session) = sessions.get_mut(&user_key) {
                session.clear_history();
            }
            drop(sessions);
            let _ = msg.channel_id.say(&ctx.http, "🗑️ Chat history cleared.").await;
            return;
        }

        let response = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.entry(user_key.clone()).or_insert_with(|| {
                let mut session = Session::new(user_key.clone());
                session.calendar_authenticated = self.calendar_authenticated;
                session
            });
            session.push_turn(Speaker::User, content.clone());
            let response = self.assistant.respond(session, &content).await;
            session.push_turn(Speaker::Assistant, response.clone());
            response
        };

        if let Err(why) = msg.channel_id.say(&ctx.http, response).await {
            eprintln!("Failed to send reply: {:?}", why);
        }
    }
}
