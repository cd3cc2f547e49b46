use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;

use crate::handlers::discord::BotHandler;
use crate::service::assistant::AssistantService;
use crate::service::calendar_gateway::CalendarGateway;

pub async fn run_api(
    assistant: Arc<AssistantService>,
    calendar: Arc<dyn CalendarGateway>,
    discord_client_secret: String,
) {
    // One auth attempt at startup; sessions inherit the outcome.
    let calendar_authenticated = match calendar.authenticate().await {
        Ok(message) => {
            println!("{}", message);
            true
        }
        Err(e) => {
            eprintln!("Calendar authentication failed: {}", e);
            false
        }
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(discord_client_secret, intents)
        .event_handler(BotHandler::new(assistant, calendar_authenticated))
        .await
        .expect("Error creating Serenity client");

    if let Err(why) = client.start().await {
        eprintln!("Client error: {:?}", why);
    }
}
