#![allow(non_snake_case)]

use std::sync::Arc;

use assistantBot::clients::google_calendar::GoogleCalendarClient;
use assistantBot::clients::mem0_client::Mem0Client;
use assistantBot::config::AppConfig;
use assistantBot::service::assistant::AssistantService;
use assistantBot::service::calendar_gateway::CalendarGateway;
use assistantBot::service::memory_gateway::MemoryGateway;
use assistantBot::{cli, runtime};

#[tokio::main]
async fn main() {
    let config = AppConfig::load();

    let calendar: Arc<dyn CalendarGateway> = Arc::new(GoogleCalendarClient::new(
        config.token_file(),
        config.timezone(),
    ));
    let mem0_api_key = config
        .get("MEM0_API_KEY")
        .expect("MEM0_API_KEY environment variable not set");
    let memory: Arc<dyn MemoryGateway> = Arc::new(Mem0Client::new(mem0_api_key));

    let assistant = Arc::new(AssistantService::new(
        calendar.clone(),
        memory,
        config.timezone(),
    ));

    let run_mode = config.run_mode();
    if run_mode == "api" {
        let discord_client_secret = config
            .get("DISCORD_CLIENT_SECRET")
            .expect("DISCORD_CLIENT_SECRET must be set for bot mode");
        runtime::run_api(assistant, calendar, discord_client_secret).await;
    } else if run_mode == "cli" {
        cli::cli(assistant, calendar, config.timezone(), config.user_id()).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
