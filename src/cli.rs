use std::sync::Arc;

use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use inquire::Text;

use crate::models::chat::{Session, Speaker};
use crate::service::assistant::AssistantService;
use crate::service::calendar_gateway::CalendarGateway;
use crate::service::formatting::format_events_for_display;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (default)
    Chat {},
    /// One-shot command, printed and exited
    Ask { text: String },
    /// Events for a specific date (YYYY-MM-DD)
    Date { date: String },
    /// Calendar connection status
    Status {},
}

pub async fn cli(
    assistant: Arc<AssistantService>,
    calendar: Arc<dyn CalendarGateway>,
    timezone: Tz,
    user_id: String,
) {
    // Fine to panic here
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Chat {}) {
        Commands::Chat {} => {
            chat_loop(assistant, calendar, user_id).await;
        }
        Commands::Ask { text } => {
            let session = authenticated_session(calendar, user_id).await;
            let response = assistant.respond(&session, &text).await;
            println!("{}", response);
        }
        Commands::Date { date } => match calendar.get_events_for_date(&date).await {
            Ok(events) => {
                println!(
                    "📅 **Events for {}:**\n\n{}",
                    date,
                    format_events_for_display(&events, timezone)
                );
            }
            Err(e) => println!("❌ **Calendar Error:** {}", e),
        },
        Commands::Status {} => {
            let status = calendar.get_calendar_status().await;
            println!(
                "authenticated: {}\ncalendars accessible: {}\n{}",
                status.authenticated, status.calendars_accessible, status.message
            );
        }
    }
}

async fn authenticated_session(calendar: Arc<dyn CalendarGateway>, user_id: String) -> Session {
    let mut session = Session::new(user_id);
    match calendar.authenticate().await {
        Ok(message) => {
            session.calendar_authenticated = true;
            println!("✅ {}", message);
        }
        Err(e) => {
            println!("🔒 Calendar not authenticated: {}", e);
        }
    }
    session
}

async fn chat_loop(
    assistant: Arc<AssistantService>,
    calendar: Arc<dyn CalendarGateway>,
    user_id: String,
) {
    let mut session = authenticated_session(calendar, user_id).await;
    println!("Type 'help' for commands, 'clear chat' to reset, 'exit' to quit.\n");

    loop {
        let input = match Text::new("You:").prompt() {
            Ok(line) => line,
            // Ctrl-C / Ctrl-D end the session.
            Err(_) => break,
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();
        if lowered == "exit" || lowered == "quit" {
            break;
        }
        if lowered == "clear chat" {
            session.clear_history();
            println!("🗑️ Chat history cleared.\n");
            continue;
        }

        session.push_turn(Speaker::User, trimmed);
        let response = assistant.respond(&session, trimmed).await;
        session.push_turn(Speaker::Assistant, response.clone());
        println!("Assistant: {}\n", response);
    }
}
