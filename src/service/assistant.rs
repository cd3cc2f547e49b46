use std::sync::Arc;

use chrono_tz::Tz;

use crate::models::chat::Session;
use crate::service::calendar_gateway::CalendarGateway;
use crate::service::calendar_service::CalendarService;
use crate::service::memory_gateway::MemoryGateway;
use crate::service::memory_service::{MemoryCommandError, MemoryService};
use crate::service::routing::{classify, Intent};

pub const NOT_AUTHENTICATED_MESSAGE: &str =
    "❌ **Calendar not authenticated.** Please authenticate first before asking about your schedule.";

pub const GREETING_MESSAGE: &str =
    "👋 Hello! I'm your personal assistant. Type 'help' to see available commands.";

pub const UNRECOGNIZED_MESSAGE: &str =
    "❌ **Command not recognized.** Type 'help' to see available commands for calendar and memory management.";

pub const HELP_MESSAGE: &str = "🤖 **Available Commands:**

📅 **Calendar Commands:**
- \"today\" / \"today's schedule\" - Show today's events
- \"week\" / \"weekly schedule\" - Show this week's events
- \"upcoming events\" - Show upcoming events
- \"search [query]\" - Search events
- \"available\" / \"free time\" - Check availability
- \"next free slot\" - Find next available time

💭 **Memory Commands:**
- \"remember that...\" - Store a memory
- \"remember i...\" - Store personal memory
- \"remember to...\" - Store reminder
- \"recall [topic]\" - Recall memories about topic
- \"my memories\" - Show all memories
- \"search memory [query]\" - Search memories
- \"update memory <id> <new content>\" - Update specific memory
- \"delete memory <id>\" - Delete specific memory
- \"clear memories\" - Delete all memories
- \"i prefer...\" - Store preference

💡 **Examples:**
- \"remember that I prefer morning workouts\"
- \"recall meeting preferences\"
- \"search memory project deadline\"
- \"update memory abc123 I prefer afternoon workouts\"
- \"delete memory def456\"
- \"today's schedule\"
- \"am I free tomorrow?\"
";

/// Ties the two-stage router together: classify, gate the calendar on
/// auth state, dispatch, and turn every failure into a chat string. A
/// reply never escapes as an error.
pub struct AssistantService {
    calendar: CalendarService,
    memory: MemoryService,
}

impl AssistantService {
    pub fn new(
        calendar_gateway: Arc<dyn CalendarGateway>,
        memory_gateway: Arc<dyn MemoryGateway>,
        timezone: Tz,
    ) -> Self {
        Self {
            calendar: CalendarService::new(calendar_gateway, timezone),
            memory: MemoryService::new(memory_gateway),
        }
    }

    pub async fn respond(&self, session: &Session, input: &str) -> String {
        match classify(input) {
            Intent::Memory => match self.memory.handle(&session.user_id, input).await {
                Ok(reply) => reply,
                Err(MemoryCommandError::InvalidInput) => {
                    "❌ Please provide a valid memory to store.".to_string()
                }
                Err(MemoryCommandError::Usage(usage)) => format!("❌ **Usage:** {}", usage),
                Err(MemoryCommandError::Gateway(e)) => {
                    format!("❌ **Memory System Error:** {}", e)
                }
            },
            Intent::Calendar => {
                // The gate sits before dispatch: no gateway round-trip
                // happens while unauthenticated.
                if !session.calendar_authenticated {
                    return NOT_AUTHENTICATED_MESSAGE.to_string();
                }
                match self.calendar.handle(input).await {
                    Ok(reply) => reply,
                    Err(e) => format!("❌ **Calendar Error:** {}", e),
                }
            }
            Intent::Help => HELP_MESSAGE.to_string(),
            Intent::Greeting => GREETING_MESSAGE.to_string(),
            Intent::Unknown => UNRECOGNIZED_MESSAGE.to_string(),
        }
    }
}
