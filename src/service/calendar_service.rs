use std::sync::Arc;

use chrono::{Duration, Utc};
use chrono_tz::Tz;

use crate::clients::google_calendar::GatewayError;
use crate::service::calendar_gateway::CalendarGateway;
use crate::service::formatting::{format_events_for_display, format_weekly_schedule};

const UPCOMING_MAX: usize = 10;
const SEARCH_MAX: usize = 10;
const AVAILABILITY_WINDOW_HOURS: i64 = 2;
pub const DEFAULT_SLOT_MINUTES: i64 = 60;

const TODAY_WORDS: [&str; 3] = ["today", "today's", "todays"];
const WEEK_WORDS: [&str; 3] = ["week", "weekly", "this week"];
const UPCOMING_WORDS: [&str; 3] = ["upcoming", "next events", "future events"];
const AVAILABILITY_WORDS: [&str; 3] = ["available", "free", "busy"];

pub struct CalendarService {
    gateway: Arc<dyn CalendarGateway>,
    timezone: Tz,
}

impl CalendarService {
    pub fn new(gateway: Arc<dyn CalendarGateway>, timezone: Tz) -> Self {
        Self { gateway, timezone }
    }

    /// Stage-2 calendar sub-routing over the lower-cased trimmed text.
    /// Sub-checks run in a fixed order; anything that mentions no more
    /// specific keyword falls through to today's schedule.
    pub async fn handle(&self, input: &str) -> Result<String, GatewayError> {
        let lowered = input.trim().to_lowercase();
        let lower = lowered.as_str();

        if TODAY_WORDS.iter().any(|w| lower.contains(w)) {
            let events = self.gateway.get_todays_events().await?;
            return Ok(format!(
                "📅 **Today's Schedule:**\n\n{}",
                format_events_for_display(&events, self.timezone)
            ));
        }

        if WEEK_WORDS.iter().any(|w| lower.contains(w)) {
            let events = self.gateway.get_weekly_events().await?;
            return Ok(format!(
                "📅 **Weekly Schedule:**\n\n{}",
                format_weekly_schedule(&events, self.timezone)
            ));
        }

        if UPCOMING_WORDS.iter().any(|w| lower.contains(w)) {
            let events = self.gateway.get_upcoming_events(UPCOMING_MAX).await?;
            return Ok(format!(
                "📅 **Upcoming Events:**\n\n{}",
                format_events_for_display(&events, self.timezone)
            ));
        }

        if lower.starts_with("search ") || lower.starts_with("find ") {
            // The trigger words are removed wherever they occur, not
            // just at the front.
            let query = lower.replace("search", "").replace("find", "");
            let query = query.trim();
            if query.is_empty() {
                return Ok(
                    "❌ Please specify what you want to search for in your calendar.".to_string(),
                );
            }
            let events = self.gateway.search_events(query, SEARCH_MAX).await?;
            return Ok(format!(
                "🔍 **Search Results for '{}':**\n\n{}",
                query,
                format_events_for_display(&events, self.timezone)
            ));
        }

        if AVAILABILITY_WORDS.iter().any(|w| lower.contains(w)) {
            if lower.contains("next") && lower.contains("free") {
                let slot = self
                    .gateway
                    .get_next_free_slot(DEFAULT_SLOT_MINUTES)
                    .await?;
                let message = match slot {
                    Some(start) => format!(
                        "Next available {}-minute slot: {}",
                        DEFAULT_SLOT_MINUTES,
                        start.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M")
                    ),
                    None => format!(
                        "No available {}-minute slot found in the next 7 days",
                        DEFAULT_SLOT_MINUTES
                    ),
                };
                return Ok(format!("⏰ **Availability:**\n\n{}", message));
            }

            let start = Utc::now();
            let end = start + Duration::hours(AVAILABILITY_WINDOW_HOURS);
            let available = self.gateway.check_availability(start, end).await?;
            return Ok(if available {
                "✅ **Availability:** You're available for the next 2 hours!".to_string()
            } else {
                "❌ **Availability:** You're busy in the next 2 hours.".to_string()
            });
        }

        // Default: today's schedule.
        let events = self.gateway.get_todays_events().await?;
        Ok(format!(
            "📅 **Today's Schedule:**\n\n{}",
            format_events_for_display(&events, self.timezone)
        ))
    }
}
