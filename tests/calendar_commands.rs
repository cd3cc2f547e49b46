use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serenity::async_trait;
use tokio::sync::Mutex;

use assistantBot::clients::google_calendar::{CalendarStatus, GatewayError};
use assistantBot::models::chat::Session;
use assistantBot::models::event::CalendarEvent;
use assistantBot::models::memory::MemoryRecord;
use assistantBot::service::assistant::{AssistantService, NOT_AUTHENTICATED_MESSAGE};
use assistantBot::service::calendar_gateway::CalendarGateway;
use assistantBot::service::memory_gateway::MemoryGateway;

#[derive(Debug, Clone, PartialEq)]
enum CalendarCall {
    Today,
    Weekly,
    Upcoming { max: usize },
    Search { query: String, max: usize },
    CheckAvailability { window_hours: i64 },
    NextFreeSlot { duration_minutes: i64 },
}

struct FakeCalendar {
    calls: Mutex<Vec<CalendarCall>>,
    events: Vec<CalendarEvent>,
    slot: Option<DateTime<Utc>>,
    available: bool,
    fail_with: Option<String>,
}

impl Default for FakeCalendar {
    fn default() -> Self {
        FakeCalendar {
            calls: Mutex::new(Vec::new()),
            events: Vec::new(),
            slot: None,
            available: true,
            fail_with: None,
        }
    }
}

impl FakeCalendar {
    async fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().await.clone()
    }

    fn check_failure(&self) -> Result<(), GatewayError> {
        match &self.fail_with {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarGateway for FakeCalendar {
    async fn authenticate(&self) -> Result<String, GatewayError> {
        Ok("fake@example.com".to_string())
    }

    async fn get_todays_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.calls.lock().await.push(CalendarCall::Today);
        self.check_failure()?;
        Ok(self.events.clone())
    }

    async fn get_weekly_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.calls.lock().await.push(CalendarCall::Weekly);
        self.check_failure()?;
        Ok(self.events.clone())
    }

    async fn get_events_for_date(&self, _date: &str) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.check_failure()?;
        Ok(self.events.clone())
    }

    async fn get_upcoming_events(&self, max: usize) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.calls.lock().await.push(CalendarCall::Upcoming { max });
        self.check_failure()?;
        Ok(self.events.clone())
    }

    async fn search_events(
        &self,
        query: &str,
        max: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.calls.lock().await.push(CalendarCall::Search {
            query: query.to_string(),
            max,
        });
        self.check_failure()?;
        Ok(self.events.clone())
    }

    async fn check_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError> {
        self.calls.lock().await.push(CalendarCall::CheckAvailability {
            window_hours: (end - start).num_hours(),
        });
        self.check_failure()?;
        Ok(self.available)
    }

    async fn get_next_free_slot(
        &self,
        duration_minutes: i64,
    ) -> Result<Option<DateTime<Utc>>, GatewayError> {
        self.calls
            .lock()
            .await
            .push(CalendarCall::NextFreeSlot { duration_minutes });
        self.check_failure()?;
        Ok(self.slot)
    }

    async fn get_calendar_status(&self) -> CalendarStatus {
        CalendarStatus {
            authenticated: true,
            calendars_accessible: true,
            message: "ok".to_string(),
        }
    }
}

/// Calendar commands must never reach the memory store.
struct UnreachableMemory;

#[async_trait]
impl MemoryGateway for UnreachableMemory {
    async fn add_memory(
        &self,
        _user_id: &str,
        _text: &str,
        _category: &str,
    ) -> Result<(), GatewayError> {
        panic!("memory gateway should not be called");
    }
    async fn get_memories(
        &self,
        _user_id: &str,
        _limit: usize,
        _offset: usize,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        panic!("memory gateway should not be called");
    }
    async fn search_memories(
        &self,
        _user_id: &str,
        _query: &str,
        _limit: usize,
        _threshold: f64,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        panic!("memory gateway should not be called");
    }
    async fn update_memory(&self, _memory_id: &str, _text: &str) -> Result<(), GatewayError> {
        panic!("memory gateway should not be called");
    }
    async fn delete_memory(&self, _memory_id: &str) -> Result<(), GatewayError> {
        panic!("memory gateway should not be called");
    }
    async fn clear_user_memories(&self, _user_id: &str) -> Result<(), GatewayError> {
        panic!("memory gateway should not be called");
    }
}

fn event(title: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: title.to_lowercase(),
        title: title.to_string(),
        description: String::new(),
        start_time: start.to_rfc3339(),
        end_time: (start + Duration::hours(1)).to_rfc3339(),
        start,
        end: start + Duration::hours(1),
        location: String::new(),
        attendees: Vec::new(),
        organizer: String::new(),
        status: "confirmed".to_string(),
        is_all_day: false,
    }
}

fn assistant_with(calendar: Arc<FakeCalendar>) -> AssistantService {
    AssistantService::new(calendar, Arc::new(UnreachableMemory), chrono_tz::UTC)
}

fn authenticated_session() -> Session {
    let mut session = Session::new("student_001");
    session.calendar_authenticated = true;
    session
}

#[tokio::test]
async fn unauthenticated_calendar_request_is_gated_before_any_call() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&Session::new("student_001"), "what's on today")
        .await;

    assert_eq!(reply, NOT_AUTHENTICATED_MESSAGE);
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn today_routes_to_todays_events() {
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap();
    let calendar = Arc::new(FakeCalendar {
        events: vec![event("Standup", start)],
        ..FakeCalendar::default()
    });
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "what's on today")
        .await;

    assert!(reply.contains("Today's Schedule"));
    assert!(reply.contains("**Standup**"));
    assert_eq!(calendar.calls().await, vec![CalendarCall::Today]);
}

#[tokio::test]
async fn week_routes_to_weekly_events() {
    let start = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
    let calendar = Arc::new(FakeCalendar {
        events: vec![event("Review", start)],
        ..FakeCalendar::default()
    });
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "show my weekly schedule")
        .await;

    assert!(reply.contains("Weekly Schedule"));
    assert!(reply.contains("Review"));
    assert_eq!(calendar.calls().await, vec![CalendarCall::Weekly]);
}

#[tokio::test]
async fn upcoming_routes_with_its_limit() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "upcoming events please")
        .await;

    assert!(reply.contains("Upcoming Events"));
    assert!(reply.contains("No events found."));
    assert_eq!(calendar.calls().await, vec![CalendarCall::Upcoming { max: 10 }]);
}

#[tokio::test]
async fn search_strips_trigger_words_and_passes_the_query() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "search team sync")
        .await;

    assert!(reply.contains("Search Results for 'team sync'"));
    assert_eq!(
        calendar.calls().await,
        vec![CalendarCall::Search {
            query: "team sync".to_string(),
            max: 10,
        }]
    );
}

#[tokio::test]
async fn empty_search_query_never_reaches_the_gateway() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    // Both words are trigger words, so stripping leaves nothing.
    let reply = assistant.respond(&authenticated_session(), "search find").await;

    assert_eq!(
        reply,
        "❌ Please specify what you want to search for in your calendar."
    );
    assert!(calendar.calls().await.is_empty());
}

#[tokio::test]
async fn next_free_slot_asks_for_a_sixty_minute_window() {
    let slot = Utc.with_ymd_and_hms(2026, 3, 3, 10, 30, 0).unwrap();
    let calendar = Arc::new(FakeCalendar {
        slot: Some(slot),
        ..FakeCalendar::default()
    });
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "when is my next free slot")
        .await;

    assert!(reply.contains("Next available 60-minute slot: 2026-03-03 10:30"));
    assert_eq!(
        calendar.calls().await,
        vec![CalendarCall::NextFreeSlot {
            duration_minutes: 60
        }]
    );
}

#[tokio::test]
async fn no_free_slot_reports_the_seven_day_horizon() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "next free slot")
        .await;

    assert!(reply.contains("No available 60-minute slot found in the next 7 days"));
}

#[tokio::test]
async fn busy_question_checks_a_two_hour_window() {
    let calendar = Arc::new(FakeCalendar {
        available: false,
        ..FakeCalendar::default()
    });
    let assistant = assistant_with(calendar.clone());

    let reply = assistant.respond(&authenticated_session(), "am i busy").await;

    assert_eq!(reply, "❌ **Availability:** You're busy in the next 2 hours.");
    assert_eq!(
        calendar.calls().await,
        vec![CalendarCall::CheckAvailability { window_hours: 2 }]
    );
}

#[tokio::test]
async fn available_answer_when_the_window_is_free() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "am i available")
        .await;

    assert_eq!(reply, "✅ **Availability:** You're available for the next 2 hours!");
}

#[tokio::test]
async fn bare_calendar_keyword_falls_through_to_today() {
    let calendar = Arc::new(FakeCalendar::default());
    let assistant = assistant_with(calendar.clone());

    let reply = assistant.respond(&authenticated_session(), "calendar").await;

    assert!(reply.contains("Today's Schedule"));
    assert_eq!(calendar.calls().await, vec![CalendarCall::Today]);
}

#[tokio::test]
async fn gateway_failure_is_rendered_as_a_calendar_error() {
    let calendar = Arc::new(FakeCalendar {
        fail_with: Some("boom".to_string()),
        ..FakeCalendar::default()
    });
    let assistant = assistant_with(calendar.clone());

    let reply = assistant
        .respond(&authenticated_session(), "what's on today")
        .await;

    assert_eq!(reply, "❌ **Calendar Error:** boom");
}
