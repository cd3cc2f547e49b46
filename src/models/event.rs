use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// A parsed calendar event, normalized from the Google Calendar v3 wire
/// shape. Immutable once fetched; lives for one response cycle.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub attendees: Vec<Attendee>,
    pub organizer: String,
    pub status: String,
    pub is_all_day: bool,
}

#[derive(Debug, Clone)]
pub struct Attendee {
    pub email: String,
    pub name: Option<String>,
    pub response_status: Option<String>,
}

// Raw wire shapes as returned by events.list / events.get.

#[derive(Debug, Deserialize)]
pub struct RawEventList {
    #[serde(default)]
    pub items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: RawEventTime,
    pub end: RawEventTime,
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<RawAttendee>,
    pub organizer: Option<RawOrganizer>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEventTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAttendee {
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "responseStatus")]
    pub response_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawOrganizer {
    pub email: Option<String>,
}

impl RawEventTime {
    fn raw(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        if let Some(dt) = &self.date_time {
            return DateTime::parse_from_rfc3339(dt)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc));
        }
        let date = self.date.as_deref()?;
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(parsed.and_hms_opt(0, 0, 0)?.and_utc())
    }
}

impl RawEvent {
    /// Normalize a raw event. Returns None when the start/end fields
    /// cannot be interpreted at all.
    pub fn parse(self) -> Option<CalendarEvent> {
        // All-day is decided by the start field alone; events mixing a
        // date start with a dateTime end are not validated.
        let is_all_day = self.start.date.is_some();
        let start_time = self.start.raw()?.to_string();
        let end_time = self.end.raw()?.to_string();
        let start = self.start.instant()?;
        let end = self.end.instant()?;

        let attendees = self
            .attendees
            .into_iter()
            .filter_map(|a| {
                Some(Attendee {
                    email: a.email?,
                    name: a.display_name,
                    response_status: a.response_status,
                })
            })
            .collect();

        Some(CalendarEvent {
            id: self.id,
            title: self.summary.unwrap_or_else(|| "No Title".to_string()),
            description: self.description.unwrap_or_default(),
            start_time,
            end_time,
            start,
            end,
            location: self.location.unwrap_or_default(),
            attendees,
            organizer: self.organizer.and_then(|o| o.email).unwrap_or_default(),
            status: self.status.unwrap_or_else(|| "confirmed".to_string()),
            is_all_day,
        })
    }
}

/// Parse a full events.list payload, skipping events that cannot be
/// normalized.
pub fn parse_events(raw: RawEventList) -> Vec<CalendarEvent> {
    raw.items
        .into_iter()
        .filter_map(|event| {
            let id = event.id.clone();
            let parsed = event.parse();
            if parsed.is_none() {
                eprintln!("Skipping unparseable event {}", id);
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn raw(json: &str) -> RawEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn timed_event_parses_with_instants() {
        let event = raw(
            r#"{
                "id": "e1",
                "summary": "Standup",
                "start": {"dateTime": "2026-03-02T09:30:00Z"},
                "end": {"dateTime": "2026-03-02T09:45:00Z"},
                "attendees": [{"email": "a@example.com", "responseStatus": "accepted"}],
                "organizer": {"email": "boss@example.com"}
            }"#,
        )
        .parse()
        .unwrap();

        assert!(!event.is_all_day);
        assert_eq!(event.title, "Standup");
        assert_eq!(event.start.hour(), 9);
        assert_eq!(event.attendees.len(), 1);
        assert_eq!(event.organizer, "boss@example.com");
        assert_eq!(event.status, "confirmed");
    }

    #[test]
    fn bare_date_start_marks_all_day() {
        let event = raw(
            r#"{
                "id": "e2",
                "start": {"date": "2026-03-02"},
                "end": {"date": "2026-03-03"}
            }"#,
        )
        .parse()
        .unwrap();

        assert!(event.is_all_day);
        assert_eq!(event.title, "No Title");
        assert_eq!(event.start_time, "2026-03-02");
    }
}
