use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::event::CalendarEvent;
use crate::models::memory::MemoryRecord;

/// One-way, human-facing rendering of an event list. The empty-list
/// string is load-bearing for callers and tests.
pub fn format_events_for_display(events: &[CalendarEvent], tz: Tz) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let mut lines = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let time_str = if event.is_all_day {
            "All day".to_string()
        } else {
            event.start.with_timezone(&tz).format("%I:%M %p").to_string()
        };

        let mut line = format!("{}. **{}** - {}", i + 1, event.title, time_str);
        if !event.location.is_empty() {
            line.push_str(&format!(" (📍 {})", event.location));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Weekly view: events grouped per local day, each day a header plus
/// time-ordered bullet lines.
pub fn format_weekly_schedule(events: &[CalendarEvent], tz: Tz) -> String {
    if events.is_empty() {
        return "No events scheduled for this week.".to_string();
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in events {
        let day = event.start.with_timezone(&tz).date_naive();
        by_day.entry(day).or_default().push(event);
    }

    let mut lines = Vec::new();
    for (_, day_events) in &mut by_day {
        day_events.sort_by_key(|event| event.start);
        let local = day_events[0].start.with_timezone(&tz);
        lines.push(format!("**{}:**", local.format("%A, %B %d")));
        for event in day_events.iter() {
            let time_str = event.start.with_timezone(&tz).format("%I:%M %p");
            lines.push(format!("  • {} - {}", time_str, event.title));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// `id`: content lines for recall/search output, optionally tagged with
/// the record's categories.
pub fn format_memory_lines(records: &[MemoryRecord], with_categories: bool) -> String {
    let mut out = String::new();
    for record in records {
        let suffix = if with_categories {
            record.category_suffix()
        } else {
            String::new()
        };
        out.push_str(&format!("`{}`: {}{}\n", record.id, record.content, suffix));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::UTC;

    fn event(title: &str, start: chrono::DateTime<Utc>, all_day: bool, location: &str) -> CalendarEvent {
        CalendarEvent {
            id: "e".to_string(),
            title: title.to_string(),
            description: String::new(),
            start_time: start.to_rfc3339(),
            end_time: start.to_rfc3339(),
            start,
            end: start + chrono::Duration::hours(1),
            location: location.to_string(),
            attendees: vec![],
            organizer: String::new(),
            status: "confirmed".to_string(),
            is_all_day: all_day,
        }
    }

    #[test]
    fn empty_list_renders_fixed_string() {
        assert_eq!(format_events_for_display(&[], UTC), "No events found.");
    }

    #[test]
    fn all_day_events_render_all_day_instead_of_a_clock_time() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let events = vec![
            event("Holiday", start, true, ""),
            event("Standup", Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(), false, "Room 4"),
        ];

        let output = format_events_for_display(&events, UTC);
        assert!(output.contains("1. **Holiday** - All day"));
        assert!(output.contains("2. **Standup** - 09:30 AM (📍 Room 4)"));
    }

    #[test]
    fn weekly_schedule_groups_by_day() {
        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        let events = vec![
            event("Review", tuesday, false, ""),
            event("Planning", monday, false, ""),
        ];

        let output = format_weekly_schedule(&events, UTC);
        let monday_pos = output.find("Monday, March 02").unwrap();
        let tuesday_pos = output.find("Tuesday, March 03").unwrap();
        assert!(monday_pos < tuesday_pos);
        assert!(output.contains("  • 02:00 PM - Planning"));
    }

    #[test]
    fn memory_lines_include_ids_and_categories() {
        let records = vec![MemoryRecord {
            id: "m1".to_string(),
            content: "prefers tea".to_string(),
            categories: vec!["preference".to_string()],
            score: None,
        }];
        let with = format_memory_lines(&records, true);
        assert!(with.contains("`m1`: prefers tea *[preference]*"));
        let without = format_memory_lines(&records, false);
        assert!(without.contains("`m1`: prefers tea\n"));
        assert!(!without.contains("*[preference]*"));
    }
}
