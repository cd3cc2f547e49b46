pub mod google_calendar;
pub mod mem0_client;
