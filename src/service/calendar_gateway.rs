use chrono::{DateTime, Utc};
use serenity::async_trait;

use crate::clients::google_calendar::{CalendarStatus, GatewayError, GoogleCalendarClient};
use crate::models::event::CalendarEvent;

/// Contract the assistant holds against the calendar provider. Tests
/// substitute a fake; production wires in the Google client.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    async fn authenticate(&self) -> Result<String, GatewayError>;
    async fn get_todays_events(&self) -> Result<Vec<CalendarEvent>, GatewayError>;
    async fn get_weekly_events(&self) -> Result<Vec<CalendarEvent>, GatewayError>;
    async fn get_events_for_date(&self, date: &str) -> Result<Vec<CalendarEvent>, GatewayError>;
    async fn get_upcoming_events(
        &self,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError>;
    async fn search_events(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError>;
    async fn check_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError>;
    async fn get_next_free_slot(
        &self,
        duration_minutes: i64,
    ) -> Result<Option<DateTime<Utc>>, GatewayError>;
    async fn get_calendar_status(&self) -> CalendarStatus;
}

#[async_trait]
impl CalendarGateway for GoogleCalendarClient {
    async fn authenticate(&self) -> Result<String, GatewayError> {
        GoogleCalendarClient::authenticate(self).await
    }

    async fn get_todays_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        GoogleCalendarClient::get_todays_events(self).await
    }

    async fn get_weekly_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        GoogleCalendarClient::get_weekly_events(self).await
    }

    async fn get_events_for_date(&self, date: &str) -> Result<Vec<CalendarEvent>, GatewayError> {
        GoogleCalendarClient::get_events_for_date(self, date).await
    }

    async fn get_upcoming_events(
        &self,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        GoogleCalendarClient::get_upcoming_events(self, max_results).await
    }

    async fn search_events(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        GoogleCalendarClient::search_events(self, query, max_results).await
    }

    async fn check_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError> {
        GoogleCalendarClient::check_availability(self, start, end).await
    }

    async fn get_next_free_slot(
        &self,
        duration_minutes: i64,
    ) -> Result<Option<DateTime<Utc>>, GatewayError> {
        GoogleCalendarClient::get_next_free_slot(self, duration_minutes).await
    }

    async fn get_calendar_status(&self) -> CalendarStatus {
        GoogleCalendarClient::get_calendar_status(self).await
    }
}
