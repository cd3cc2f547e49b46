use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::json;
use serenity::async_trait;
use tokio::sync::Mutex;

use crate::models::event::{parse_events, CalendarEvent, RawEventList};

pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const SLOT_SEARCH_DAYS: i64 = 7;

/// Free/busy lookups, pulled out as a seam so the slot search can be
/// exercised without the network.
#[async_trait]
pub trait FreeBusyOracle: Send + Sync {
    async fn is_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError>;
}

/// Round `now` up to the first candidate boundary: the same hour at :30
/// when the minute hand is below 30, otherwise the next hour at :00.
pub fn first_candidate(now: DateTime<Utc>) -> DateTime<Utc> {
    let base = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    if base.minute() < 30 {
        base.with_minute(30).unwrap_or(base)
    } else {
        base.with_minute(0).unwrap_or(base) + Duration::hours(1)
    }
}

/// Scan for the first slot of `duration_minutes` reported fully free
/// within the next 7 days. Candidates step by a fixed +1 hour from the
/// rounded start, never by the requested duration; durations over 60
/// minutes therefore probe overlapping windows, and sub-hour-aligned
/// openings are never considered. Callers depend on that stepping.
pub async fn find_next_free_slot(
    now: DateTime<Utc>,
    duration_minutes: i64,
    oracle: &dyn FreeBusyOracle,
) -> Result<Option<DateTime<Utc>>, GatewayError> {
    let horizon = now + Duration::days(SLOT_SEARCH_DAYS);
    let mut candidate = first_candidate(now);

    while candidate < horizon {
        let slot_end = candidate + Duration::minutes(duration_minutes);
        if oracle.is_available(candidate, slot_end).await? {
            return Ok(Some(candidate));
        }
        candidate += Duration::hours(1);
    }

    Ok(None)
}

#[derive(Debug, Clone)]
pub struct CalendarStatus {
    pub authenticated: bool,
    pub calendars_accessible: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: Option<String>,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    calendars: Option<serde_json::Value>,
}

#[derive(Debug, Default)]
struct AuthState {
    access_token: Option<String>,
    authenticated: bool,
}

/// Thin Google Calendar v3 client. OAuth provisioning happens out of
/// band; `authenticate` consumes a token file holding the access token
/// plus optional refresh credentials.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    token_file: PathBuf,
    timezone: Tz,
    auth: Mutex<AuthState>,
}

impl GoogleCalendarClient {
    pub fn new(token_file: impl Into<PathBuf>, timezone: Tz) -> Self {
        GoogleCalendarClient {
            http: reqwest::Client::new(),
            token_file: token_file.into(),
            timezone,
            auth: Mutex::new(AuthState::default()),
        }
    }

    pub async fn authenticated(&self) -> bool {
        self.auth.lock().await.authenticated
    }

    pub async fn authenticate(&self) -> Result<String, GatewayError> {
        let raw = fs::read_to_string(&self.token_file).map_err(|e| {
            format!(
                "Token file '{}' not readable: {}",
                self.token_file.display(),
                e
            )
        })?;
        let stored: StoredToken = serde_json::from_str(&raw)
            .map_err(|e| format!("Token file is not valid JSON: {}", e))?;

        let access_token = match (
            &stored.refresh_token,
            &stored.client_id,
            &stored.client_secret,
        ) {
            (Some(refresh), Some(id), Some(secret)) => {
                self.refresh_access_token(refresh, id, secret).await?
            }
            _ => stored
                .access_token
                .ok_or("Token file has neither an access token nor refresh credentials")?,
        };

        {
            let mut auth = self.auth.lock().await;
            auth.access_token = Some(access_token);
            auth.authenticated = false;
        }

        // Probe the calendar list so a stale token fails here rather
        // than on the first user command.
        let calendars = self.get_calendar_list().await?;
        let mut auth = self.auth.lock().await;
        auth.authenticated = true;
        Ok(format!(
            "Successfully authenticated with Google Calendar ({} calendars accessible)",
            calendars.len()
        ))
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, GatewayError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!("Token refresh failed with status {}: {}", status, text).into());
        }

        let parsed: RefreshResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse token response: {}", e))?;
        Ok(parsed.access_token)
    }

    async fn bearer(&self) -> Result<String, GatewayError> {
        {
            let auth = self.auth.lock().await;
            if auth.authenticated {
                if let Some(token) = &auth.access_token {
                    return Ok(token.clone());
                }
            }
        }
        // Mirror of the lazy re-auth the calendar endpoints perform:
        // a call against an unauthenticated client tries once.
        self.authenticate().await?;
        let auth = self.auth.lock().await;
        auth.access_token
            .clone()
            .ok_or_else(|| "Authentication required".into())
    }

    async fn events_request(
        &self,
        query: &[(&str, String)],
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{}/calendars/primary/events", CALENDAR_API))
            .bearer_auth(token)
            .query(&[
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!("Calendar request failed with status {}: {}", status, text).into());
        }

        let raw: RawEventList = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse events response: {}", e))?;
        Ok(parse_events(raw))
    }

    /// Start of the given local-date day, as a UTC instant.
    fn day_start(&self, date: NaiveDate) -> Result<DateTime<Utc>, GatewayError> {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or("Invalid midnight for date")?;
        let local = midnight
            .and_local_timezone(self.timezone)
            .earliest()
            .ok_or("Date does not exist in the configured timezone")?;
        Ok(local.with_timezone(&Utc))
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub async fn get_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.events_request(&[
            ("timeMin", start.to_rfc3339()),
            ("timeMax", end.to_rfc3339()),
            ("maxResults", max_results.to_string()),
        ])
        .await
    }

    pub async fn get_todays_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        let start = self.day_start(self.today())?;
        self.get_events_in_range(start, start + Duration::days(1), 50)
            .await
    }

    pub async fn get_weekly_events(&self) -> Result<Vec<CalendarEvent>, GatewayError> {
        let start = self.day_start(self.today())?;
        self.get_events_in_range(start, start + Duration::days(7), 100)
            .await
    }

    pub async fn get_events_for_date(
        &self,
        date: &str,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| "Invalid date format. Please use YYYY-MM-DD")?;
        let start = self.day_start(parsed)?;
        self.get_events_in_range(start, start + Duration::days(1), 50)
            .await
    }

    pub async fn get_upcoming_events(
        &self,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.events_request(&[
            ("timeMin", Utc::now().to_rfc3339()),
            ("maxResults", max_results.to_string()),
        ])
        .await
    }

    pub async fn search_events(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        self.events_request(&[
            ("timeMin", Utc::now().to_rfc3339()),
            ("maxResults", max_results.to_string()),
            ("q", query.to_string()),
        ])
        .await
    }

    pub async fn check_availability(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError> {
        let token = self.bearer().await?;
        let body = json!({
            "timeMin": start.to_rfc3339(),
            "timeMax": end.to_rfc3339(),
            "items": [{"id": "primary"}],
        });

        let response = self
            .http
            .post(format!("{}/freeBusy", CALENDAR_API))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!(
                "Free/busy request failed with status {}: {}",
                status, text
            )
            .into());
        }

        let parsed: FreeBusyResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse free/busy response: {}", e))?;
        let busy_count = parsed
            .calendars
            .as_ref()
            .and_then(|c| c.get("primary"))
            .and_then(|p| p.get("busy"))
            .and_then(|b| b.as_array())
            .map(|slots| slots.len())
            .unwrap_or(0);

        Ok(busy_count == 0)
    }

    pub async fn get_next_free_slot(
        &self,
        duration_minutes: i64,
    ) -> Result<Option<DateTime<Utc>>, GatewayError> {
        find_next_free_slot(Utc::now(), duration_minutes, self).await
    }

    pub async fn get_calendar_list(&self) -> Result<Vec<serde_json::Value>, GatewayError> {
        let token = {
            let auth = self.auth.lock().await;
            auth.access_token
                .clone()
                .ok_or("Authentication required")?
        };
        let response = self
            .http
            .get(format!("{}/users/me/calendarList", CALENDAR_API))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!(
                "Calendar list request failed with status {}: {}",
                status, text
            )
            .into());
        }

        let parsed: CalendarListResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse calendar list: {}", e))?;
        Ok(parsed.items)
    }

    pub async fn get_calendar_status(&self) -> CalendarStatus {
        let authenticated = self.authenticated().await;
        if !authenticated {
            return CalendarStatus {
                authenticated: false,
                calendars_accessible: false,
                message: "Calendar not authenticated".to_string(),
            };
        }
        match self.get_calendar_list().await {
            Ok(calendars) => CalendarStatus {
                authenticated: true,
                calendars_accessible: !calendars.is_empty(),
                message: "Calendar connected successfully".to_string(),
            },
            Err(e) => CalendarStatus {
                authenticated: true,
                calendars_accessible: false,
                message: format!("Calendar connection error: {}", e),
            },
        }
    }
}

#[async_trait]
impl FreeBusyOracle for GoogleCalendarClient {
    async fn is_available(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, GatewayError> {
        self.check_availability(start, end).await
    }
}
