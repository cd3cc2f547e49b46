use std::collections::HashMap;
use std::env;
use std::fs;

use chrono_tz::Tz;

pub const DEFAULT_RUN_MODE: &str = "cli";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// KEY=VALUE configuration, loaded from an optional CONFIG_FILE with
/// the process environment as fallback for any missing key.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn load() -> Self {
        match env::var("CONFIG_FILE") {
            Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
            Err(_) => AppConfig::default(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, String> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    /// Config-file value first, environment second.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    pub fn run_mode(&self) -> String {
        self.get("RUN_MODE")
            .unwrap_or_else(|| DEFAULT_RUN_MODE.to_string())
    }

    pub fn user_id(&self) -> String {
        self.get("USER_ID")
            .unwrap_or_else(|| crate::models::chat::DEFAULT_USER_ID.to_string())
    }

    pub fn token_file(&self) -> String {
        self.get("GOOGLE_TOKEN_FILE")
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string())
    }

    /// Falls back to the default zone when the configured name is bad;
    /// a typo in USER_TIMEZONE should not take the assistant down.
    pub fn timezone(&self) -> Tz {
        let name = self
            .get("USER_TIMEZONE")
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        name.parse().unwrap_or_else(|_| {
            eprintln!("Unknown timezone '{}', using {}", name, DEFAULT_TIMEZONE);
            DEFAULT_TIMEZONE.parse().unwrap_or(chrono_tz::UTC)
        })
    }
}
