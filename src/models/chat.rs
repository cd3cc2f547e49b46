use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of turns shown when rendering a transcript.
pub const RENDERED_TURNS: usize = 20;

pub const DEFAULT_USER_ID: &str = "student_001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        ChatTurn {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-surface conversation state. Turns are append-only; the transcript
/// is only ever reset wholesale via `clear_history`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub calendar_authenticated: bool,
    history: Vec<ChatTurn>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            calendar_authenticated: false,
            history: Vec::new(),
        }
    }

    pub fn push_turn(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.history.push(ChatTurn::new(speaker, text));
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The tail of the transcript that a surface should actually render.
    pub fn rendered_history(&self) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(RENDERED_TURNS);
        &self.history[start..]
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(DEFAULT_USER_ID)
    }
}
