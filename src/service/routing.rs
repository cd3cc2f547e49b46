//! Stage-1 domain classification: ordered keyword/prefix matching over
//! the lower-cased, trimmed input. Memory patterns are checked before
//! calendar patterns on purpose; several calendar keywords are ordinary
//! English words, and a sentence mentioning "recall" or "i prefer" must
//! land in the memory handler even when calendar words co-occur.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Memory,
    Calendar,
    Help,
    Greeting,
    Unknown,
}

pub const MEMORY_PATTERNS: [&str; 17] = [
    "remember that",
    "remember i",
    "remember to",
    "recall",
    "remember about",
    "what do you remember",
    "my memories",
    "search memory",
    "find in memory",
    "update memory",
    "delete memory",
    "clear memories",
    "delete memories",
    "reset memories",
    "i prefer",
    "i like",
    "set preference",
];

pub const CALENDAR_PATTERNS: [&str; 19] = [
    "today",
    "today's",
    "todays",
    "week",
    "weekly",
    "this week",
    "upcoming",
    "next events",
    "future events",
    "search",
    "find",
    "available",
    "free",
    "busy",
    "schedule",
    "meeting",
    "event",
    "appointment",
    "calendar",
];

const HELP_COMMANDS: [&str; 3] = ["help", "commands", "what can you do"];

const GREETINGS: [&str; 4] = ["hello", "hi", "hey", "greetings"];

/// Total and deterministic in the normalized text; the caller decides
/// what an Intent::Calendar result may actually do based on auth state.
pub fn classify(text: &str) -> Intent {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();

    if MEMORY_PATTERNS
        .iter()
        .any(|pattern| normalized.starts_with(pattern) || normalized.contains(pattern))
    {
        return Intent::Memory;
    }

    if CALENDAR_PATTERNS
        .iter()
        .any(|pattern| normalized.contains(pattern))
    {
        return Intent::Calendar;
    }

    if HELP_COMMANDS.contains(&normalized) {
        return Intent::Help;
    }

    if GREETINGS.contains(&normalized) {
        return Intent::Greeting;
    }

    Intent::Unknown
}
