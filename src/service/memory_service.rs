use std::sync::Arc;

use crate::clients::google_calendar::GatewayError;
use crate::service::formatting::format_memory_lines;
use crate::service::memory_gateway::MemoryGateway;

/// Minimum similarity a search hit needs to be surfaced.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;
const RECALL_LIMIT: usize = 10;
const SEARCH_LIMIT: usize = 5;
/// Stored text must be longer than this many characters.
const MIN_MEMORY_LEN: usize = 5;

const STORE_PREFIXES: [&str; 3] = ["remember that ", "remember i ", "remember to "];
const RECALL_PREFIXES: [&str; 2] = ["recall ", "remember about "];
const SEARCH_PREFIXES: [&str; 2] = ["search memory ", "find in memory "];
const PREFERENCE_PREFIXES: [&str; 3] = ["i prefer ", "i like ", "set preference "];
const CLEAR_COMMANDS: [&str; 3] = ["clear memories", "delete memories", "reset memories"];

const UNKNOWN_MEMORY_COMMAND: &str = "❌ **Unknown Memory Command.** Available commands:
- `remember that...` - Store a memory
- `recall [topic]` - Recall memories about topic
- `search memory [query]` - Search memories
- `update memory <id> <new content>` - Update specific memory
- `delete memory <id>` - Delete specific memory
- `clear memories` - Delete all memories
- `my memories` - Show all memories
- `i prefer...` - Store preference
";

#[derive(Debug)]
pub enum MemoryCommandError {
    /// Memory text too short to be worth storing.
    InvalidInput,
    /// Malformed update/delete command; holds the usage line.
    Usage(&'static str),
    /// The memory store itself failed.
    Gateway(GatewayError),
}

impl From<GatewayError> for MemoryCommandError {
    fn from(err: GatewayError) -> Self {
        MemoryCommandError::Gateway(err)
    }
}

pub struct MemoryService {
    gateway: Arc<dyn MemoryGateway>,
}

impl MemoryService {
    pub fn new(gateway: Arc<dyn MemoryGateway>) -> Self {
        Self { gateway }
    }

    /// Stage-2 memory sub-routing. Matching happens on the lower-cased
    /// trimmed text; stored content is taken from the original-case
    /// input. Sub-checks run in a fixed order; first match wins.
    pub async fn handle(&self, user_id: &str, input: &str) -> Result<String, MemoryCommandError> {
        let original = input.trim();
        let lowered = original.to_lowercase();
        let lower = lowered.as_str();

        for prefix in STORE_PREFIXES {
            if lower.starts_with(prefix) {
                let content = original.get(prefix.len()..).unwrap_or("").trim();
                if content.len() <= MIN_MEMORY_LEN {
                    return Err(MemoryCommandError::InvalidInput);
                }
                return match self
                    .gateway
                    .add_memory(user_id, content, "user_preference")
                    .await
                {
                    Ok(()) => Ok(format!("💾 **Memory Stored:** \"{}\"", content)),
                    Err(e) => Ok(format!("❌ **Memory Error:** {}", e)),
                };
            }
        }

        if lower == "update memory" || lower.starts_with("update memory ") {
            // At most four tokens; the fourth keeps the remainder raw.
            let parts: Vec<&str> = original.splitn(4, ' ').collect();
            if parts.len() < 4 {
                return Err(MemoryCommandError::Usage("update memory <id> <new content>"));
            }
            let memory_id = parts[2];
            let new_content = parts[3];
            return match self.gateway.update_memory(memory_id, new_content).await {
                Ok(()) => Ok(format!("✏️ **Memory Updated:** {}: {}", memory_id, new_content)),
                Err(e) => Ok(format!("❌ **Update Error:** {}", e)),
            };
        }

        if lower == "delete memory" || lower.starts_with("delete memory ") {
            let parts: Vec<&str> = original.splitn(3, ' ').collect();
            if parts.len() < 3 {
                return Err(MemoryCommandError::Usage("delete memory <id>"));
            }
            let memory_id = parts[2];
            return match self.gateway.delete_memory(memory_id).await {
                Ok(()) => Ok(format!("🗑️ **Memory Deleted:** {}", memory_id)),
                Err(e) => Ok(format!("❌ **Delete Error:** {}", e)),
            };
        }

        let recall_prefix = RECALL_PREFIXES.iter().find(|p| lower.starts_with(*p));
        if recall_prefix.is_some() || lower == "what do you remember" || lower == "my memories" {
            let query = recall_prefix
                .map(|p| lower[p.len()..].trim().to_string())
                .filter(|q| q.len() > 1);

            let memories = match &query {
                Some(q) => {
                    self.gateway
                        .search_memories(user_id, q, RECALL_LIMIT, SIMILARITY_THRESHOLD)
                        .await?
                }
                None => self.gateway.get_memories(user_id, RECALL_LIMIT, 0).await?,
            };

            if memories.is_empty() {
                return Ok(match query {
                    Some(q) => format!(
                        "❌ No memories found about '{}' with sufficient similarity (threshold: {}).",
                        q, SIMILARITY_THRESHOLD
                    ),
                    None => {
                        "❌ No memories stored yet. Use 'remember that...' to store memories."
                            .to_string()
                    }
                });
            }

            let header = match &query {
                Some(q) => format!("🔍 **Memories about '{}':**\n\n", q),
                None => "💭 **Your Memories:**\n\n".to_string(),
            };
            return Ok(format!("{}{}", header, format_memory_lines(&memories, true)));
        }

        if let Some(prefix) = SEARCH_PREFIXES.iter().find(|p| lower.starts_with(*p)) {
            let query = lower[prefix.len()..].trim();
            if query.len() <= 1 {
                return Ok(
                    "❌ Please specify what you want to search for in your memories.".to_string(),
                );
            }
            let memories = self
                .gateway
                .search_memories(user_id, query, SEARCH_LIMIT, SIMILARITY_THRESHOLD)
                .await?;
            if memories.is_empty() {
                return Ok(format!(
                    "❌ No memories found for '{}' with sufficient similarity (threshold: {}).",
                    query, SIMILARITY_THRESHOLD
                ));
            }
            return Ok(format!(
                "🔍 **Memory Search Results for '{}':**\n\n{}",
                query,
                format_memory_lines(&memories, false)
            ));
        }

        if CLEAR_COMMANDS.contains(&lower) {
            return match self.gateway.clear_user_memories(user_id).await {
                Ok(()) => Ok("🗑️ **All memories have been cleared.**".to_string()),
                Err(e) => Ok(format!("❌ **Memory Error:** {}", e)),
            };
        }

        if PREFERENCE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            // Preferences keep the whole original text, prefix included.
            return match self.gateway.add_memory(user_id, original, "preference").await {
                Ok(()) => Ok(format!("💾 **Preference Stored:** {}", original)),
                Err(e) => Ok(format!("❌ **Memory Error:** {}", e)),
            };
        }

        Ok(UNKNOWN_MEMORY_COMMAND.to_string())
    }
}
