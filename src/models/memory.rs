use serde::{Deserialize, Serialize};

/// A single record from the memory store. Owned by the gateway; the
/// assistant only re-displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    #[serde(rename = "memory")]
    pub content: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Similarity score in [0, 1]; present only on search results.
    #[serde(default)]
    pub score: Option<f64>,
}

impl MemoryRecord {
    pub fn category_suffix(&self) -> String {
        if self.categories.is_empty() {
            String::new()
        } else {
            format!(" *[{}]*", self.categories.join(", "))
        }
    }
}
