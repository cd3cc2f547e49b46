use serde::Deserialize;
use serde_json::json;

use crate::clients::google_calendar::GatewayError;
use crate::models::memory::MemoryRecord;

const MEM0_API: &str = "https://api.mem0.ai";

/// Keep only hits whose similarity score meets the threshold. The
/// platform applies the limit before this runs, so the surfaced count
/// can be smaller than what was requested.
pub fn filter_by_score(records: Vec<MemoryRecord>, threshold: f64) -> Vec<MemoryRecord> {
    records
        .into_iter()
        .filter(|record| record.score.unwrap_or(0.0) >= threshold)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MemoryListResponse {
    Wrapped { results: Vec<MemoryRecord> },
    Bare(Vec<MemoryRecord>),
}

impl MemoryListResponse {
    fn into_records(self) -> Vec<MemoryRecord> {
        match self {
            MemoryListResponse::Wrapped { results } => results,
            MemoryListResponse::Bare(records) => records,
        }
    }
}

/// Client for the managed mem0 memory platform.
pub struct Mem0Client {
    http: reqwest::Client,
    api_key: String,
}

impl Mem0Client {
    pub fn new(api_key: String) -> Self {
        Mem0Client {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn read_body(response: reqwest::Response, what: &str) -> Result<String, GatewayError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(format!("{} failed with status {}: {}", what, status, text).into());
        }
        Ok(text)
    }

    pub async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        category: &str,
    ) -> Result<(), GatewayError> {
        let body = json!({
            "messages": [{"role": "user", "content": text}],
            "user_id": user_id,
            "metadata": {"category": category},
        });
        let response = self
            .http
            .post(format!("{}/v1/memories/", MEM0_API))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        Self::read_body(response, "Memory add").await?;
        Ok(())
    }

    pub async fn get_memories(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        let body = json!({
            "filters": {"AND": [{"user_id": user_id}]},
            "limit": limit,
            "offset": offset,
        });
        let response = self
            .http
            .post(format!("{}/v2/memories/", MEM0_API))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        let text = Self::read_body(response, "Memory list").await?;
        let parsed: MemoryListResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse memory list: {}", e))?;
        Ok(parsed.into_records())
    }

    pub async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        let body = json!({
            "query": query,
            "filters": {"OR": [{"user_id": user_id}]},
            "limit": limit,
        });
        let response = self
            .http
            .post(format!("{}/v2/memories/search/", MEM0_API))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        let text = Self::read_body(response, "Memory search").await?;
        let parsed: MemoryListResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse search response: {}", e))?;
        Ok(filter_by_score(parsed.into_records(), threshold))
    }

    pub async fn update_memory(&self, memory_id: &str, text: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .put(format!("{}/v1/memories/{}/", MEM0_API, memory_id))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&json!({"text": text}))
            .send()
            .await?;
        Self::read_body(response, "Memory update").await?;
        Ok(())
    }

    pub async fn delete_memory(&self, memory_id: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .delete(format!("{}/v1/memories/{}/", MEM0_API, memory_id))
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await?;
        Self::read_body(response, "Memory delete").await?;
        Ok(())
    }

    pub async fn clear_user_memories(&self, user_id: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .delete(format!("{}/v1/memories/", MEM0_API))
            .header("Authorization", format!("Token {}", self.api_key))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        Self::read_body(response, "Memory clear").await?;
        Ok(())
    }
}
