use serenity::async_trait;

use crate::clients::google_calendar::GatewayError;
use crate::clients::mem0_client::Mem0Client;
use crate::models::memory::MemoryRecord;

/// Contract the assistant holds against the memory store. The search
/// implementation is expected to apply the similarity threshold
/// client-side before returning.
#[async_trait]
pub trait MemoryGateway: Send + Sync {
    async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        category: &str,
    ) -> Result<(), GatewayError>;
    async fn get_memories(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemoryRecord>, GatewayError>;
    async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<MemoryRecord>, GatewayError>;
    async fn update_memory(&self, memory_id: &str, text: &str) -> Result<(), GatewayError>;
    async fn delete_memory(&self, memory_id: &str) -> Result<(), GatewayError>;
    async fn clear_user_memories(&self, user_id: &str) -> Result<(), GatewayError>;
}

#[async_trait]
impl MemoryGateway for Mem0Client {
    async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        category: &str,
    ) -> Result<(), GatewayError> {
        Mem0Client::add_memory(self, user_id, text, category).await
    }

    async fn get_memories(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        Mem0Client::get_memories(self, user_id, limit, offset).await
    }

    async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<MemoryRecord>, GatewayError> {
        Mem0Client::search_memories(self, user_id, query, limit, threshold).await
    }

    async fn update_memory(&self, memory_id: &str, text: &str) -> Result<(), GatewayError> {
        Mem0Client::update_memory(self, memory_id, text).await
    }

    async fn delete_memory(&self, memory_id: &str) -> Result<(), GatewayError> {
        Mem0Client::delete_memory(self, memory_id).await
    }

    async fn clear_user_memories(&self, user_id: &str) -> Result<(), GatewayError> {
        Mem0Client::clear_user_memories(self, user_id).await
    }
}
