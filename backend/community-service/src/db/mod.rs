/// Data access layer
///
/// This module provides:
/// - `ForumStore`: the narrow query interface the services consume
/// - `MemoryStore`: an in-memory implementation seeded from a JSON snapshot
///
/// Services receive the store as an injected `Arc<dyn ForumStore>`; nothing
/// reaches a backend client through global state.
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, ContentType, ModerationRecord, Post};

pub mod memory_store;

pub use memory_store::{ForumSnapshot, MemoryStore};

/// Read-side queries over forum records. Results are flat and unordered.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Posts, optionally restricted to a category slug.
    async fn list_posts(&self, category: Option<String>) -> Result<Vec<Post>>;

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Every comment on a post, top-level and replies alike.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    async fn moderation_records(&self, content_type: ContentType) -> Result<Vec<ModerationRecord>>;
}
