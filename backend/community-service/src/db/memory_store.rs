use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::ForumStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, ContentType, ModerationRecord, Post};

/// Serialized contents of a [`MemoryStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumSnapshot {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub moderation: Vec<ModerationRecord>,
}

/// In-memory forum records
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<ForumSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ForumSnapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read forum snapshot {}", path.display()))?;
        let snapshot: ForumSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse forum snapshot {}", path.display()))?;

        info!(
            "Loaded forum snapshot from {} ({} posts, {} comments, {} moderation records)",
            path.display(),
            snapshot.posts.len(),
            snapshot.comments.len(),
            snapshot.moderation.len()
        );

        Ok(Self::from_snapshot(snapshot))
    }

    pub async fn snapshot(&self) -> ForumSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn insert_post(&self, post: Post) {
        let mut inner = self.inner.write().await;
        inner.posts.retain(|p| p.id != post.id);
        inner.posts.push(post);
    }

    pub async fn set_votes(&self, post_id: Uuid, votes: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
        post.votes = Some(votes);
        debug!("Post {} now has {} votes", post_id, votes);
        Ok(())
    }

    pub async fn insert_comment(&self, comment: Comment) {
        let mut inner = self.inner.write().await;
        inner.comments.retain(|c| c.id != comment.id);
        inner.comments.push(comment);
    }

    /// Returns whether a comment was removed.
    pub async fn remove_comment(&self, comment_id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.comments.len();
        inner.comments.retain(|c| c.id != comment_id);
        inner.comments.len() < before
    }

    /// One record per content id; a new decision replaces the old one.
    pub async fn upsert_moderation(&self, record: ModerationRecord) {
        let mut inner = self.inner.write().await;
        inner
            .moderation
            .retain(|r| r.content_id != record.content_id);
        inner.moderation.push(record);
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn list_posts(&self, category: Option<String>) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let posts = match category.as_deref() {
            None | Some("all") => inner.posts.clone(),
            Some(slug) => inner
                .posts
                .iter()
                .filter(|p| p.category.as_deref() == Some(slug))
                .cloned()
                .collect(),
        };
        Ok(posts)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn moderation_records(&self, content_type: ContentType) -> Result<Vec<ModerationRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .moderation
            .iter()
            .filter(|r| r.content_type == content_type)
            .cloned()
            .collect())
    }
}
