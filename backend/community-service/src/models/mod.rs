/// Data models for community-service
///
/// This module defines structures for:
/// - Post: Forum submissions ranked in the feed
/// - Comment: Replies on a post, optionally under a top-level comment
/// - ThreadedComment: A top-level comment with its direct replies
/// - Moderation records applied before ranking/threading
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::ranking::SortOption;

/// Forum post as supplied by the data-access layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Category slug (e.g. "parenting")
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Net vote score; absent is ranked as 0
    #[serde(default)]
    pub votes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Comment on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Top-level comment this replies to; `None` for a top-level comment
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A top-level comment with the replies attached to it, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadedComment<C> {
    #[serde(flatten)]
    pub comment: C,
    pub replies: Vec<C>,
}

impl<C> ThreadedComment<C> {
    pub fn new(comment: C) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Comment,
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Moderator decision for a single piece of content (one per content id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRecord {
    pub content_id: Uuid,
    pub content_type: ContentType,
    pub status: ModerationStatus,
    #[serde(default)]
    pub moderator_id: Option<Uuid>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// One page of the ranked feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub cursor: Option<String>,
    pub has_more: bool,
    pub total_count: usize,
    /// Strategy actually applied; `None` when the requested one was unknown
    pub sort: Option<SortOption>,
}

pub type FeedResponse = FeedPage;

/// One entry of the feed's sort controls
#[derive(Debug, Clone, Serialize)]
pub struct SortControl {
    pub value: SortOption,
    pub label: &'static str,
    pub label_en: &'static str,
    pub is_default: bool,
}

/// Threaded comments of one post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    pub post_id: Uuid,
    pub comments: Vec<ThreadedComment<Comment>>,
    /// Comments rendered (top-level plus attached replies)
    pub total_count: usize,
}

pub type CommentThreadResponse = CommentThread;
