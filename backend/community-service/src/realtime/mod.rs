//! Realtime recompute
//!
//! An external subscription (the hosted backend's change feed, a webhook,
//! a test) reports that records changed. The hub re-fetches a fresh snapshot,
//! re-runs ranking or threading, and fans the new view out to subscribers.
//! Nothing is cached between events.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::metrics::feed::REALTIME_UPDATES_TOTAL;
use crate::models::{Comment, CommentThread, ContentType, Post};
use crate::services::ranking::SortOption;
use crate::services::{CommentService, FeedService};

/// Change notification delivered by the external subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A post was created, edited, voted on or removed
    PostsChanged {
        #[serde(default)]
        category: Option<String>,
    },
    /// A comment on `post_id` was created, edited or removed
    CommentsChanged { post_id: Uuid },
    /// A moderator decided on content; `post_id` is the post itself or the
    /// post the comment belongs to
    ModerationChanged {
        content_type: ContentType,
        post_id: Uuid,
    },
}

/// Recomputed view pushed to subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedUpdate {
    Feed {
        category: Option<String>,
        sort: Option<SortOption>,
        posts: Vec<Post>,
    },
    Comments(CommentThread),
}

pub struct RealtimeHub {
    feed: Arc<FeedService>,
    comments: Arc<CommentService>,
    sender: broadcast::Sender<FeedUpdate>,
}

impl RealtimeHub {
    pub fn new(feed: Arc<FeedService>, comments: Arc<CommentService>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            feed,
            comments,
            sender,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.sender.subscribe()
    }

    /// Re-fetch and recompute the view affected by `event`.
    ///
    /// Returns how many subscribers received the update.
    pub async fn handle_change(&self, event: ChangeEvent) -> Result<usize> {
        debug!("Realtime change received: {:?}", event);

        let update = match event {
            ChangeEvent::PostsChanged { category } => self.recompute_feed(category).await?,
            ChangeEvent::CommentsChanged { post_id } => {
                FeedUpdate::Comments(self.comments.get_thread(post_id).await?)
            }
            ChangeEvent::ModerationChanged {
                content_type: ContentType::Post,
                post_id,
            } => {
                let category = self.feed.post_category(post_id).await?;
                self.recompute_feed(category).await?
            }
            ChangeEvent::ModerationChanged {
                content_type: ContentType::Comment,
                post_id,
            } => FeedUpdate::Comments(self.comments.get_thread(post_id).await?),
        };

        Ok(self.publish(update))
    }

    /// Rank a post set pushed directly by the caller.
    ///
    /// Moderation still applies: rejected posts are dropped before ranking.
    pub async fn apply_posts_snapshot(
        &self,
        category: Option<String>,
        posts: Vec<Post>,
    ) -> Result<usize> {
        let (ranked, sort) = self.feed.rank_snapshot(posts).await?;
        Ok(self.publish(FeedUpdate::Feed {
            category,
            sort: Some(sort),
            posts: ranked,
        }))
    }

    /// Thread a comment set pushed directly by the caller.
    pub async fn apply_comments_snapshot(
        &self,
        post_id: Uuid,
        comments: Vec<Comment>,
    ) -> Result<usize> {
        let thread = self.comments.assemble_snapshot(post_id, comments).await?;
        Ok(self.publish(FeedUpdate::Comments(thread)))
    }

    async fn recompute_feed(&self, category: Option<String>) -> Result<FeedUpdate> {
        let (posts, sort) = self
            .feed
            .ranked_posts(category.clone(), None, Utc::now())
            .await?;
        Ok(FeedUpdate::Feed {
            category,
            sort,
            posts,
        })
    }

    fn publish(&self, update: FeedUpdate) -> usize {
        let kind = match &update {
            FeedUpdate::Feed { .. } => "feed",
            FeedUpdate::Comments(_) => "comments",
        };

        match self.sender.send(update) {
            Ok(receivers) => {
                info!("Broadcast {} update to {} subscribers", kind, receivers);
                REALTIME_UPDATES_TOTAL
                    .with_label_values(&[kind, "sent"])
                    .inc();
                receivers
            }
            Err(_) => {
                debug!("No subscribers for {} update", kind);
                REALTIME_UPDATES_TOTAL
                    .with_label_values(&[kind, "no_subscribers"])
                    .inc();
                0
            }
        }
    }
}
