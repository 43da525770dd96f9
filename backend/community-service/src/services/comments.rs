/// Comment service - serves a post's comments as two-level threads
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::ForumStore;
use crate::error::{AppError, Result};
use crate::metrics::feed::COMMENT_THREAD_DROPPED_TOTAL;
use crate::models::{Comment, CommentThread, ContentType, ModerationRecord};
use crate::services::moderation::ModerationFilter;
use crate::services::threading::thread_comments_with_report;

pub struct CommentService {
    store: Arc<dyn ForumStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self { store }
    }

    /// Threaded, moderation-filtered comments for a post
    pub async fn get_thread(&self, post_id: Uuid) -> Result<CommentThread> {
        if self.store.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }

        let (comments, records) = tokio::try_join!(
            self.store.list_comments(post_id),
            self.store.moderation_records(ContentType::Comment),
        )?;

        Ok(self.assemble(post_id, comments, &records))
    }

    /// Thread a comment set pushed by the caller, hiding rejected comments.
    pub async fn assemble_snapshot(
        &self,
        post_id: Uuid,
        comments: Vec<Comment>,
    ) -> Result<CommentThread> {
        let records = self.store.moderation_records(ContentType::Comment).await?;
        Ok(self.assemble(post_id, comments, &records))
    }

    /// Thread an already-fetched comment set.
    pub fn assemble(
        &self,
        post_id: Uuid,
        comments: Vec<Comment>,
        moderation: &[ModerationRecord],
    ) -> CommentThread {
        let filter = ModerationFilter::from_records(ContentType::Comment, moderation);
        if filter.rejected_count() > 0 {
            debug!(
                "Hiding up to {} rejected comments on post {}",
                filter.rejected_count(),
                post_id
            );
        }
        let visible = filter.visible_comments(comments);
        let (threads, report) = thread_comments_with_report(&visible);

        if report.dropped > 0 {
            warn!(
                "Dropped {} unthreadable replies on post {}",
                report.dropped, post_id
            );
            COMMENT_THREAD_DROPPED_TOTAL
                .with_label_values(&["unresolved_parent"])
                .inc_by(report.dropped as u64);
        }

        debug!(
            "Comment thread for post {}: {} top-level, {} replies",
            post_id, report.top_level, report.replies
        );

        CommentThread {
            post_id,
            comments: threads,
            total_count: report.top_level + report.replies,
        }
    }
}
