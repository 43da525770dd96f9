/// Moderation filter - hides content a moderator rejected
///
/// Pending and unmoderated content stays visible; only `rejected` is removed.
/// Filtering happens before ranking/threading so those stay permutation-only.
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{Comment, ContentType, ModerationRecord, ModerationStatus, Post};

/// Ids rejected for one content type
#[derive(Debug, Clone, Default)]
pub struct ModerationFilter {
    rejected: HashSet<Uuid>,
}

impl ModerationFilter {
    /// Build a filter from moderation records. Records for other content
    /// types are ignored; the last record for an id wins.
    pub fn from_records(content_type: ContentType, records: &[ModerationRecord]) -> Self {
        let mut rejected = HashSet::new();
        for record in records.iter().filter(|r| r.content_type == content_type) {
            if record.status == ModerationStatus::Rejected {
                rejected.insert(record.content_id);
            } else {
                rejected.remove(&record.content_id);
            }
        }
        Self { rejected }
    }

    pub fn is_visible(&self, content_id: &Uuid) -> bool {
        !self.rejected.contains(content_id)
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn visible_posts(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.is_visible(&p.id)).collect()
    }

    /// Rejected top-level comments take their replies with them once threaded.
    pub fn visible_comments(&self, comments: Vec<Comment>) -> Vec<Comment> {
        comments
            .into_iter()
            .filter(|c| self.is_visible(&c.id))
            .collect()
    }
}
