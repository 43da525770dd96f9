/// Business logic layer for community-service
///
/// This module provides:
/// - Ranking: hot/new/top ordering of posts (pure)
/// - Threading: flat comments to two-level threads (pure)
/// - Moderation: hides rejected content before ranking/threading
/// - Feed / comment services: orchestration over an injected `ForumStore`
pub mod comments;
pub mod feed;
pub mod moderation;
pub mod ranking;
pub mod threading;

// Re-export commonly used services
pub use comments::CommentService;
pub use feed::{FeedQuery, FeedService};
pub use moderation::ModerationFilter;
pub use ranking::{rank_by_preference, rank_posts, rank_posts_now, Rankable, SortOption};
pub use threading::{thread_comments, thread_comments_with_report, Threadable, ThreadingReport};
