use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::db::ForumStore;
use crate::error::{AppError, Result};
use crate::metrics::feed::{
    sort_label, FEED_CANDIDATE_COUNT, FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL,
};
use crate::models::{ContentType, FeedPage, ModerationRecord, Post};
use crate::services::moderation::ModerationFilter;
use crate::services::ranking::{rank_by_preference, rank_posts, rank_posts_now, SortOption};

/// Feed request as received from a client
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    /// Raw sort preference; `None` falls back to the configured default
    pub sort: Option<String>,
    /// Category slug; `None` or `"all"` means every category
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

pub fn decode_cursor(cursor: Option<&str>) -> Result<usize> {
    match cursor {
        Some(cursor) => {
            let decoded = general_purpose::STANDARD
                .decode(cursor)
                .map_err(|_| AppError::BadRequest("Invalid cursor format".to_string()))?;

            let offset_str = String::from_utf8(decoded)
                .map_err(|_| AppError::BadRequest("Invalid cursor encoding".to_string()))?;

            offset_str
                .parse::<usize>()
                .map_err(|_| AppError::BadRequest("Invalid cursor value".to_string()))
        }
        None => Ok(0),
    }
}

pub fn encode_cursor(offset: usize) -> String {
    general_purpose::STANDARD.encode(offset.to_string())
}

/// Ranks and pages the forum feed on top of an injected store.
pub struct FeedService {
    store: Arc<dyn ForumStore>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(store: Arc<dyn ForumStore>, config: FeedConfig) -> Self {
        Self { store, config }
    }

    pub fn default_sort(&self) -> SortOption {
        self.config.default_sort
    }

    pub async fn get_feed(&self, query: &FeedQuery) -> Result<FeedPage> {
        self.get_feed_at(query, Utc::now()).await
    }

    /// Serve one feed page with hot scores evaluated at `now`.
    pub async fn get_feed_at(&self, query: &FeedQuery, now: DateTime<Utc>) -> Result<FeedPage> {
        let start = Instant::now();
        let offset = decode_cursor(query.cursor.as_deref())?;
        let limit = query
            .limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size.max(1));

        let (ranked, sort) = self
            .ranked_posts(query.category.clone(), query.sort.as_deref(), now)
            .await?;

        let total_count = ranked.len();
        let start_index = offset.min(total_count);
        let end = (start_index + limit).min(total_count);
        let posts: Vec<Post> = ranked[start_index..end].to_vec();
        let has_more = end < total_count;

        let cursor = if has_more && !posts.is_empty() {
            Some(encode_cursor(end))
        } else {
            None
        };

        debug!(
            "Feed page: sort={} category={:?} offset={} limit={} returned={} total={}",
            sort_label(sort),
            query.category,
            offset,
            limit,
            posts.len(),
            total_count
        );

        let label = sort_label(sort);
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());
        FEED_REQUEST_TOTAL.with_label_values(&[label]).inc();
        FEED_CANDIDATE_COUNT
            .with_label_values(&[label])
            .observe(total_count as f64);

        Ok(FeedPage {
            posts,
            cursor,
            has_more,
            total_count,
            sort,
        })
    }

    /// The full visible feed for `category`, ranked by `preference`.
    ///
    /// Returns the strategy applied; `None` means the preference was not
    /// recognised and the store order was kept.
    pub async fn ranked_posts(
        &self,
        category: Option<String>,
        preference: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Post>, Option<SortOption>)> {
        let (posts, records) = tokio::try_join!(
            self.store.list_posts(category),
            self.store.moderation_records(ContentType::Post),
        )?;

        let visible = Self::visible(posts, &records);

        Ok(match preference {
            Some(raw) => rank_by_preference(&visible, raw, now),
            None => {
                let sort = self.config.default_sort;
                (rank_posts(&visible, sort, now), Some(sort))
            }
        })
    }

    /// Rank a post set pushed by the caller with the default sort, after
    /// dropping posts a moderator rejected.
    pub async fn rank_snapshot(&self, posts: Vec<Post>) -> Result<(Vec<Post>, SortOption)> {
        let records = self.store.moderation_records(ContentType::Post).await?;
        let visible = Self::visible(posts, &records);
        let sort = self.config.default_sort;
        Ok((rank_posts_now(&visible, sort), sort))
    }

    /// Category slug of a post; `None` when the post is unknown or uncategorised.
    pub async fn post_category(&self, post_id: Uuid) -> Result<Option<String>> {
        Ok(self
            .store
            .get_post(post_id)
            .await?
            .and_then(|post| post.category))
    }

    fn visible(posts: Vec<Post>, records: &[ModerationRecord]) -> Vec<Post> {
        let filter = ModerationFilter::from_records(ContentType::Post, records);
        if filter.rejected_count() > 0 {
            debug!("Hiding up to {} rejected posts", filter.rejected_count());
        }
        filter.visible_posts(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockForumStore;
    use crate::models::ModerationStatus;
    use chrono::Duration;

    fn create_test_post(title: &str, votes: i64, age_hours: i64, now: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            author: Some("test-user".into()),
            category: Some("parenting".into()),
            slug: None,
            votes: Some(votes),
            created_at: now - Duration::hours(age_hours),
        }
    }

    fn service_with(posts: Vec<Post>, moderation: Vec<ModerationRecord>) -> FeedService {
        let mut store = MockForumStore::new();
        store
            .expect_list_posts()
            .returning(move |_| Ok(posts.clone()));
        store
            .expect_moderation_records()
            .returning(move |_| Ok(moderation.clone()));
        FeedService::new(Arc::new(store), FeedConfig::default())
    }

    fn titles(page: &FeedPage) -> Vec<&str> {
        page.posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_cursor_round_trip() {
        assert_eq!(decode_cursor(Some(&encode_cursor(40))).unwrap(), 40);
        assert_eq!(decode_cursor(None).unwrap(), 0);
    }

    #[test]
    fn test_malformed_cursor_is_bad_request() {
        let err = decode_cursor(Some("%%%not-base64")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let not_a_number = general_purpose::STANDARD.encode("ten");
        let err = decode_cursor(Some(&not_a_number)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_get_feed_ranks_by_requested_sort() {
        let now = Utc::now();
        let posts = vec![
            create_test_post("old", 50, 48, now),
            create_test_post("fresh", 1, 0, now),
            create_test_post("mid", 10, 5, now),
        ];
        let service = service_with(posts, vec![]);

        let query = FeedQuery {
            sort: Some("new".into()),
            ..FeedQuery::default()
        };
        let page = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(titles(&page), vec!["fresh", "mid", "old"]);
        assert_eq!(page.sort, Some(SortOption::New));

        let query = FeedQuery {
            sort: Some("top".into()),
            ..FeedQuery::default()
        };
        let page = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(titles(&page), vec!["old", "mid", "fresh"]);
    }

    #[tokio::test]
    async fn test_missing_sort_uses_default_hot() {
        let now = Utc::now();
        let posts = vec![
            create_test_post("stale-popular", 100, 72, now),
            create_test_post("recent", 10, 1, now),
        ];
        let service = service_with(posts, vec![]);

        let page = service.get_feed_at(&FeedQuery::default(), now).await.unwrap();
        assert_eq!(page.sort, Some(SortOption::Hot));
        assert_eq!(titles(&page), vec!["recent", "stale-popular"]);
    }

    #[tokio::test]
    async fn test_unknown_sort_keeps_store_order() {
        let now = Utc::now();
        let posts = vec![
            create_test_post("first", 1, 10, now),
            create_test_post("second", 99, 1, now),
        ];
        let service = service_with(posts, vec![]);

        let query = FeedQuery {
            sort: Some("spicy".into()),
            ..FeedQuery::default()
        };
        let page = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(page.sort, None);
        assert_eq!(titles(&page), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_rejected_posts_are_excluded() {
        let now = Utc::now();
        let hidden = create_test_post("hidden", 500, 1, now);
        let records = vec![ModerationRecord {
            content_id: hidden.id,
            content_type: ContentType::Post,
            status: ModerationStatus::Rejected,
            moderator_id: None,
            reason: Some("spam".into()),
        }];
        let service = service_with(vec![hidden, create_test_post("shown", 1, 1, now)], records);

        let page = service.get_feed_at(&FeedQuery::default(), now).await.unwrap();
        assert_eq!(titles(&page), vec!["shown"]);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_pagination_walks_the_ranked_feed() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..5)
            .map(|i| create_test_post(&format!("p{}", i), 10 - i, 1, now))
            .collect();
        let service = service_with(posts, vec![]);

        let mut query = FeedQuery {
            sort: Some("top".into()),
            limit: Some(2),
            ..FeedQuery::default()
        };
        let first = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(titles(&first), vec!["p0", "p1"]);
        assert!(first.has_more);
        assert_eq!(first.total_count, 5);

        query.cursor = first.cursor.clone();
        let second = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(titles(&second), vec!["p2", "p3"]);

        query.cursor = second.cursor.clone();
        let last = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(titles(&last), vec!["p4"]);
        assert!(!last.has_more);
        assert!(last.cursor.is_none());
    }

    #[tokio::test]
    async fn test_offset_past_end_returns_empty_page() {
        let now = Utc::now();
        let service = service_with(vec![create_test_post("only", 1, 1, now)], vec![]);

        let query = FeedQuery {
            cursor: Some(encode_cursor(10)),
            ..FeedQuery::default()
        };
        let page = service.get_feed_at(&query, now).await.unwrap();
        assert!(page.posts.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let now = Utc::now();
        let posts: Vec<Post> = (0..3)
            .map(|i| create_test_post(&format!("p{}", i), i, 1, now))
            .collect();
        let service = service_with(posts, vec![]);

        let query = FeedQuery {
            limit: Some(0),
            ..FeedQuery::default()
        };
        let page = service.get_feed_at(&query, now).await.unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockForumStore::new();
        store
            .expect_list_posts()
            .returning(|_| Err(AppError::Store("connection reset".into())));
        store.expect_moderation_records().returning(|_| Ok(vec![]));
        let service = FeedService::new(Arc::new(store), FeedConfig::default());

        let err = service.get_feed(&FeedQuery::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_rank_snapshot_hides_rejected_posts() {
        let now = Utc::now();
        let rejected = create_test_post("rejected", 900, 1, now);
        let kept = create_test_post("kept", 1, 1, now);
        let records = vec![ModerationRecord {
            content_id: rejected.id,
            content_type: ContentType::Post,
            status: ModerationStatus::Rejected,
            moderator_id: None,
            reason: None,
        }];
        let service = service_with(vec![], records);

        let (ranked, sort) = service
            .rank_snapshot(vec![rejected, kept.clone()])
            .await
            .unwrap();
        assert_eq!(sort, SortOption::Hot);
        assert_eq!(ranked, vec![kept]);
    }

    #[tokio::test]
    async fn test_post_category_lookup() {
        let now = Utc::now();
        let post = create_test_post("p", 1, 1, now);
        let known = post.id;
        let mut store = MockForumStore::new();
        store
            .expect_get_post()
            .returning(move |id| Ok((id == known).then(|| post.clone())));
        let service = FeedService::new(Arc::new(store), FeedConfig::default());

        assert_eq!(
            service.post_category(known).await.unwrap(),
            Some("parenting".to_string())
        );
        assert_eq!(service.post_category(Uuid::new_v4()).await.unwrap(), None);
    }
}
