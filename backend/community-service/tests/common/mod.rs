//! Shared fixtures for community-service integration tests
//!
//! Builds an in-memory forum and the same route table the binary serves.
#![allow(dead_code)]

use actix_web::web;
use chrono::{DateTime, Duration, Utc};
use community_service::config::FeedConfig;
use community_service::db::{ForumSnapshot, ForumStore, MemoryStore};
use community_service::handlers::{
    self, comments::CommentHandlerState, feed::FeedHandlerState, realtime::RealtimeHandlerState,
};
use community_service::models::{Comment, Post};
use community_service::realtime::RealtimeHub;
use community_service::services::{CommentService, FeedService};
use std::sync::Arc;
use uuid::Uuid;

pub struct TestForum {
    pub store: Arc<MemoryStore>,
    pub hub: Arc<RealtimeHub>,
    pub feed_state: web::Data<FeedHandlerState>,
    pub comment_state: web::Data<CommentHandlerState>,
    pub realtime_state: web::Data<RealtimeHandlerState>,
}

impl TestForum {
    pub fn new(snapshot: ForumSnapshot) -> Self {
        let store = Arc::new(MemoryStore::from_snapshot(snapshot));
        let dyn_store: Arc<dyn ForumStore> = store.clone();
        let feed = Arc::new(FeedService::new(dyn_store.clone(), FeedConfig::default()));
        let comments = Arc::new(CommentService::new(dyn_store));
        let hub = Arc::new(RealtimeHub::new(feed.clone(), comments.clone(), 16));

        Self {
            store,
            hub: hub.clone(),
            feed_state: web::Data::new(FeedHandlerState { feed }),
            comment_state: web::Data::new(CommentHandlerState { comments }),
            realtime_state: web::Data::new(RealtimeHandlerState { hub }),
        }
    }

    /// Route table mirroring `main.rs`
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.feed_state.clone())
            .app_data(self.comment_state.clone())
            .app_data(self.realtime_state.clone())
            .configure(handlers::configure_extractors)
            .service(
                web::scope("/api/v1")
                    .route("/feed", web::get().to(handlers::get_feed))
                    .route("/feed/sorts", web::get().to(handlers::list_sort_options))
                    .route(
                        "/posts/{post_id}/comments",
                        web::get().to(handlers::get_post_comments),
                    )
                    .route(
                        "/realtime/events",
                        web::post().to(handlers::post_change_event),
                    ),
            );
    }
}

pub fn post_aged(title: &str, votes: Option<i64>, age: Duration, now: DateTime<Utc>) -> Post {
    Post {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: format!("{} content", title),
        author: Some("test-user".to_string()),
        category: Some("parenting".to_string()),
        slug: Some(title.to_lowercase()),
        votes,
        created_at: now - age,
    }
}

pub fn comment_on(post_id: Uuid, parent_id: Option<Uuid>, content: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        post_id,
        parent_id,
        author: Some("test-user".to_string()),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}
