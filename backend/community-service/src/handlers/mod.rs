/// HTTP handlers for community endpoints
///
/// This module contains handlers for:
/// - Feed: ranked, paged posts
/// - Comments: two-level comment threads of a post
/// - Realtime: change notifications that trigger a recompute
use actix_web::web;

use crate::error::AppError;

pub mod comments;
pub mod feed;
pub mod realtime;

// Re-export handler functions at module level
pub use comments::get_post_comments;
pub use feed::{get_feed, list_sort_options};
pub use realtime::post_change_event;

/// Extractor configs that render rejected bodies, query strings and path
/// segments in the same JSON error shape as `AppError`.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}
