/// Community Service Library
///
/// Serves the DadSpace forum feed and comment threads. The ranking and
/// threading cores are pure functions; everything around them (data access,
/// realtime recompute, HTTP) receives its collaborators explicitly.
///
/// # Modules
///
/// - `services`: Feed ranking, comment threading, moderation filter and the
///   orchestrating feed/comment services
/// - `models`: Posts, comments, moderation records and response shapes
/// - `db`: The `ForumStore` data-access seam and its in-memory implementation
/// - `realtime`: Recomputes views when an external subscription reports a change
/// - `handlers`: HTTP request handlers
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod realtime;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::ranking::{rank_posts, SortOption};
pub use services::threading::thread_comments;
