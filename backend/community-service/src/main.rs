use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use community_service::db::{ForumStore, MemoryStore};
use community_service::handlers::{
    self, comments::CommentHandlerState, feed::FeedHandlerState, realtime::RealtimeHandlerState,
};
use community_service::realtime::RealtimeHub;
use community_service::services::{CommentService, FeedService};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "community-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// Community Service
///
/// Serves the DadSpace forum feed (hot/new/top) and two-level comment
/// threads over an injected data-access store.
///
/// # Routes
///
/// - `/api/v1/feed` - Ranked, paged posts
/// - `/api/v1/feed/sorts` - Sort controls with their labels
/// - `/api/v1/posts/{post_id}/comments` - Threaded comments of a post
/// - `/api/v1/realtime/events` - Change notifications that trigger a recompute
/// - `/metrics` - Prometheus metrics
///
/// # Deployment
///
/// Runs on port 8085 (configurable via COMMUNITY_SERVICE_PORT env var).
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match community_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting community-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store = match &config.store.snapshot_path {
        Some(path) => MemoryStore::load(path).map_err(|e| {
            tracing::error!("Forum snapshot loading failed: {:#}", e);
            io::Error::new(io::ErrorKind::Other, format!("{:#}", e))
        })?,
        None => {
            tracing::warn!("FORUM_SNAPSHOT_PATH not set; starting with an empty store");
            MemoryStore::new()
        }
    };
    let store: Arc<dyn ForumStore> = Arc::new(store);

    let feed = Arc::new(FeedService::new(store.clone(), config.feed.clone()));
    let comments = Arc::new(CommentService::new(store.clone()));
    let hub = Arc::new(RealtimeHub::new(
        feed.clone(),
        comments.clone(),
        config.realtime.channel_capacity,
    ));

    let feed_state = web::Data::new(FeedHandlerState { feed });
    let comment_state = web::Data::new(CommentHandlerState { comments });
    let realtime_state = web::Data::new(RealtimeHandlerState { hub });

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(feed_state.clone())
            .app_data(comment_state.clone())
            .app_data(realtime_state.clone())
            .configure(handlers::configure_extractors)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(community_service::metrics::serve_metrics),
            )
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
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
            )
    })
    .bind(&http_bind_address)?
    .workers(4)
    .run();

    let server_handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("Community-service shutting down");
    Ok(())
}
