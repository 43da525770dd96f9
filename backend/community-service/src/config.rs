/// Configuration management for Community Service
///
/// This module handles loading configuration from environment variables.
/// A `.env` file is honoured by the binary before `from_env` runs.
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::ranking::SortOption;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Feed paging and default ordering
    pub feed: FeedConfig,
    /// Realtime recompute fan-out
    pub realtime: RealtimeConfig,
    /// Seed data for the in-memory store
    pub store: StoreConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Feed configuration (default sort, page limits)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub default_sort: SortOption,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_sort: SortOption::default(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the in-memory store at startup
    pub snapshot_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let feed = FeedConfig {
            default_sort: match std::env::var("FEED_DEFAULT_SORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| {
                        AppError::Config(format!("Failed to parse FEED_DEFAULT_SORT='{}'", raw))
                    })?,
                Err(_) => SortOption::default(),
            },
            default_page_size: parse_env_or_default("FEED_DEFAULT_PAGE_SIZE", default_page_size())?,
            max_page_size: parse_env_or_default("FEED_MAX_PAGE_SIZE", default_max_page_size())?,
        };

        if feed.max_page_size == 0 {
            return Err(AppError::Config(
                "FEED_MAX_PAGE_SIZE must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("COMMUNITY_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("COMMUNITY_SERVICE_PORT", 8085)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err(AppError::Config(
                            "CORS_ALLOWED_ORIGINS must be set in production".to_string(),
                        ))
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err(AppError::Config(
                        "CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string(),
                    ));
                }

                CorsConfig { allowed_origins }
            },
            feed,
            realtime: RealtimeConfig {
                channel_capacity: parse_env_or_default(
                    "REALTIME_CHANNEL_CAPACITY",
                    default_channel_capacity(),
                )?
                .max(1),
            },
            store: StoreConfig {
                snapshot_path: std::env::var("FORUM_SNAPSHOT_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty()),
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| AppError::Config(format!("Failed to parse {}='{}': {}", key, val, e))),
        Err(_) => Ok(default),
    }
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_channel_capacity() -> usize {
    64
}
