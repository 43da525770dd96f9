use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{FeedResponse, SortControl};
use crate::services::feed::{FeedQuery, FeedService};
use crate::services::ranking::SortOption;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    /// hot | new | top; anything else keeps the store order
    pub sort: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl From<FeedQueryParams> for FeedQuery {
    fn from(params: FeedQueryParams) -> Self {
        FeedQuery {
            sort: params.sort,
            category: params.category.filter(|c| !c.trim().is_empty()),
            limit: params.limit.map(|l| l as usize),
            cursor: params.cursor,
        }
    }
}

pub struct FeedHandlerState {
    pub feed: Arc<FeedService>,
}

pub async fn get_feed(
    query: web::Query<FeedQueryParams>,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let query: FeedQuery = query.into_inner().into();

    debug!(
        "Feed request: sort={:?} category={:?} limit={:?} cursor={:?}",
        query.sort, query.category, query.limit, query.cursor
    );

    let page: FeedResponse = state.feed.get_feed(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Sort controls offered to readers, default first
pub async fn list_sort_options(state: web::Data<FeedHandlerState>) -> HttpResponse {
    let default_sort = state.feed.default_sort();
    let mut controls: Vec<SortControl> = SortOption::ALL
        .iter()
        .map(|sort| SortControl {
            value: *sort,
            label: sort.label(),
            label_en: sort.label_en(),
            is_default: *sort == default_sort,
        })
        .collect();
    controls.sort_by_key(|c| !c.is_default);

    HttpResponse::Ok().json(controls)
}
