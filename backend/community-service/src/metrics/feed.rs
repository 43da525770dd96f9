use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Duration of feed requests by applied sort (hot, new, top, unranked).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed request duration segmented by sort strategy",
        &["sort"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total feed requests processed by applied sort.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed requests segmented by sort strategy",
        &["sort"]
    )
    .expect("failed to register feed_request_total");

    /// Posts ranked per request after moderation filtering.
    pub static ref FEED_CANDIDATE_COUNT: HistogramVec = register_histogram_vec!(
        "feed_candidate_count",
        "Number of posts ranked per feed request segmented by sort strategy",
        &["sort"]
    )
    .expect("failed to register feed_candidate_count");

    /// Replies dropped while threading (orphaned or nested too deep).
    pub static ref COMMENT_THREAD_DROPPED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "comment_thread_dropped_total",
        "Comments dropped while assembling threads segmented by reason",
        &["reason"]
    )
    .expect("failed to register comment_thread_dropped_total");

    /// Recomputed views broadcast by the realtime hub.
    pub static ref REALTIME_UPDATES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "realtime_updates_total",
        "Realtime view recomputations segmented by update kind and outcome",
        &["kind", "result"]
    )
    .expect("failed to register realtime_updates_total");
}

/// Label for the sort actually applied; unknown preferences rank as-is.
pub fn sort_label(sort: Option<crate::services::ranking::SortOption>) -> &'static str {
    sort.map(|s| s.as_str()).unwrap_or("unranked")
}
