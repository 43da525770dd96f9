//! Feed ranking
//!
//! Orders a snapshot of posts by one of the user-facing sort controls:
//! - `new`: newest first
//! - `top`: highest vote score first (missing votes count as 0)
//! - `hot`: `votes / (age_hours + 2)^1.5`, highest first
//!
//! Ranking only reorders: the output always holds exactly the input posts.
//! Every strategy is a stable sort, so posts with equal keys keep their
//! input order. An unrecognised strategy string yields the input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Post;

/// Hours added to a post's age so brand-new posts don't divide by ~0.
pub const HOT_AGE_OFFSET_HOURS: f64 = 2.0;

/// Exponent applied to the shifted age in the hot score.
pub const HOT_GRAVITY: f64 = 1.5;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Sort control selected by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Hot,
    New,
    Top,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [SortOption::Hot, SortOption::New, SortOption::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
        }
    }

    /// Button label shown by the sort controls
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hot => "Горячие",
            Self::New => "Новые",
            Self::Top => "Лучшие",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::New => "New",
            Self::Top => "Top",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort option '{0}'")]
pub struct UnknownSortOption(pub String);

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(Self::Hot),
            "new" => Ok(Self::New),
            "top" => Ok(Self::Top),
            _ => Err(UnknownSortOption(s.to_string())),
        }
    }
}

/// Anything the feed can rank.
pub trait Rankable {
    fn created_at(&self) -> DateTime<Utc>;

    /// Net vote score; records without one report 0.
    fn vote_score(&self) -> i64;
}

impl Rankable for Post {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn vote_score(&self) -> i64 {
        self.votes.unwrap_or(0)
    }
}

/// Decayed popularity of a post at `now`.
///
/// Posts dated in the future are treated as brand new (age 0), which keeps
/// the denominator at or above `2^1.5`.
pub fn hot_score(votes: i64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_hours = ((now - created_at).num_milliseconds() as f64 / MILLIS_PER_HOUR).max(0.0);
    votes as f64 / (age_hours + HOT_AGE_OFFSET_HOURS).powf(HOT_GRAVITY)
}

/// Rank `posts` by `sort`, evaluating hot scores at `now`.
///
/// The input slice is left untouched; a reordered copy is returned.
pub fn rank_posts<T>(posts: &[T], sort: SortOption, now: DateTime<Utc>) -> Vec<T>
where
    T: Rankable + Clone,
{
    let ranked = match sort {
        SortOption::New => descending_by(posts, |p| p.created_at(), Ord::cmp),
        SortOption::Top => descending_by(posts, |p| p.vote_score(), Ord::cmp),
        SortOption::Hot => descending_by(
            posts,
            |p| hot_score(p.vote_score(), p.created_at(), now),
            |a: &f64, b: &f64| a.total_cmp(b),
        ),
    };

    debug!("Ranked {} posts by {}", ranked.len(), sort);
    ranked
}

/// [`rank_posts`] evaluated at the current system time.
pub fn rank_posts_now<T>(posts: &[T], sort: SortOption) -> Vec<T>
where
    T: Rankable + Clone,
{
    rank_posts(posts, sort, Utc::now())
}

/// Rank by a raw, possibly stale or corrupt, sort preference.
///
/// Returns the applied strategy alongside the posts. An unknown preference
/// leaves the input order unchanged and reports `None`.
pub fn rank_by_preference<T>(
    posts: &[T],
    preference: &str,
    now: DateTime<Utc>,
) -> (Vec<T>, Option<SortOption>)
where
    T: Rankable + Clone,
{
    match preference.parse::<SortOption>() {
        Ok(sort) => (rank_posts(posts, sort, now), Some(sort)),
        Err(e) => {
            warn!("{}; keeping input order for {} posts", e, posts.len());
            (posts.to_vec(), None)
        }
    }
}

fn descending_by<T, K>(
    posts: &[T],
    key: impl Fn(&T) -> K,
    compare: impl Fn(&K, &K) -> Ordering,
) -> Vec<T>
where
    T: Clone,
{
    let mut keyed: Vec<(K, &T)> = posts.iter().map(|post| (key(post), post)).collect();
    // slice::sort_by is stable: equal keys keep input order
    keyed.sort_by(|a, b| compare(&b.0, &a.0));
    keyed.into_iter().map(|(_, post)| post.clone()).collect()
}
