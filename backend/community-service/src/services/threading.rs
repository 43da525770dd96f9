//! Comment threading
//!
//! Turns a flat, arbitrarily ordered list of comments into top-level
//! comments with their direct replies attached. Threads are exactly two
//! levels deep: a reply whose parent is not a top-level comment (missing,
//! deleted, filtered out, or itself a reply) is dropped, never promoted.

use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Comment, ThreadedComment};

/// Anything that can be threaded under a parent.
pub trait Threadable {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;

    /// `None` marks a top-level comment.
    fn parent_id(&self) -> Option<Self::Id>;
}

impl Threadable for Comment {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}

/// Counts gathered while assembling threads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadingReport {
    pub top_level: usize,
    pub replies: usize,
    pub dropped: usize,
}

/// Assemble two-level threads from a flat comment list.
///
/// Top-level entries come out in first-seen order and replies in input
/// order. A duplicated top-level id keeps its first position while the later
/// record replaces the earlier one.
pub fn thread_comments<C>(comments: &[C]) -> Vec<ThreadedComment<C>>
where
    C: Threadable + Clone,
{
    thread_comments_with_report(comments).0
}

/// [`thread_comments`] plus counts of attached and dropped replies.
pub fn thread_comments_with_report<C>(comments: &[C]) -> (Vec<ThreadedComment<C>>, ThreadingReport)
where
    C: Threadable + Clone,
{
    let mut threads: Vec<ThreadedComment<C>> = Vec::new();
    let mut slots: HashMap<C::Id, usize> = HashMap::new();

    // Replies may arrive before their parent, so register every top-level first.
    for comment in comments.iter().filter(|c| c.parent_id().is_none()) {
        match slots.get(&comment.id()) {
            Some(&slot) => threads[slot].comment = comment.clone(),
            None => {
                slots.insert(comment.id(), threads.len());
                threads.push(ThreadedComment::new(comment.clone()));
            }
        }
    }

    let mut report = ThreadingReport {
        top_level: threads.len(),
        ..ThreadingReport::default()
    };

    for comment in comments {
        let Some(parent_id) = comment.parent_id() else {
            continue;
        };

        match slots.get(&parent_id) {
            Some(&slot) => {
                threads[slot].replies.push(comment.clone());
                report.replies += 1;
            }
            None => report.dropped += 1,
        }
    }

    debug!(
        "Threaded {} comments: {} top-level, {} replies, {} dropped",
        comments.len(),
        report.top_level,
        report.replies,
        report.dropped
    );

    (threads, report)
}
