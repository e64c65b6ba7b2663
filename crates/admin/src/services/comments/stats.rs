//! Status counts over the cached comment collection.

use dokan_core::CommentStatus;

use crate::models::{Comment, CommentStatistics};

/// Count every status in one pass and derive percentages of the total.
///
/// Comments with an unrecognized status count toward the total only, so the
/// four percentages sum to 100 exactly when every status is recognized.
#[must_use]
pub fn statistics(comments: &[Comment]) -> CommentStatistics {
    let mut stats = CommentStatistics {
        total: comments.len(),
        ..CommentStatistics::default()
    };

    for comment in comments {
        match comment.status {
            CommentStatus::Pending => stats.pending += 1,
            CommentStatus::Approved => stats.approved += 1,
            CommentStatus::Rejected => stats.rejected += 1,
            CommentStatus::Spam => stats.spam += 1,
            CommentStatus::Unknown => {}
        }
    }

    stats.pending_percentage = percentage(stats.pending, stats.total);
    stats.approved_percentage = percentage(stats.approved, stats.total);
    stats.rejected_percentage = percentage(stats.rejected, stats.total);
    stats.spam_percentage = percentage(stats.spam, stats.total);
    stats
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}
