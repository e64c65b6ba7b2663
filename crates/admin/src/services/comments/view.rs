//! Client-side view over the fetched comments: filter, sort, paginate.

use std::cmp::Ordering;
use std::sync::LazyLock;

use dokan_core::SortOrder;
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::locale;
use tracing::warn;

use crate::models::{Comment, CommentFilters, CommentSortField};

/// Comments matching the status and search filters, in the requested order.
#[must_use]
pub fn filter_and_sort(comments: &[Comment], filters: &CommentFilters) -> Vec<Comment> {
    let needle = filters.search.trim().to_lowercase();
    let mut matching: Vec<Comment> = comments
        .iter()
        .filter(|comment| filters.status.matches(comment.status))
        .filter(|comment| needle.is_empty() || matches_search(comment, &needle))
        .cloned()
        .collect();

    matching.sort_by(|a, b| {
        let ordering = compare(a, b, filters.sort_by);
        match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    matching
}

/// `needle` must already be lowercase.
fn matches_search(comment: &Comment, needle: &str) -> bool {
    let author = comment.author_name();
    let author_email = comment.user.as_ref().map_or("", |user| user.email.as_str());
    [
        comment.content.as_str(),
        author.as_str(),
        author_email,
        comment.product_name(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &Comment, b: &Comment, field: CommentSortField) -> Ordering {
    match field {
        CommentSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        CommentSortField::Rating => a.rating.unwrap_or(0).cmp(&b.rating.unwrap_or(0)),
        CommentSortField::Author => compare_text(&a.author_name(), &b.author_name()),
        CommentSortField::Product => compare_text(a.product_name(), b.product_name()),
        CommentSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        CommentSortField::Content => compare_text(&a.content, &b.content),
    }
}

/// Persian collation for text sort fields. `None` if the collation data
/// failed to load.
static COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    Collator::try_new(locale!("fa").into(), CollatorOptions::default())
        .inspect_err(|e| {
            warn!(error = %e, "Persian collation unavailable, sorting by code point");
        })
        .ok()
});

/// Locale-aware comparison, falling back to the raw text for a stable order.
fn compare_text(a: &str, b: &str) -> Ordering {
    let collated = COLLATOR.as_ref().map_or_else(
        || a.to_lowercase().cmp(&b.to_lowercase()),
        |collator| collator.compare(a, b),
    );
    collated.then_with(|| a.cmp(b))
}

/// The 1-based `page` of `comments`, `limit` per page.
#[must_use]
pub fn paginate(comments: &[Comment], page: u32, limit: u32) -> Vec<Comment> {
    let limit = limit.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(limit);
    comments.iter().skip(start).take(limit).cloned().collect()
}

/// Number of pages needed for `count` items; at least 1.
#[must_use]
pub fn total_pages(count: usize, limit: u32) -> u32 {
    let pages = count.div_ceil(limit.max(1) as usize).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
