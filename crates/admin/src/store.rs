//! In-memory admin data store.
//!
//! Holds one section per admin domain: the dataset last fetched, the
//! filters it was fetched with, and loading/error flags. Each section is
//! written only by its owning service; readers get snapshots.

use std::sync::{PoisonError, RwLock};

use crate::models::{Comment, CommentFilters, Pagination, ReportFilters, ReportsData};

/// Moderation queue section.
#[derive(Debug, Clone, Default)]
pub struct CommentsState {
    pub comments: Vec<Comment>,
    pub filters: CommentFilters,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

/// Sales reports section.
#[derive(Debug, Clone)]
pub struct ReportsState {
    pub data: Option<ReportsData>,
    pub filters: ReportFilters,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AdminStore {
    comment_defaults: CommentFilters,
    report_defaults: ReportFilters,
    comments: RwLock<CommentsState>,
    reports: RwLock<ReportsState>,
}

impl AdminStore {
    /// Create a store whose filters start at, and reset to, the given defaults.
    #[must_use]
    pub fn new(comment_defaults: CommentFilters, report_defaults: ReportFilters) -> Self {
        Self {
            comments: RwLock::new(CommentsState {
                filters: comment_defaults.clone(),
                ..CommentsState::default()
            }),
            reports: RwLock::new(ReportsState {
                data: None,
                filters: report_defaults.clone(),
                loading: false,
                error: None,
            }),
            comment_defaults,
            report_defaults,
        }
    }

    #[must_use]
    pub fn comments(&self) -> CommentsState {
        self.comments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn reports(&self) -> ReportsState {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read the comments section without cloning it.
    pub fn read_comments<R>(&self, f: impl FnOnce(&CommentsState) -> R) -> R {
        f(&self.comments.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn update_comments<R>(&self, f: impl FnOnce(&mut CommentsState) -> R) -> R {
        f(&mut self.comments.write().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn update_reports<R>(&self, f: impl FnOnce(&mut ReportsState) -> R) -> R {
        f(&mut self.reports.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Restore the comment filters to their defaults. The dataset is kept.
    pub fn reset_comment_filters(&self) {
        let defaults = self.comment_defaults.clone();
        self.update_comments(|state| state.filters = defaults);
    }

    /// Restore the report filters to their defaults. The dataset is kept.
    pub fn reset_report_filters(&self) {
        let defaults = self.report_defaults.clone();
        self.update_reports(|state| state.filters = defaults);
    }
}
