//! Comment moderation service.
//!
//! Drives the moderation queue: fetching pages of comments, CRUD, the three
//! moderation decisions, bulk actions, analytics and export. The fetched
//! page lives in the [`AdminStore`]; derived views (filtered, paginated,
//! statistics) are computed from it on demand.
//!
//! # Filtering
//!
//! Filters are sent to the server with every fetch. In
//! [`FilterMode::ServerAndClient`] the service also re-applies status,
//! search and sort to whatever came back, and slices pages locally when the
//! server returned more than one page of results. In
//! [`FilterMode::ServerOnly`] the fetched page is shown as returned.
//!
//! # Errors
//!
//! Every failing operation emits an error toast carrying the server message
//! (or a Persian fallback) and returns the error to the caller.

pub mod stats;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;

use dokan_core::{CommentId, CommentStatus};
use tracing::{debug, instrument, warn};

use crate::api::CommentsApi;
use crate::config::FilterMode;
use crate::download::{DownloadSink, dated_filename, today};
use crate::error::{AdminError, Result};
use crate::models::{
    BulkAction, Comment, CommentAnalytics, CommentFilters, CommentFiltersPatch, CommentStatistics,
    ExportFormat, ModerationOutcome, Pagination,
};
use crate::notify::{Notifier, Toast};
use crate::sequence::{FetchOutcome, RequestSequence};
use crate::store::{AdminStore, CommentsState};

/// Prefix of exported comment files.
const EXPORT_PREFIX: &str = "comments-export";

pub struct CommentsService {
    api: Arc<dyn CommentsApi>,
    store: Arc<AdminStore>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
    filter_mode: FilterMode,
    sequence: RequestSequence,
}

impl CommentsService {
    pub fn new(
        api: Arc<dyn CommentsApi>,
        store: Arc<AdminStore>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadSink>,
        filter_mode: FilterMode,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            downloads,
            filter_mode,
            sequence: RequestSequence::new(),
        }
    }

    /// Snapshot of the moderation queue section of the store.
    #[must_use]
    pub fn state(&self) -> CommentsState {
        self.store.comments()
    }

    #[must_use]
    pub fn filters(&self) -> CommentFilters {
        self.store.read_comments(|state| state.filters.clone())
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Merge `overrides` onto the stored filters and fetch that page.
    ///
    /// A response that arrives after a newer fetch was issued is dropped and
    /// reported as [`FetchOutcome::Superseded`]; its errors are returned but
    /// neither stored nor toasted.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self))]
    pub async fn fetch_comments(
        &self,
        overrides: Option<CommentFiltersPatch>,
    ) -> Result<FetchOutcome> {
        let filters = self.store.update_comments(|state| {
            if let Some(patch) = overrides {
                state.filters.merge(patch);
            }
            state.loading = true;
            state.error = None;
            state.filters.clone()
        });
        let ticket = self.sequence.issue();

        let result = self.api.list_comments(&filters).await;

        if !self.sequence.is_current(ticket) {
            debug!("Dropping superseded comments response");
            return result
                .map(|_| FetchOutcome::Superseded)
                .map_err(AdminError::from);
        }

        match result {
            Ok(page) => {
                let pagination = page
                    .pagination
                    .unwrap_or_else(|| local_pagination(page.comments.len(), &filters));
                debug!(count = page.comments.len(), total = pagination.total, "Fetched comments");
                self.store.update_comments(|state| {
                    state.comments = page.comments;
                    state.pagination = pagination;
                    state.loading = false;
                });
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                let err = AdminError::from(err);
                let message = err.user_message("خطا در بارگذاری نظرات");
                self.store.update_comments(|state| {
                    state.loading = false;
                    state.error = Some(message.clone());
                });
                self.notifier.notify(Toast::error(message));
                Err(err)
            }
        }
    }

    /// Fetch one comment and refresh its cached copy.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self), fields(comment_id = %id))]
    pub async fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        let comment = self
            .api
            .get_comment(id)
            .await
            .map_err(|e| self.fail(e.into(), "خطا در دریافت نظر"))?;
        self.replace_cached(&comment);
        Ok(comment)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Replace a comment's text.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self, content), fields(comment_id = %id))]
    pub async fn update_comment(&self, id: &CommentId, content: &str) -> Result<Comment> {
        let comment = self
            .api
            .update_comment(id, content)
            .await
            .map_err(|e| self.fail(e.into(), "خطا در ویرایش نظر"))?;
        self.replace_cached(&comment);
        self.notifier.notify(Toast::success("نظر با موفقیت ویرایش شد"));
        Ok(comment)
    }

    /// Publish the shop's answer to a comment.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self, reply), fields(comment_id = %id))]
    pub async fn reply_to_comment(&self, id: &CommentId, reply: &str) -> Result<Comment> {
        let comment = self
            .api
            .reply_to_comment(id, reply)
            .await
            .map_err(|e| self.fail(e.into(), "خطا در ثبت پاسخ"))?;
        self.replace_cached(&comment);
        self.notifier.notify(Toast::success("پاسخ با موفقیت ثبت شد"));
        Ok(comment)
    }

    /// Delete a comment and drop it from the cached page.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self), fields(comment_id = %id))]
    pub async fn delete_comment(&self, id: &CommentId) -> Result<()> {
        self.api
            .delete_comment(id)
            .await
            .map_err(|e| self.fail(e.into(), "خطا در حذف نظر"))?;

        self.store.update_comments(|state| {
            let before = state.comments.len();
            state.comments.retain(|comment| &comment.id != id);
            if state.comments.len() < before {
                state.pagination.total = state.pagination.total.saturating_sub(1);
            }
        });
        self.notifier.notify(Toast::success("نظر با موفقیت حذف شد"));
        Ok(())
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    /// # Errors
    ///
    /// Returns the API error after toasting it and restoring the previous status.
    pub async fn approve_comment(&self, id: &CommentId) -> Result<()> {
        self.moderate(id, CommentStatus::Approved, "نظر تایید شد", "خطا در تایید نظر")
            .await
    }

    /// # Errors
    ///
    /// Returns the API error after toasting it and restoring the previous status.
    pub async fn reject_comment(&self, id: &CommentId) -> Result<()> {
        self.moderate(id, CommentStatus::Rejected, "نظر رد شد", "خطا در رد نظر")
            .await
    }

    /// # Errors
    ///
    /// Returns the API error after toasting it and restoring the previous status.
    pub async fn mark_as_spam(&self, id: &CommentId) -> Result<()> {
        self.moderate(
            id,
            CommentStatus::Spam,
            "نظر به عنوان اسپم علامت‌گذاری شد",
            "خطا در علامت‌گذاری اسپم",
        )
        .await
    }

    /// Patch the cached status, then confirm with the server. On failure the
    /// previous status is put back unless something else changed it since.
    #[instrument(skip(self, success, failure), fields(comment_id = %id, status = %status))]
    async fn moderate(
        &self,
        id: &CommentId,
        status: CommentStatus,
        success: &str,
        failure: &str,
    ) -> Result<()> {
        let previous = self.set_cached_status(id, status);

        match self.api.set_status(id, status).await {
            Ok(()) => {
                debug!(outcome = ?ModerationOutcome::Confirmed, "Moderation applied");
                self.notifier.notify(Toast::success(success));
                Ok(())
            }
            Err(err) => {
                if let Some(previous) = previous {
                    self.store.update_comments(|state| {
                        if let Some(comment) = state
                            .comments
                            .iter_mut()
                            .find(|c| &c.id == id && c.status == status)
                        {
                            comment.status = previous;
                        }
                    });
                }
                warn!(outcome = ?ModerationOutcome::RolledBack, error = %err, "Moderation failed");
                Err(self.fail(err.into(), failure))
            }
        }
    }

    /// Apply `action` to every comment in `ids`.
    ///
    /// Status actions patch the cached page; delete and unrecognized actions
    /// reload it from the server.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self, ids), fields(count = ids.len(), action = action.as_str()))]
    pub async fn bulk_action(&self, ids: &[CommentId], action: &BulkAction) -> Result<()> {
        if ids.is_empty() {
            self.notifier.notify(Toast::warning("هیچ نظری انتخاب نشده است"));
            return Ok(());
        }

        self.api
            .bulk_action(ids, action)
            .await
            .map_err(|e| self.fail(e.into(), "خطا در انجام عملیات گروهی"))?;

        match action.resulting_status() {
            Some(status) => self.store.update_comments(|state| {
                for comment in &mut state.comments {
                    if ids.contains(&comment.id) {
                        comment.status = status;
                    }
                }
            }),
            None => {
                // Reload errors are toasted by the fetch itself
                self.fetch_comments(None).await?;
            }
        }

        self.notifier
            .notify(Toast::success("عملیات گروهی با موفقیت انجام شد"));
        Ok(())
    }

    // =========================================================================
    // Analytics and export
    // =========================================================================

    /// # Errors
    ///
    /// Returns the API error after toasting it.
    #[instrument(skip(self))]
    pub async fn fetch_analytics(&self) -> Result<CommentAnalytics> {
        self.api
            .analytics()
            .await
            .map_err(|e| self.fail(e.into(), "خطا در دریافت آمار نظرات"))
    }

    /// Download the moderation queue and save it as
    /// `comments-export-YYYY-MM-DD.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns the API or download error after toasting it.
    #[instrument(skip(self))]
    pub async fn export_comments(&self, format: ExportFormat) -> Result<PathBuf> {
        const FAILURE: &str = "خطا در دریافت فایل خروجی";

        let bytes = self
            .api
            .export(format)
            .await
            .map_err(|e| self.fail(e.into(), FAILURE))?;
        let filename = dated_filename(EXPORT_PREFIX, today(), format.extension());
        let path = self
            .downloads
            .save(&filename, &bytes)
            .await
            .map_err(|e| self.fail(e.into(), FAILURE))?;

        self.notifier
            .notify(Toast::success("فایل خروجی با موفقیت دانلود شد"));
        Ok(path)
    }

    // =========================================================================
    // Filters and derived views
    // =========================================================================

    /// Change the stored filters without fetching. Changing what is matched
    /// or how it is ordered returns to the first page unless a page is given.
    pub fn update_filters(&self, mut patch: CommentFiltersPatch) {
        let narrows = patch.status.is_some()
            || patch.search.is_some()
            || patch.sort_by.is_some()
            || patch.sort_order.is_some();
        if narrows && patch.page.is_none() {
            patch.page = Some(1);
        }
        self.store.update_comments(|state| state.filters.merge(patch));
    }

    pub fn reset_filters(&self) {
        self.store.reset_comment_filters();
    }

    /// Cached comments matching the current filters, in display order.
    #[must_use]
    pub fn filtered_comments(&self) -> Vec<Comment> {
        self.store.read_comments(|state| match self.filter_mode {
            FilterMode::ServerAndClient => view::filter_and_sort(&state.comments, &state.filters),
            FilterMode::ServerOnly => state.comments.clone(),
        })
    }

    /// The comments to show on the current page.
    #[must_use]
    pub fn paginated_comments(&self) -> Vec<Comment> {
        let filtered = self.filtered_comments();
        self.store.read_comments(|state| {
            if self.client_paginates(state) {
                view::paginate(&filtered, state.filters.page, state.filters.limit)
            } else {
                filtered
            }
        })
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let filtered = self.filtered_comments();
        self.store.read_comments(|state| {
            if self.client_paginates(state) {
                view::total_pages(filtered.len(), state.filters.limit)
            } else {
                state.pagination.pages.max(1)
            }
        })
    }

    /// Counts over the whole cached collection, not just the current page.
    #[must_use]
    pub fn statistics(&self) -> CommentStatistics {
        self.store.read_comments(|state| stats::statistics(&state.comments))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The server returned more than a page, so it ignored pagination.
    fn client_paginates(&self, state: &CommentsState) -> bool {
        self.filter_mode == FilterMode::ServerAndClient
            && state.comments.len() > state.filters.limit as usize
    }

    /// Set the cached status of `id`, returning the previous one.
    fn set_cached_status(&self, id: &CommentId, status: CommentStatus) -> Option<CommentStatus> {
        self.store.update_comments(|state| {
            state
                .comments
                .iter_mut()
                .find(|comment| &comment.id == id)
                .map(|comment| std::mem::replace(&mut comment.status, status))
        })
    }

    fn replace_cached(&self, updated: &Comment) {
        self.store.update_comments(|state| {
            if let Some(comment) = state.comments.iter_mut().find(|c| c.id == updated.id) {
                *comment = updated.clone();
            }
        });
    }

    /// Toast `err` and hand it back for propagation.
    fn fail(&self, err: AdminError, fallback: &str) -> AdminError {
        warn!(error = %err, "Comment operation failed");
        self.notifier.notify(Toast::error(err.user_message(fallback)));
        err
    }
}

/// Pagination for a response that carried none.
fn local_pagination(count: usize, filters: &CommentFilters) -> Pagination {
    Pagination {
        total: count as u64,
        page: filters.page,
        pages: view::total_pages(count, filters.limit),
        limit: filters.limit,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use dokan_storefront::api::ApiError;
    use tokio::sync::oneshot;

    use super::view::tests::comment;
    use super::*;
    use crate::download::DirectorySink;
    use crate::models::{CommentPage, ReportFilters, StatusFilter};
    use crate::notify::{ToastLevel, ToastLog};

    type Gate = (oneshot::Sender<()>, oneshot::Receiver<()>);

    #[derive(Default)]
    struct FakeCommentsApi {
        comments: Mutex<Vec<Comment>>,
        /// Status code every call fails with, if set.
        fail_with: Mutex<Option<u16>>,
        /// Held by the next list call whose search is "slow".
        gate: Mutex<Option<Gate>>,
        bulk_calls: Mutex<Vec<(Vec<CommentId>, String)>>,
        list_calls: Mutex<usize>,
    }

    impl FakeCommentsApi {
        fn with(comments: Vec<Comment>) -> Self {
            Self {
                comments: Mutex::new(comments),
                ..Self::default()
            }
        }

        fn fail(&self, status: u16) {
            *self.fail_with.lock().unwrap() = Some(status);
        }

        fn check(&self) -> std::result::Result<(), ApiError> {
            match *self.fail_with.lock().unwrap() {
                Some(status) => Err(ApiError::Server {
                    status,
                    message: Some("سرور در دسترس نیست".to_string()),
                }),
                None => Ok(()),
            }
        }

        fn find(&self, id: &CommentId) -> std::result::Result<Comment, ApiError> {
            self.comments
                .lock()
                .unwrap()
                .iter()
                .find(|c| &c.id == id)
                .cloned()
                .ok_or(ApiError::Server {
                    status: 404,
                    message: None,
                })
        }
    }

    #[async_trait]
    impl CommentsApi for FakeCommentsApi {
        async fn list_comments(
            &self,
            filters: &CommentFilters,
        ) -> std::result::Result<CommentPage, ApiError> {
            *self.list_calls.lock().unwrap() += 1;
            if filters.search == "slow" {
                let gate = self.gate.lock().unwrap().take();
                if let Some((entered, release)) = gate {
                    let _ = entered.send(());
                    let _ = release.await;
                }
            }
            self.check()?;
            let mut comments = self.comments.lock().unwrap().clone();
            if !filters.search.is_empty() {
                for comment in &mut comments {
                    comment.content = filters.search.clone();
                }
            }
            Ok(CommentPage {
                comments,
                pagination: None,
            })
        }

        async fn get_comment(&self, id: &CommentId) -> std::result::Result<Comment, ApiError> {
            self.check()?;
            self.find(id)
        }

        async fn update_comment(
            &self,
            id: &CommentId,
            content: &str,
        ) -> std::result::Result<Comment, ApiError> {
            self.check()?;
            let mut comment = self.find(id)?;
            comment.content = content.to_string();
            Ok(comment)
        }

        async fn reply_to_comment(
            &self,
            id: &CommentId,
            reply: &str,
        ) -> std::result::Result<Comment, ApiError> {
            self.check()?;
            let mut comment = self.find(id)?;
            comment.admin_reply = Some(crate::models::AdminReply {
                content: reply.to_string(),
                replied_at: None,
            });
            Ok(comment)
        }

        async fn delete_comment(&self, id: &CommentId) -> std::result::Result<(), ApiError> {
            self.check()?;
            self.comments.lock().unwrap().retain(|c| &c.id != id);
            Ok(())
        }

        async fn set_status(
            &self,
            id: &CommentId,
            status: CommentStatus,
        ) -> std::result::Result<(), ApiError> {
            self.check()?;
            if let Some(comment) = self.comments.lock().unwrap().iter_mut().find(|c| &c.id == id) {
                comment.status = status;
            }
            Ok(())
        }

        async fn bulk_action(
            &self,
            ids: &[CommentId],
            action: &BulkAction,
        ) -> std::result::Result<(), ApiError> {
            self.check()?;
            self.bulk_calls
                .lock()
                .unwrap()
                .push((ids.to_vec(), action.as_str().to_string()));
            if *action == BulkAction::Delete {
                self.comments.lock().unwrap().retain(|c| !ids.contains(&c.id));
            }
            Ok(())
        }

        async fn analytics(&self) -> std::result::Result<CommentAnalytics, ApiError> {
            self.check()?;
            Ok(CommentAnalytics {
                total_comments: self.comments.lock().unwrap().len() as u64,
                ..CommentAnalytics::default()
            })
        }

        async fn export(&self, format: ExportFormat) -> std::result::Result<Vec<u8>, ApiError> {
            self.check()?;
            Ok(format!("export,{}\n", format.as_str()).into_bytes())
        }
    }

    struct Harness {
        api: Arc<FakeCommentsApi>,
        toasts: Arc<ToastLog>,
        service: Arc<CommentsService>,
        _downloads: tempfile::TempDir,
    }

    fn harness_with_mode(comments: Vec<Comment>, mode: FilterMode) -> Harness {
        let api = Arc::new(FakeCommentsApi::with(comments));
        let toasts = Arc::new(ToastLog::new());
        let downloads = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let store = Arc::new(AdminStore::new(
            CommentFilters::with_limit(10),
            ReportFilters::ending(today),
        ));
        let service = Arc::new(CommentsService::new(
            api.clone(),
            store,
            toasts.clone(),
            Arc::new(DirectorySink::new(downloads.path())),
            mode,
        ));
        Harness {
            api,
            toasts,
            service,
            _downloads: downloads,
        }
    }

    fn harness(comments: Vec<Comment>) -> Harness {
        harness_with_mode(comments, FilterMode::ServerAndClient)
    }

    fn sample() -> Vec<Comment> {
        vec![
            comment("c1", CommentStatus::Pending, 4, 1),
            comment("c2", CommentStatus::Approved, 5, 2),
            comment("c3", CommentStatus::Pending, 2, 3),
        ]
    }

    fn cached_status(h: &Harness, id: &str) -> CommentStatus {
        h.service
            .state()
            .comments
            .iter()
            .find(|c| c.id.as_str() == id)
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_fetch_comments_replaces_dataset() {
        let h = harness(sample());

        let outcome = h.service.fetch_comments(None).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied);
        let state = h.service.state();
        assert_eq!(state.comments.len(), 3);
        assert_eq!(state.pagination.total, 3);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error_and_toasts() {
        let h = harness(sample());
        h.api.fail(500);

        let err = h.service.fetch_comments(None).await.unwrap_err();

        assert!(matches!(err, AdminError::Api(_)));
        let state = h.service.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("سرور در دسترس نیست"));
        let toast = h.toasts.last().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_stale_fetch_response_is_dropped() {
        let h = harness(sample());
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *h.api.gate.lock().unwrap() = Some((entered_tx, release_rx));

        let slow_service = h.service.clone();
        let slow = tokio::spawn(async move {
            slow_service
                .fetch_comments(Some(CommentFiltersPatch {
                    search: Some("slow".to_string()),
                    ..CommentFiltersPatch::default()
                }))
                .await
        });
        entered_rx.await.unwrap();

        let fast = h
            .service
            .fetch_comments(Some(CommentFiltersPatch {
                search: Some("fast".to_string()),
                ..CommentFiltersPatch::default()
            }))
            .await
            .unwrap();
        release_tx.send(()).unwrap();
        let slow = slow.await.unwrap().unwrap();

        assert_eq!(fast, FetchOutcome::Applied);
        assert_eq!(slow, FetchOutcome::Superseded);
        assert!(h.service.state().comments.iter().all(|c| c.content == "fast"));
    }

    #[tokio::test]
    async fn test_approve_patches_cached_status() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();

        h.service.approve_comment(&CommentId::new("c1")).await.unwrap();

        assert_eq!(cached_status(&h, "c1"), CommentStatus::Approved);
        assert_eq!(h.toasts.last().unwrap().level, ToastLevel::Success);
        assert_eq!(*h.api.list_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_moderation_rolls_back() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();
        h.api.fail(500);

        let result = h.service.mark_as_spam(&CommentId::new("c2")).await;

        assert!(result.is_err());
        assert_eq!(cached_status(&h, "c2"), CommentStatus::Approved);
        assert_eq!(h.toasts.last().unwrap().message, "سرور در دسترس نیست");
    }

    #[tokio::test]
    async fn test_bulk_status_action_patches_locally() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();
        let ids = [CommentId::new("c1"), CommentId::new("c3")];

        h.service.bulk_action(&ids, &BulkAction::Reject).await.unwrap();

        assert_eq!(cached_status(&h, "c1"), CommentStatus::Rejected);
        assert_eq!(cached_status(&h, "c3"), CommentStatus::Rejected);
        assert_eq!(cached_status(&h, "c2"), CommentStatus::Approved);
        assert_eq!(*h.api.list_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_and_unknown_actions_reload() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();

        h.service
            .bulk_action(&[CommentId::new("c1")], &BulkAction::Delete)
            .await
            .unwrap();
        assert_eq!(h.service.state().comments.len(), 2);

        h.service
            .bulk_action(&[CommentId::new("c2")], &BulkAction::from("archive"))
            .await
            .unwrap();
        assert_eq!(*h.api.list_calls.lock().unwrap(), 3);
        assert_eq!(h.api.bulk_calls.lock().unwrap()[1].1, "archive");
    }

    #[tokio::test]
    async fn test_bulk_action_without_selection_is_noop() {
        let h = harness(sample());

        h.service.bulk_action(&[], &BulkAction::Approve).await.unwrap();

        assert!(h.api.bulk_calls.lock().unwrap().is_empty());
        assert_eq!(h.toasts.last().unwrap().level, ToastLevel::Warning);
    }

    #[tokio::test]
    async fn test_delete_update_and_reply_touch_cache() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();

        h.service
            .update_comment(&CommentId::new("c1"), "متن جدید")
            .await
            .unwrap();
        h.service
            .reply_to_comment(&CommentId::new("c2"), "ممنون از شما")
            .await
            .unwrap();
        h.service.delete_comment(&CommentId::new("c3")).await.unwrap();

        let state = h.service.state();
        assert_eq!(state.comments.len(), 2);
        assert_eq!(state.pagination.total, 2);
        assert_eq!(state.comments[0].content, "متن جدید");
        assert!(state.comments[1].admin_reply.is_some());
    }

    #[tokio::test]
    async fn test_get_comment_not_found_toasts_fallback() {
        let h = harness(sample());

        let err = h.service.get_comment(&CommentId::new("missing")).await.unwrap_err();

        assert!(matches!(err, AdminError::Api(_)));
        assert_eq!(h.toasts.last().unwrap().message, "خطا در دریافت نظر");
    }

    #[tokio::test]
    async fn test_export_saves_dated_file() {
        let h = harness(sample());

        let path = h.service.export_comments(ExportFormat::Csv).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("comments-export-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "export,csv\n");
    }

    #[tokio::test]
    async fn test_fetch_analytics() {
        let h = harness(sample());
        let analytics = h.service.fetch_analytics().await.unwrap();
        assert_eq!(analytics.total_comments, 3);
    }

    #[tokio::test]
    async fn test_client_side_filtering_over_fetched_page() {
        let h = harness(sample());
        h.service.fetch_comments(None).await.unwrap();

        h.service.update_filters(CommentFiltersPatch {
            status: Some(StatusFilter::Only(CommentStatus::Pending)),
            ..CommentFiltersPatch::default()
        });

        let ids: Vec<_> = h
            .service
            .filtered_comments()
            .into_iter()
            .map(|c| c.id.into_inner())
            .collect();
        assert_eq!(ids, ["c3", "c1"]);
        assert_eq!(h.service.statistics().total, 3);
    }

    #[tokio::test]
    async fn test_server_only_mode_shows_page_as_returned() {
        let h = harness_with_mode(sample(), FilterMode::ServerOnly);
        h.service.fetch_comments(None).await.unwrap();

        h.service.update_filters(CommentFiltersPatch {
            status: Some(StatusFilter::Only(CommentStatus::Spam)),
            ..CommentFiltersPatch::default()
        });

        assert_eq!(h.service.filtered_comments().len(), 3);
        assert_eq!(h.service.paginated_comments().len(), 3);
    }

    #[tokio::test]
    async fn test_client_paginates_when_server_ignores_limit() {
        let comments: Vec<_> = (1..=12)
            .map(|day| comment(&format!("c{day}"), CommentStatus::Pending, 3, day))
            .collect();
        let h = harness(comments);
        h.service
            .fetch_comments(Some(CommentFiltersPatch {
                limit: Some(5),
                ..CommentFiltersPatch::default()
            }))
            .await
            .unwrap();

        assert_eq!(h.service.total_pages(), 3);
        assert_eq!(h.service.paginated_comments().len(), 5);

        h.service.update_filters(CommentFiltersPatch {
            page: Some(3),
            ..CommentFiltersPatch::default()
        });
        assert_eq!(h.service.paginated_comments().len(), 2);
    }

    #[tokio::test]
    async fn test_update_filters_returns_to_first_page() {
        let h = harness(sample());
        h.service.update_filters(CommentFiltersPatch {
            page: Some(3),
            ..CommentFiltersPatch::default()
        });
        h.service.update_filters(CommentFiltersPatch {
            search: Some("چای".to_string()),
            ..CommentFiltersPatch::default()
        });
        assert_eq!(h.service.filters().page, 1);

        h.service.reset_filters();
        assert_eq!(h.service.filters(), CommentFilters::with_limit(10));
    }
}
