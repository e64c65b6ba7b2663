//! Sales reports service.
//!
//! Fetches aggregate analytics for the current date range and derives
//! summary statistics and chart series from them. Changing the filters
//! always triggers a new fetch; the dataset is replaced whole on success.

pub mod charts;
pub mod stats;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::api::ReportsApi;
use crate::download::{DownloadSink, dated_filename, today};
use crate::error::{AdminError, Result};
use crate::models::{
    ChartSeries, ExportFormat, ReportFilters, ReportFiltersPatch, ReportStatistics, ReportsData,
};
use crate::notify::{Notifier, Toast};
use crate::sequence::{FetchOutcome, RequestSequence};
use crate::store::{AdminStore, ReportsState};

/// Prefix of exported report files.
const EXPORT_PREFIX: &str = "sales-report";

pub struct ReportsService {
    api: Arc<dyn ReportsApi>,
    store: Arc<AdminStore>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
    sequence: RequestSequence,
}

impl ReportsService {
    pub fn new(
        api: Arc<dyn ReportsApi>,
        store: Arc<AdminStore>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            downloads,
            sequence: RequestSequence::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ReportsState {
        self.store.reports()
    }

    #[must_use]
    pub fn filters(&self) -> ReportFilters {
        self.store.reports().filters
    }

    #[must_use]
    pub fn data(&self) -> Option<ReportsData> {
        self.store.reports().data
    }

    /// Merge `overrides` onto the stored filters and fetch the report.
    ///
    /// # Errors
    ///
    /// Returns the API error after toasting it. A superseded request's
    /// error is returned without touching the store.
    #[instrument(skip(self))]
    pub async fn fetch_reports_data(
        &self,
        overrides: Option<ReportFiltersPatch>,
    ) -> Result<FetchOutcome> {
        let filters = self.store.update_reports(|state| {
            if let Some(patch) = overrides {
                state.filters.merge(patch);
            }
            state.loading = true;
            state.error = None;
            state.filters.clone()
        });
        let ticket = self.sequence.issue();

        let result = self.api.analytics(&filters).await;

        if !self.sequence.is_current(ticket) {
            debug!("Dropping superseded report response");
            return result
                .map(|_| FetchOutcome::Superseded)
                .map_err(AdminError::from);
        }

        match result {
            Ok(data) => {
                debug!(points = data.sales_data.len(), "Fetched report");
                self.store.update_reports(|state| {
                    state.data = Some(data);
                    state.loading = false;
                });
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                let err = AdminError::from(err);
                let message = err.user_message("خطا در دریافت گزارش‌ها");
                warn!(error = %err, "Report fetch failed");
                self.store.update_reports(|state| {
                    state.loading = false;
                    state.error = Some(message.clone());
                });
                self.notifier.notify(Toast::error(message));
                Err(err)
            }
        }
    }

    /// Store `patch` and refetch with the result.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_reports_data`].
    pub async fn update_filters(&self, patch: ReportFiltersPatch) -> Result<FetchOutcome> {
        self.fetch_reports_data(Some(patch)).await
    }

    /// Restore the default date range. The current dataset is kept until
    /// the next fetch.
    pub fn reset_filters(&self) {
        self.store.reset_report_filters();
    }

    /// Statistics of the current dataset; all zero before the first fetch.
    #[must_use]
    pub fn statistics(&self) -> ReportStatistics {
        self.data()
            .map_or_else(ReportStatistics::default, |data| stats::statistics(&data))
    }

    #[must_use]
    pub fn sales_chart(&self) -> ChartSeries {
        self.data()
            .map_or_else(ChartSeries::default, |data| charts::sales_chart(&data))
    }

    #[must_use]
    pub fn top_products_chart(&self) -> ChartSeries {
        self.data()
            .map_or_else(ChartSeries::default, |data| charts::top_products_chart(&data))
    }

    #[must_use]
    pub fn category_chart(&self) -> ChartSeries {
        self.data()
            .map_or_else(ChartSeries::default, |data| charts::category_chart(&data))
    }

    /// # Errors
    ///
    /// See [`Self::export`].
    pub async fn export_to_csv(&self) -> Result<PathBuf> {
        self.export(ExportFormat::Csv).await
    }

    /// # Errors
    ///
    /// See [`Self::export`].
    pub async fn export_to_pdf(&self) -> Result<PathBuf> {
        self.export(ExportFormat::Pdf).await
    }

    /// Download the report for the current filters and save it as
    /// `sales-report-YYYY-MM-DD.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns the API or download error after toasting it.
    #[instrument(skip(self))]
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf> {
        let filters = self.filters();
        let saved: Result<PathBuf> = async {
            let bytes = self.api.export(&filters, format).await?;
            let filename = dated_filename(EXPORT_PREFIX, today(), format.extension());
            Ok(self.downloads.save(&filename, &bytes).await?)
        }
        .await;

        match saved {
            Ok(path) => {
                self.notifier
                    .notify(Toast::success("گزارش با موفقیت دانلود شد"));
                Ok(path)
            }
            Err(err) => {
                warn!(error = %err, "Report export failed");
                self.notifier
                    .notify(Toast::error(err.user_message("خطا در دانلود گزارش")));
                Err(err)
            }
        }
    }
}
