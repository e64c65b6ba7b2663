//! Sales report endpoints.

use async_trait::async_trait;
use dokan_storefront::api::{ApiClient, ApiError};
use serde::Deserialize;
use tracing::instrument;

use crate::models::{ExportFormat, ReportFilters, ReportsData};

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportsBody {
    Wrapped { data: ReportsData },
    Bare(ReportsData),
}

/// Remote operations behind the reports dashboard.
#[async_trait]
pub trait ReportsApi: Send + Sync {
    async fn analytics(&self, filters: &ReportFilters) -> Result<ReportsData, ApiError>;

    async fn export(&self, filters: &ReportFilters, format: ExportFormat)
    -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
impl ReportsApi for ApiClient {
    #[instrument(skip(self))]
    async fn analytics(&self, filters: &ReportFilters) -> Result<ReportsData, ApiError> {
        let body: ReportsBody = self
            .get("admin/reports/analytics", &filters.to_query())
            .await?;
        Ok(match body {
            ReportsBody::Wrapped { data } | ReportsBody::Bare(data) => data,
        })
    }

    #[instrument(skip(self))]
    async fn export(
        &self,
        filters: &ReportFilters,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        let path = format!("admin/reports/export/{}", format.as_str());
        self.get_bytes(&path, &filters.to_query()).await
    }
}
