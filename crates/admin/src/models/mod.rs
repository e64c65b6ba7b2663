//! Admin data models.

pub mod comment;
pub mod report;

pub use comment::{
    AdminReply, BulkAction, Comment, CommentAnalytics, CommentAuthor, CommentFilters,
    CommentFiltersPatch, CommentPage, CommentProduct, CommentSortField, CommentStatistics,
    DailyCount, ModerationOutcome, Pagination, StatusFilter,
};
pub use report::{
    CategoryShare, ChartSeries, CustomerAnalytics, CustomerBreakdown, Dataset, ProductAnalytics,
    ReportAverages, ReportFilters, ReportFiltersPatch, ReportPeriod, ReportStatistics,
    ReportTotals, ReportsData, RevenueGrowth, SalesPoint, TopProduct,
};

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    /// File extension, same as the wire name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(format!("invalid export format: {s}")),
        }
    }
}
