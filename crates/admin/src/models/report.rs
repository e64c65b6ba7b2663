//! Sales analytics types.

use chrono::{Days, NaiveDate};
use dokan_core::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

/// Length of the default reporting window, in days.
pub const DEFAULT_RANGE_DAYS: u64 = 30;

/// Bucket size of the sales time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(format!("invalid report period: {s}")),
        }
    }
}

/// Date range and scope of a sales report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period: ReportPeriod,
    pub category: Option<CategoryId>,
    pub product: Option<ProductId>,
}

impl ReportFilters {
    /// The last [`DEFAULT_RANGE_DAYS`] days up to `today`, daily buckets.
    #[must_use]
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            start_date: today
                .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
                .unwrap_or(today),
            end_date: today,
            period: ReportPeriod::Daily,
            category: None,
            product: None,
        }
    }

    pub fn merge(&mut self, patch: ReportFiltersPatch) {
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(product) = patch.product {
            self.product = product;
        }
    }

    /// Query pairs shared by the analytics and export endpoints.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("startDate", self.start_date.format("%Y-%m-%d").to_string()),
            ("endDate", self.end_date.format("%Y-%m-%d").to_string()),
            ("period", self.period.as_str().to_string()),
        ];
        if let Some(category) = &self.category {
            query.push(("category", category.to_string()));
        }
        if let Some(product) = &self.product {
            query.push(("product", product.to_string()));
        }
        query
    }
}

/// Partial update of [`ReportFilters`]. `Some(None)` clears a scope filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFiltersPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub period: Option<ReportPeriod>,
    pub category: Option<Option<CategoryId>>,
    pub product: Option<Option<ProductId>>,
}

/// Body of `GET admin/reports/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsData {
    #[serde(default)]
    pub sales_data: Vec<SalesPoint>,
    #[serde(default)]
    pub product_analytics: ProductAnalytics,
    #[serde(default)]
    pub customer_analytics: CustomerAnalytics,
    #[serde(default)]
    pub revenue_growth: RevenueGrowth,
}

/// One bucket of the sales time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub customers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnalytics {
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub category_breakdown: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(default, alias = "_id")]
    pub id: Option<ProductId>,
    pub name: String,
    /// Units sold.
    #[serde(default)]
    pub sales: u64,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAnalytics {
    #[serde(default)]
    pub new_customers: u64,
    #[serde(default)]
    pub returning_customers: u64,
    #[serde(default)]
    pub total_customers: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueGrowth {
    #[serde(default)]
    pub percentage: f64,
    #[serde(default = "default_true")]
    pub is_positive: bool,
}

const fn default_true() -> bool {
    true
}

/// Summary figures derived from a [`ReportsData`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportStatistics {
    pub totals: ReportTotals,
    pub averages: ReportAverages,
    pub growth: RevenueGrowth,
    pub customers: CustomerBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportTotals {
    pub revenue: f64,
    pub orders: u64,
    pub customers: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportAverages {
    pub order_value: f64,
    pub daily_revenue: f64,
    pub daily_orders: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CustomerBreakdown {
    pub new: u64,
    pub returning: u64,
    pub new_percentage: f64,
    pub returning_percentage: f64,
}

/// A labelled series ready for a chart widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
}
