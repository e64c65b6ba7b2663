//! Chart-ready series derived from a fetched report.

use crate::models::{ChartSeries, Dataset, ReportsData};

/// Revenue and order count per bucket of the sales series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sales_chart(data: &ReportsData) -> ChartSeries {
    let points = &data.sales_data;
    ChartSeries {
        labels: points.iter().map(|p| p.date.clone()).collect(),
        datasets: vec![
            Dataset {
                label: "فروش (تومان)".to_string(),
                values: points.iter().map(|p| p.revenue).collect(),
            },
            Dataset {
                label: "تعداد سفارش".to_string(),
                values: points.iter().map(|p| p.orders as f64).collect(),
            },
        ],
    }
}

/// Units sold and revenue per best-selling product.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn top_products_chart(data: &ReportsData) -> ChartSeries {
    let products = &data.product_analytics.top_products;
    ChartSeries {
        labels: products.iter().map(|p| p.name.clone()).collect(),
        datasets: vec![
            Dataset {
                label: "تعداد فروش".to_string(),
                values: products.iter().map(|p| p.sales as f64).collect(),
            },
            Dataset {
                label: "درآمد".to_string(),
                values: products.iter().map(|p| p.revenue).collect(),
            },
        ],
    }
}

/// Share of sales per category.
#[must_use]
pub fn category_chart(data: &ReportsData) -> ChartSeries {
    let categories = &data.product_analytics.category_breakdown;
    ChartSeries {
        labels: categories.iter().map(|c| c.name.clone()).collect(),
        datasets: vec![Dataset {
            label: "سهم دسته‌بندی".to_string(),
            values: categories.iter().map(|c| c.value).collect(),
        }],
    }
}
