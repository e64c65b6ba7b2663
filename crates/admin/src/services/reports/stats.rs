//! Summary statistics over a fetched report.

use crate::models::{
    CustomerBreakdown, ReportAverages, ReportStatistics, ReportTotals, ReportsData,
};

/// Totals, averages, growth and customer split of `data`.
///
/// Every ratio is 0 when its divisor is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn statistics(data: &ReportsData) -> ReportStatistics {
    let totals = data
        .sales_data
        .iter()
        .fold(ReportTotals::default(), |mut totals, point| {
            totals.revenue += point.revenue;
            totals.orders = totals.orders.saturating_add(point.orders);
            totals.customers = totals.customers.saturating_add(point.customers);
            totals
        });

    let days = data.sales_data.len() as f64;
    let averages = ReportAverages {
        order_value: ratio(totals.revenue, totals.orders as f64),
        daily_revenue: ratio(totals.revenue, days),
        daily_orders: ratio(totals.orders as f64, days),
    };

    let customers = &data.customer_analytics;
    let customer_total = customers.total_customers as f64;
    let breakdown = CustomerBreakdown {
        new: customers.new_customers,
        returning: customers.returning_customers,
        new_percentage: ratio(customers.new_customers as f64 * 100.0, customer_total),
        returning_percentage: ratio(customers.returning_customers as f64 * 100.0, customer_total),
    };

    ReportStatistics {
        totals,
        averages,
        growth: data.revenue_growth,
        customers: breakdown,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerAnalytics, RevenueGrowth, SalesPoint};

    fn point(date: &str, revenue: f64, orders: u64, customers: u64) -> SalesPoint {
        SalesPoint {
            date: date.to_string(),
            revenue,
            orders,
            customers,
        }
    }

    #[test]
    fn test_empty_series_has_zero_averages() {
        let stats = statistics(&ReportsData::default());

        assert_eq!(stats.totals.orders, 0);
        assert!(stats.averages.order_value.abs() < f64::EPSILON);
        assert!(stats.averages.daily_revenue.abs() < f64::EPSILON);
        assert!(stats.averages.daily_orders.abs() < f64::EPSILON);
        assert!(stats.customers.new_percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_and_averages() {
        let data = ReportsData {
            sales_data: vec![
                point("2025-03-01", 3_000_000.0, 3, 2),
                point("2025-03-02", 1_000_000.0, 1, 1),
            ],
            customer_analytics: CustomerAnalytics {
                new_customers: 1,
                returning_customers: 3,
                total_customers: 4,
            },
            revenue_growth: RevenueGrowth {
                percentage: 12.5,
                is_positive: true,
            },
            ..ReportsData::default()
        };

        let stats = statistics(&data);

        assert!((stats.totals.revenue - 4_000_000.0).abs() < 1e-6);
        assert_eq!(stats.totals.orders, 4);
        assert_eq!(stats.totals.customers, 3);
        assert!((stats.averages.order_value - 1_000_000.0).abs() < 1e-6);
        assert!((stats.averages.daily_revenue - 2_000_000.0).abs() < 1e-6);
        assert!((stats.averages.daily_orders - 2.0).abs() < 1e-9);
        assert!((stats.customers.returning_percentage - 75.0).abs() < 1e-9);
        assert!((stats.growth.percentage - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let data = ReportsData {
            sales_data: vec![
                point("2025-03-01", 1.0, u64::MAX, u64::MAX),
                point("2025-03-02", 1.0, 5, 5),
            ],
            ..ReportsData::default()
        };
        let stats = statistics(&data);
        assert_eq!(stats.totals.orders, u64::MAX);
        assert_eq!(stats.totals.customers, u64::MAX);
    }

    #[test]
    fn test_zero_orders_with_revenue() {
        let data = ReportsData {
            sales_data: vec![point("2025-03-01", 500.0, 0, 0)],
            ..ReportsData::default()
        };
        let stats = statistics(&data);
        assert!(stats.averages.order_value.abs() < f64::EPSILON);
        assert!((stats.averages.daily_revenue - 500.0).abs() < 1e-9);
    }
}
