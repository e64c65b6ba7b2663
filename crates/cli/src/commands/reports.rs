//! Sales report commands (admin accounts only).
//!
//! # Usage
//!
//! ```bash
//! dokan reports fetch --from 2025-03-01 --to 2025-03-31 --period weekly
//! dokan reports stats --category kitchen
//! dokan reports export pdf
//! ```

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dokan_admin::models::{ChartSeries, ExportFormat, ReportFiltersPatch, ReportPeriod};
use dokan_core::{CategoryId, ProductId};

use crate::app::App;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum ReportsCommand {
    /// Fetch the report and print the chart series
    Fetch(FilterArgs),
    /// Fetch the report and print summary statistics
    Stats(FilterArgs),
    /// Download the report as CSV or PDF
    Export {
        #[arg(default_value = "csv")]
        format: ExportFormat,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    /// First day, `YYYY-MM-DD` (default: 30 days ago)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day, `YYYY-MM-DD` (default: today)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// `daily`, `weekly`, `monthly` or `yearly`
    #[arg(long)]
    period: Option<ReportPeriod>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    product: Option<String>,
}

impl FilterArgs {
    fn into_patch(self) -> Result<ReportFiltersPatch, CliError> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(CliError::Invalid(
                "تاریخ شروع باید قبل از تاریخ پایان باشد".to_string(),
            ));
        }
        Ok(ReportFiltersPatch {
            start_date: self.from,
            end_date: self.to,
            period: self.period,
            category: self.category.map(|c| Some(CategoryId::new(c))),
            product: self.product.map(|p| Some(ProductId::new(p))),
        })
    }
}

pub async fn run(app: &App, command: ReportsCommand) -> Result<(), CliError> {
    app.require_admin().await?;
    let service = &app.reports;

    match command {
        ReportsCommand::Fetch(args) => {
            service.update_filters(args.into_patch()?).await?;
            print_chart("فروش", &service.sales_chart());
            print_chart("محصولات پرفروش", &service.top_products_chart());
            print_chart("دسته‌بندی‌ها", &service.category_chart());
        }
        ReportsCommand::Stats(args) => {
            service.update_filters(args.into_patch()?).await?;
            let stats = service.statistics();
            let sign = if stats.growth.is_positive { "+" } else { "-" };
            println!("درآمد کل: {:.0} تومان", stats.totals.revenue);
            println!("تعداد سفارش: {}", stats.totals.orders);
            println!("تعداد مشتری: {}", stats.totals.customers);
            println!("میانگین ارزش سفارش: {:.0} تومان", stats.averages.order_value);
            println!("میانگین درآمد روزانه: {:.0} تومان", stats.averages.daily_revenue);
            println!("میانگین سفارش روزانه: {:.1}", stats.averages.daily_orders);
            println!("رشد درآمد: {sign}{:.1}%", stats.growth.percentage.abs());
            println!(
                "مشتریان جدید: {} ({:.1}%)، بازگشتی: {} ({:.1}%)",
                stats.customers.new,
                stats.customers.new_percentage,
                stats.customers.returning,
                stats.customers.returning_percentage
            );
        }
        ReportsCommand::Export { format, filters } => {
            service.fetch_reports_data(Some(filters.into_patch()?)).await?;
            let path = match format {
                ExportFormat::Csv => service.export_to_csv().await?,
                ExportFormat::Pdf => service.export_to_pdf().await?,
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_chart(title: &str, chart: &ChartSeries) {
    println!("{title}");
    if chart.labels.is_empty() {
        println!("  (بدون داده)");
        return;
    }
    for (index, label) in chart.labels.iter().enumerate() {
        let values = chart
            .datasets
            .iter()
            .filter_map(|dataset| {
                dataset
                    .values
                    .get(index)
                    .map(|value| format!("{}: {value:.0}", dataset.label))
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {label:<12} {values}");
    }
}
