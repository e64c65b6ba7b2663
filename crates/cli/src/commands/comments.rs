//! Comment moderation commands (admin accounts only).
//!
//! # Usage
//!
//! ```bash
//! dokan comments list --status pending --search "ارسال" --sort-by rating --order asc
//! dokan comments approve 65f1c0a2
//! dokan comments bulk spam 65f1c0a2 65f1c0b7
//! dokan comments stats
//! dokan comments export csv
//! ```

use clap::{Args, Subcommand};
use dokan_admin::models::{
    BulkAction, Comment, CommentFiltersPatch, CommentSortField, ExportFormat, StatusFilter,
};
use dokan_core::{CommentId, SortOrder};

use crate::app::App;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum CommentsCommand {
    /// Fetch and list the moderation queue
    List(ListArgs),
    /// Show one comment
    Show { id: String },
    /// Approve a comment
    Approve { id: String },
    /// Reject a comment
    Reject { id: String },
    /// Mark a comment as spam
    Spam { id: String },
    /// Delete a comment
    Delete { id: String },
    /// Edit a comment's text
    Edit { id: String, content: String },
    /// Publish the shop's answer to a comment
    Reply { id: String, reply: String },
    /// Apply approve, reject, spam or delete to several comments
    Bulk {
        action: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Status counts over the fetched queue
    Stats(ListArgs),
    /// Server-side comment analytics
    Analytics,
    /// Download the queue as a file
    Export {
        #[arg(default_value = "csv")]
        format: ExportFormat,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// `all`, `pending`, `approved`, `rejected` or `spam`
    #[arg(long)]
    status: Option<StatusFilter>,

    #[arg(long)]
    search: Option<String>,

    /// `createdAt`, `rating`, `user`, `product`, `status` or `content`
    #[arg(long)]
    sort_by: Option<CommentSortField>,

    /// `asc` or `desc`
    #[arg(long)]
    order: Option<SortOrder>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    limit: Option<u32>,
}

impl From<ListArgs> for CommentFiltersPatch {
    fn from(args: ListArgs) -> Self {
        Self {
            status: args.status,
            search: args.search,
            sort_by: args.sort_by,
            sort_order: args.order,
            page: args.page,
            limit: args.limit,
        }
    }
}

pub async fn run(app: &App, command: CommentsCommand) -> Result<(), CliError> {
    app.require_admin().await?;
    let service = &app.comments;

    match command {
        CommentsCommand::List(args) => {
            service.fetch_comments(Some(args.into())).await?;
            let comments = service.paginated_comments();
            if comments.is_empty() {
                println!("نظری یافت نشد");
            }
            for comment in &comments {
                print_summary(comment);
            }
            let filters = service.filters();
            println!(
                "صفحه {} از {} ({} نظر)",
                filters.page,
                service.total_pages(),
                service.state().pagination.total
            );
        }
        CommentsCommand::Show { id } => {
            let comment = service.get_comment(&CommentId::new(id)).await?;
            print_detail(&comment);
        }
        CommentsCommand::Approve { id } => {
            service.approve_comment(&CommentId::new(id)).await?;
        }
        CommentsCommand::Reject { id } => {
            service.reject_comment(&CommentId::new(id)).await?;
        }
        CommentsCommand::Spam { id } => {
            service.mark_as_spam(&CommentId::new(id)).await?;
        }
        CommentsCommand::Delete { id } => {
            service.delete_comment(&CommentId::new(id)).await?;
        }
        CommentsCommand::Edit { id, content } => {
            if content.trim().is_empty() {
                return Err(CliError::Invalid("متن نظر نمی‌تواند خالی باشد".to_string()));
            }
            let comment = service.update_comment(&CommentId::new(id), &content).await?;
            print_detail(&comment);
        }
        CommentsCommand::Reply { id, reply } => {
            if reply.trim().is_empty() {
                return Err(CliError::Invalid("متن پاسخ نمی‌تواند خالی باشد".to_string()));
            }
            service.reply_to_comment(&CommentId::new(id), &reply).await?;
        }
        CommentsCommand::Bulk { action, ids } => {
            let ids: Vec<CommentId> = ids.into_iter().map(CommentId::new).collect();
            service
                .bulk_action(&ids, &BulkAction::from(action.as_str()))
                .await?;
        }
        CommentsCommand::Stats(args) => {
            service.fetch_comments(Some(args.into())).await?;
            let stats = service.statistics();
            println!("کل نظرات: {}", stats.total);
            for (label, count, percentage) in [
                ("در انتظار بررسی", stats.pending, stats.pending_percentage),
                ("تایید شده", stats.approved, stats.approved_percentage),
                ("رد شده", stats.rejected, stats.rejected_percentage),
                ("اسپم", stats.spam, stats.spam_percentage),
            ] {
                println!("  {label}: {count} ({percentage:.1}%)");
            }
        }
        CommentsCommand::Analytics => {
            let analytics = service.fetch_analytics().await?;
            println!("کل نظرات: {}", analytics.total_comments);
            if let Some(rating) = analytics.average_rating {
                println!("میانگین امتیاز: {rating:.2}");
            }
            for (stars, count) in &analytics.rating_distribution {
                println!("  {stars} ستاره: {count}");
            }
            for day in &analytics.comments_by_day {
                println!("  {}: {}", day.date, day.count);
            }
        }
        CommentsCommand::Export { format } => {
            let path = service.export_comments(format).await?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_summary(comment: &Comment) {
    let rating = comment
        .rating
        .map_or_else(String::new, |r| "★".repeat(usize::from(r)));
    println!(
        "{}  [{}] {:<5} {} / {}: {}",
        comment.id,
        comment.status.label(),
        rating,
        comment.author_name(),
        comment.product_name(),
        comment.content
    );
}

fn print_detail(comment: &Comment) {
    print_summary(comment);
    println!("  ثبت: {}", comment.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(reply) = &comment.admin_reply {
        println!("  پاسخ فروشگاه: {}", reply.content);
    }
}
