//! Cart commands. These never contact the server.
//!
//! # Usage
//!
//! ```bash
//! dokan cart add -i p1 -n "Tea Glass" --price 250000 -q 2 --color red --size M
//! dokan cart update -i p1 -q 5 --color red
//! dokan cart remove -i p1
//! dokan cart show
//! dokan cart clear
//! ```

use clap::Subcommand;
use dokan_core::{Price, ProductId};
use dokan_storefront::models::CartItem;
use rust_decimal::Decimal;

use crate::app::App;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add an item; identical (product, color, size) lines are merged
    Add {
        #[arg(short = 'i', long)]
        product_id: String,

        #[arg(short, long)]
        name: String,

        /// Unit price in tomans
        #[arg(long)]
        price: Decimal,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove lines of a product; omitted color/size match any
    Remove {
        #[arg(short = 'i', long)]
        product_id: String,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,
    },
    /// Set the quantity of matching lines; zero or less removes them
    Update {
        #[arg(short = 'i', long)]
        product_id: String,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        size: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// List the cart lines and total
    Show,
}

pub fn run(app: &App, command: CartCommand) -> Result<(), CliError> {
    let cart = &app.cart;
    match command {
        CartCommand::Add {
            product_id,
            name,
            price,
            quantity,
            color,
            size,
            image,
        } => {
            if price.is_sign_negative() {
                return Err(CliError::Invalid("قیمت نمی‌تواند منفی باشد".to_string()));
            }
            cart.add_to_cart(CartItem {
                product_id: ProductId::new(product_id),
                name,
                price,
                image,
                quantity,
                color,
                size,
            })?;
            println!("محصول به سبد خرید اضافه شد");
        }
        CartCommand::Remove {
            product_id,
            color,
            size,
        } => {
            cart.remove_from_cart(
                &ProductId::new(product_id),
                color.as_deref(),
                size.as_deref(),
            )?;
        }
        CartCommand::Update {
            product_id,
            quantity,
            color,
            size,
        } => {
            cart.update_quantity(
                &ProductId::new(product_id),
                quantity,
                color.as_deref(),
                size.as_deref(),
            )?;
        }
        CartCommand::Clear => {
            cart.clear_cart()?;
            println!("سبد خرید خالی شد");
            return Ok(());
        }
        CartCommand::Show => {}
    }

    print_cart(app);
    Ok(())
}

fn print_cart(app: &App) {
    let items = app.cart.items();
    if items.is_empty() {
        println!("سبد خرید خالی است");
        return;
    }

    for item in &items {
        let variant = [item.color.as_deref(), item.size.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");
        println!(
            "{:<12} {:<30} {:<12} x{:<4} {}",
            item.product_id,
            item.name,
            variant,
            item.quantity,
            Price::toman(item.line_total()).display()
        );
    }
    println!(
        "{} قلم، جمع کل: {}",
        app.cart.get_cart_items_count(),
        app.cart.total_price().display()
    );
}
