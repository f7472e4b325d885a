use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};
use tani::{
    cart::{CartItemId, Quantity},
    products::ProductId,
};
use tani_app::{
    cart::{CartSnapshot, QuantityOutcome, RemoveOutcome},
    context::AppContext,
    navigation::{AssumeYes, Confirmation},
};

use super::tables::cart_table;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List cart items and the subtotal
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Change an item's quantity
    Set(SetArgs),

    /// Remove an item
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    product_id: u64,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Cart item id
    item_id: u64,

    /// New quantity; values below one are raised to one
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Cart item id
    item_id: u64,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let cart = &context.cart;

    cart.refresh()
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let quantity =
                Quantity::new(args.quantity).ok_or("quantity must be at least 1".to_string())?;

            cart.add(ProductId::new(args.product_id), quantity)
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?;
        }
        CartSubcommand::Set(args) => {
            let outcome = cart
                .update_quantity(CartItemId::new(args.item_id), args.quantity)
                .await
                .map_err(|error| format!("failed to update item: {error}"))?;

            if outcome == QuantityOutcome::Unchanged {
                println!("quantity unchanged");
            }
        }
        CartSubcommand::Remove(args) => {
            let confirmation: &dyn Confirmation = if args.yes {
                &AssumeYes
            } else {
                &StdinConfirmation
            };

            let outcome = cart
                .remove_item(CartItemId::new(args.item_id), confirmation)
                .await
                .map_err(|error| format!("failed to remove item: {error}"))?;

            if outcome == RemoveOutcome::Declined {
                println!("kept item {}", args.item_id);
            }
        }
    }

    print_cart(&cart.snapshot());

    Ok(())
}

fn print_cart(snapshot: &CartSnapshot) {
    if let Some(notice) = &snapshot.notice {
        println!("{notice}");
    }

    if snapshot.lines.is_empty() {
        println!("cart is empty");
        return;
    }

    println!("{}", cart_table(snapshot));
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");

        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();

        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
