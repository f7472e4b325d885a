use clap::Args;
use tani::orders::ShippingField;
use tani_app::{context::AppContext, payment::TransferInstructions};

use super::order::print_instructions;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name; defaults to the signed-in user's name
    #[arg(long)]
    name: Option<String>,

    /// Contact phone; defaults to the signed-in user's phone
    #[arg(long)]
    phone: Option<String>,

    /// Shipping address
    #[arg(long)]
    address: String,

    /// Note for the seller
    #[arg(long)]
    note: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let checkout = context.checkout();

    checkout
        .load()
        .await
        .map_err(|error| format!("failed to prepare checkout: {error}"))?;

    let fields = [
        (ShippingField::RecipientName, args.name),
        (ShippingField::Phone, args.phone),
        (ShippingField::Address, Some(args.address)),
        (ShippingField::Note, args.note),
    ];

    for (field, value) in fields {
        if let Some(value) = value {
            checkout.set_field(field, value);
        }
    }

    println!("total: {}", checkout.total());

    let order = checkout.submit().await.map_err(|error| {
        checkout
            .state()
            .error
            .unwrap_or_else(|| format!("failed to place order: {error}"))
    })?;

    println!("order #{} created", order.id);
    println!();
    print_instructions(&TransferInstructions::for_order(&order));

    Ok(())
}
