use clap::Args;
use tani::orders::OrderId;
use tani_app::{context::AppContext, payment::TransferInstructions};

use super::tables::accounts_table;

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Order id
    id: u64,
}

pub(crate) async fn run(context: &AppContext, args: OrderArgs) -> Result<(), String> {
    let payment = context.payment();

    payment
        .load(OrderId::new(args.id), None)
        .await
        .map_err(|error| format!("failed to load order: {error}"))?;

    let state = payment.state();

    if let Some(order) = &state.order {
        println!("order: #{}", order.id);
        println!("recipient: {}", order.customer_name);
        println!("phone: {}", order.phone);
        println!("address: {}", order.shipping_address);

        if let Some(status) = &order.status {
            println!("status: {status}");
        }
    }

    if let Some(instructions) = payment.instructions() {
        println!();
        print_instructions(&instructions);
    }

    Ok(())
}

pub(crate) fn print_instructions(instructions: &TransferInstructions) {
    println!("transfer {} to one of:", instructions.amount);

    println!("{}", accounts_table(instructions.accounts));

    println!(
        "then upload the transfer receipt within {} hours",
        instructions.upload_window.as_secs() / 3_600
    );
}
