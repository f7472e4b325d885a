use std::sync::Arc;

use clap::{Parser, Subcommand};
use tani_app::{
    config::ClientConfig, context::AppContext, navigation::LoggingNavigator, observability,
};

mod cart;
mod catalog;
mod checkout;
mod order;
mod product;
mod tables;

#[derive(Debug, Parser)]
#[command(name = "tani-app", about = "Tani storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog(catalog::CatalogArgs),

    /// Show one product and related products
    Product(product::ProductArgs),

    /// Show or change the cart
    Cart(cart::CartCommand),

    /// Turn the cart into an order
    Checkout(checkout::CheckoutArgs),

    /// Show payment instructions for an order
    Order(order::OrderArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config, Arc::new(LoggingNavigator))
            .map_err(|error| format!("invalid configuration: {error}"))?;

        match self.command {
            Commands::Catalog(args) => catalog::run(&context, args).await,
            Commands::Product(args) => product::run(&context, args).await,
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Order(args) => order::run(&context, args).await,
        }
    }
}
