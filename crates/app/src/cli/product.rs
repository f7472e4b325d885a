use clap::Args;
use tani_app::{context::AppContext, detail::DetailState};

use super::tables::products_table;

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product slug
    slug: String,

    /// Add this many units to the cart after loading
    #[arg(long)]
    add: Option<i64>,
}

pub(crate) async fn run(context: &AppContext, args: ProductArgs) -> Result<(), String> {
    let detail = context.product_detail();

    detail
        .load(&args.slug)
        .await
        .map_err(|error| format!("failed to load product: {error}"))?;

    let DetailState {
        product,
        related,
        related_error,
        ..
    } = detail.state();

    let Some(product) = product else {
        return Err(format!("product {} not found", args.slug));
    };

    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("availability: {}", product.availability.label());
    println!(
        "stock: {}",
        product
            .stock
            .map_or_else(|| "unknown".to_string(), |stock| stock.to_string())
    );

    if let Some(category) = &product.category {
        println!("category: {}", category.name);
    }

    println!("image: {}", product.image_url_or_placeholder());

    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }

    if let Some(error) = related_error {
        println!();
        println!("{error}");
    } else if !related.is_empty() {
        println!();
        println!("related:");
        println!("{}", products_table(&related));
    }

    if let Some(quantity) = args.add {
        detail.set_quantity(quantity);

        let result = detail.add_to_cart().await;

        if let Some(feedback) = detail.feedback() {
            println!();
            println!("{}", feedback.message);
        }

        result.map_err(|error| format!("failed to add to cart: {error}"))?;
    }

    Ok(())
}
