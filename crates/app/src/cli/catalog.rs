use clap::Args;
use tani::catalog::{CatalogFilters, CatalogLocation, SortKey};
use tani_app::{catalog::featured_products, context::AppContext};

use super::tables::products_table;

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Search text
    #[arg(long)]
    q: Option<String>,

    /// Sort order (terbaru, harga_asc, harga_desc)
    #[arg(long, default_value_t = SortKey::Newest)]
    sort: SortKey,

    /// Availability status, e.g. `tersedia`
    #[arg(long)]
    status: Option<String>,

    /// Page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Show the landing page's featured products instead
    #[arg(long, conflicts_with_all = ["q", "status", "page"])]
    featured: bool,
}

pub(crate) async fn run(context: &AppContext, args: CatalogArgs) -> Result<(), String> {
    if args.featured {
        let products = featured_products(context.api.as_ref())
            .await
            .map_err(|error| format!("failed to load featured products: {error}"))?;

        println!("{}", products_table(&products));

        return Ok(());
    }

    let location = CatalogLocation {
        filters: CatalogFilters {
            search: args.q.unwrap_or_default(),
            sort: args.sort,
            availability: args.status,
        },
        page: args.page.max(1),
    };

    let catalog = context.catalog();

    catalog
        .open(&location.to_query())
        .await
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    let state = catalog.state();

    if state.products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    println!("{}", products_table(&state.products));

    if let Some(meta) = &state.meta {
        println!();
        println!("page {} of {}", meta.current_page, meta.last_page);

        if let Some(total) = meta.total {
            println!("{total} products");
        }
    }

    let query = catalog.query_string();

    if !query.is_empty() {
        println!("query: ?{query}");
    }

    Ok(())
}
