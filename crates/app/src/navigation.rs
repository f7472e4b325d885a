//! Navigation and confirmation seams.

use std::fmt::{Display, Formatter, Result as FmtResult};

use mockall::automock;
use tani::orders::{Order, OrderId};
use tracing::info;

/// Storefront destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing page
    Home,

    /// Sign-in page
    Login,

    /// Catalog
    Catalog,

    /// Cart
    Cart,

    /// Checkout form
    Checkout,

    /// Product detail page
    Product {
        /// Product slug
        slug: String,
    },

    /// Payment instructions for an order
    Payment {
        /// Order to pay for
        order: OrderId,

        /// The order itself when the caller already has it
        carried: Option<Box<Order>>,
    },

    /// Order history
    Orders,
}

impl Route {
    /// Payment page carrying the freshly created order.
    pub fn payment_for(order: Order) -> Self {
        Self::Payment {
            order: order.id,
            carried: Some(Box::new(order)),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Home => f.write_str("/"),
            Self::Login => f.write_str("/login"),
            Self::Catalog => f.write_str("/katalog"),
            Self::Cart => f.write_str("/keranjang"),
            Self::Checkout => f.write_str("/checkout"),
            Self::Product { slug } => write!(f, "/pupuk/{slug}"),
            Self::Payment { order, .. } => write!(f, "/payment/{order}"),
            Self::Orders => f.write_str("/pesanan"),
        }
    }
}

/// Moves the user to another page.
#[automock]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Asks the user to confirm a destructive action.
#[automock]
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Navigator that only records where the user would have gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigate");
    }
}

/// Confirms every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_render_as_paths() {
        assert_eq!(Route::Cart.to_string(), "/keranjang");
        assert_eq!(
            Route::Product {
                slug: "urea-46".into()
            }
            .to_string(),
            "/pupuk/urea-46"
        );
        assert_eq!(
            Route::Payment {
                order: OrderId::new(12),
                carried: None
            }
            .to_string(),
            "/payment/12"
        );
    }
}
