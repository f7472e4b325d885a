//! reqwest-backed storefront client.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};
use tani::{
    cart::{CartItem, CartItemId, NewCartItem, Quantity},
    catalog::ProductQuery,
    envelope::{ListBody, UserBody},
    orders::{NewOrder, Order, OrderId},
    pagination::Paginated,
    products::Product,
    users::User,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    api::{errors::ApiError, service::StorefrontApi},
    config::ApiConfig,
};

/// HTTP client for the storefront REST backend.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: Url,
    token: Option<String>,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a new client from validated configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            base_url: config.base_url,
            token: config.token,
            http: Client::new(),
        }
    }

    /// Base URL with `segments` appended as percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "sending storefront request");

        let request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send the request and return the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = ApiError::from_response(status, &body);

            warn!(%status, error = %error, "storefront request failed");

            return Err(error);
        }

        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_slice(&body).map_err(|error| {
            warn!(%error, "unexpected storefront response body");

            ApiError::Decode(error)
        })
    }
}

/// Singular resource, wrapped in `{ "data": … }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint(&["user"])?;
        let body: UserBody = self.fetch(self.request(Method::GET, url)).await?;

        Ok(body.into_user())
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>, ApiError> {
        let url = self.endpoint(&["keranjang"])?;
        let body: ListBody<CartItem> = self.fetch(self.request(Method::GET, url)).await?;

        Ok(body.into_items())
    }

    async fn add_cart_item(&self, item: NewCartItem) -> Result<(), ApiError> {
        let url = self.endpoint(&["keranjang"])?;

        self.send(self.request(Method::POST, url).json(&item))
            .await?;

        Ok(())
    }

    async fn update_cart_item(&self, id: CartItemId, quantity: Quantity) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["keranjang", &id])?;
        let body = serde_json::json!({ "quantity": quantity });

        self.send(self.request(Method::PUT, url).json(&body))
            .await?;

        Ok(())
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["keranjang", &id])?;

        self.send(self.request(Method::DELETE, url)).await?;

        Ok(())
    }

    async fn list_products(&self, query: ProductQuery) -> Result<Paginated<Product>, ApiError> {
        let url = self.endpoint(&["pupuk"])?;

        self.fetch(self.request(Method::GET, url).query(&query))
            .await
    }

    async fn product(&self, slug: String) -> Result<Product, ApiError> {
        let url = self.endpoint(&["pupuk", &slug])?;
        let body: Single<Product> = self.fetch(self.request(Method::GET, url)).await?;

        Ok(body.into_inner())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError> {
        let url = self.endpoint(&["pesanan"])?;
        let body: Single<Order> = self
            .fetch(self.request(Method::POST, url).json(&order))
            .await?;

        Ok(body.into_inner())
    }

    async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&["pesanan", &id])?;
        let body: Single<Order> = self.fetch(self.request(Method::GET, url)).await?;

        Ok(body.into_inner())
    }
}
