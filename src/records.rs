//! Wire records
//!
//! Field names follow the backend. Records are converted into the domain
//! models on decode, resolving the naming fallbacks the backend is known to
//! use (`nama_pupuk`/`nama`, `phone`/`nomor_whatsapp`).

use serde::{Deserialize, Serialize};

use crate::{
    prices::Rupiah,
    products::{Availability, Category, CategoryId, Product, ProductId},
    users::{User, UserId},
};

const DEFAULT_PRODUCT_NAME: &str = "Pupuk";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProductRecord {
    id: ProductId,

    #[serde(default)]
    slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nama_pupuk: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nama: Option<String>,

    #[serde(default)]
    harga: Rupiah,

    #[serde(default)]
    deskripsi: Option<String>,

    #[serde(default)]
    gambar_utama: Option<String>,

    #[serde(default)]
    status_ketersediaan: Option<String>,

    #[serde(default)]
    stok: Option<u64>,

    #[serde(default)]
    kategori: Option<Category>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            name: first_present(record.nama_pupuk, record.nama)
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
            price: record.harga,
            description: record.deskripsi,
            image_url: record.gambar_utama,
            availability: Availability::from(record.status_ketersediaan),
            stock: record.stok,
            category: record.kategori,
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let status = product.availability.label();

        Self {
            id: product.id,
            slug: product.slug,
            status_ketersediaan: (!status.is_empty()).then(|| status.to_string()),
            nama_pupuk: Some(product.name),
            nama: None,
            harga: product.price,
            deskripsi: product.description,
            gambar_utama: product.image_url,
            stok: product.stock,
            kategori: product.category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CategoryRecord {
    id: CategoryId,

    #[serde(default)]
    slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nama_kategori: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nama: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            name: first_present(record.nama_kategori, record.nama).unwrap_or_default(),
        }
    }
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            nama_kategori: Some(category.name),
            nama: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserRecord {
    id: UserId,

    #[serde(default)]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nomor_whatsapp: Option<String>,

    #[serde(default)]
    email: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            phone: first_present(record.phone, record.nomor_whatsapp),
            email: record.email,
        }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            nomor_whatsapp: None,
            email: user.email,
        }
    }
}

/// First non-blank value, mirroring the backend's `a || b` fallbacks.
fn first_present(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|value| !value.trim().is_empty())
        .or(fallback.filter(|value| !value.trim().is_empty()))
}
