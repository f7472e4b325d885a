//! Proof-of-payment upload seam.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use tani::orders::OrderId;
use thiserror::Error;

/// Transfer receipt image picked by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// What the upload endpoint answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProofUploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Sends a payment proof for an order. The upload form itself lives outside
/// this crate.
#[automock]
#[async_trait]
pub trait ProofUploader: Send + Sync {
    async fn upload(
        &self,
        order: OrderId,
        proof: PaymentProof,
    ) -> Result<UploadReceipt, ProofUploadError>;
}
