//! Users

use serde::{Deserialize, Serialize};

use crate::{ids::TypedId, records::UserRecord};

/// User Id
pub type UserId = TypedId<User>;

/// Signed-in customer, as returned by `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord", into = "UserRecord")]
pub struct User {
    /// Backend id
    pub id: UserId,

    /// Display name
    pub name: Option<String>,

    /// Contact phone (`phone`, else `nomor_whatsapp`)
    pub phone: Option<String>,

    /// Email address
    pub email: Option<String>,
}
