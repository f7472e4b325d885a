//! Response envelopes

use std::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use crate::users::User;

/// `{ "data": … }` wrapper for singular resources.
#[derive(Debug, Clone, Deserialize)]
pub struct Data<T> {
    /// Wrapped resource
    pub data: T,
}

/// List body, either a bare array or `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    /// `[...]`
    Bare(Vec<T>),

    /// `{ "data": [...] }`
    Wrapped {
        /// Items
        data: Vec<T>,
    },
}

impl<T> ListBody<T> {
    /// Unwrap into the items.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// `GET /user` body: `{ "user": … }`, `{ "data": … }` or the bare user.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserBody {
    /// `{ "user": … }`
    Named {
        /// The user
        user: User,
    },

    /// `{ "data": … }`
    Wrapped {
        /// The user
        data: User,
    },

    /// Bare user object
    Bare(User),
}

impl UserBody {
    /// Unwrap into the user.
    pub fn into_user(self) -> User {
        match self {
            Self::Named { user } | Self::Wrapped { data: user } | Self::Bare(user) => user,
        }
    }
}

/// Error body: `{ "message": "...", "errors": { "field": ["..."] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Primary message
    #[serde(default)]
    pub message: Option<String>,

    /// Per-field validation messages
    #[serde(default)]
    pub errors: FieldErrors,
}

/// Per-field validation messages, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    /// Build from `(field, messages)` pairs.
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self(entries)
    }

    /// Whether there are no field errors.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Every message of every field, flattened in order.
    pub fn flattened(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .flat_map(|(_, messages)| messages.iter().map(String::as_str))
    }

    /// First message of the first field.
    pub fn first(&self) -> Option<&str> {
        self.flattened().next()
    }

    /// Messages for one field.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, messages)| messages.as_slice())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorsVisitor;

        impl<'de> Visitor<'de> for FieldErrorsVisitor {
            type Value = FieldErrors;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of field names to messages")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(FieldErrors::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());

                while let Some((field, messages)) = map.next_entry::<String, OneOrMany>()? {
                    let messages = match messages {
                        OneOrMany::One(message) => vec![message],
                        OneOrMany::Many(messages) => messages,
                    };

                    entries.push((field, messages));
                }

                Ok(FieldErrors(entries))
            }
        }

        deserializer.deserialize_any(FieldErrorsVisitor)
    }
}
