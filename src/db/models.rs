use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type CustomerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Customer fields as supplied by the caller, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewCustomer {
    /// Build from raw form input. Empty optional fields become `None`.
    pub fn from_raw(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: non_empty(phone.into()),
            notes: non_empty(notes.into()),
        }
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            notes: self.notes,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
