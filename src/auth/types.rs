use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored on the user row as lower-case text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role; anything unrecognised is a plain user.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    /// Roles carried in the token of a user whose stored role is `self`.
    pub fn granted(self) -> Vec<Role> {
        match self {
            Role::User => vec![Role::User],
            Role::Admin => vec![Role::Admin, Role::User],
        }
    }
}

/// JWT payload. `exp` and `iat` are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub roles: Vec<Role>,
}

impl Claims {
    /// The acting user's id.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
