use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoLayerError, NewUser, UserDao},
    db::entities::user,
    error::AppError,
};

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        match self.user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Looks the email up in its stored form (trimmed, lower-case).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_email(&normalize_email(email)).await?)
    }

    /// Stores `new` with its email normalised. A taken email is a field error.
    pub async fn create_user(&self, new: NewUser) -> Result<user::Model, AppError> {
        let new = NewUser {
            email: normalize_email(&new.email),
            ..new
        };
        self.user_dao
            .create_user(new)
            .await
            .map_err(|err| match err {
                DaoLayerError::UniqueViolation { .. } => {
                    AppError::invalid_field("email", "Email already registered")
                }
                other => other.into(),
            })
    }

    pub async fn set_last_login(
        &self,
        user_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<user::Model, AppError> {
        Ok(self.user_dao.set_last_login(user_id, at).await?)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
