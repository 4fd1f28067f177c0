use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// A user account ready to insert. `email` is expected in stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_first(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn create_user(&self, new: NewUser) -> DaoResult<user::Model> {
        self.create(user::ActiveModel {
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            name: Set(new.name),
            role: Set(new.role),
            last_login_at: Set(None),
            ..Default::default()
        })
        .await
    }

    pub async fn set_last_login(
        &self,
        id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> DaoResult<user::Model> {
        self.update(id, move |active| active.last_login_at = Set(Some(at)))
            .await
    }
}
