use sea_orm::DatabaseConnection;

use super::{DaoBase, PackagingDao, ProductDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn product(&self) -> ProductDao {
        DaoBase::new(&self.db)
    }

    pub fn packaging(&self) -> PackagingDao {
        DaoBase::new(&self.db)
    }
}
