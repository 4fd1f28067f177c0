#[allow(unused_imports)]
pub mod prelude {
    pub use super::packaging::Entity as Packaging;
    pub use super::product::Entity as Product;
    pub use super::user::Entity as User;
}

pub mod packaging;
pub mod product;
pub mod types;
pub mod user;
