//! Typed client for the REST API plus the client-side state it drives: the
//! signed-in session, the packaging list view and the edit-form draft.

pub mod api;
pub mod config;
pub mod draft;
mod error;
pub mod list_state;
pub mod session;

pub use api::{ApiClient, AuthApi, ListPage, PackagingApi, PackagingQuery};
pub use config::ClientConfig;
pub use draft::{CountryList, FormTab, PackagingDraft};
pub use error::{ClientError, ClientResult};
pub use list_state::{PackagingListState, StatusTab};
pub use session::{FileTokenStore, MemoryTokenStore, Session, StoredSession, TokenStore};
