pub mod api;
mod entry;

pub use entry::{API_PREFIX, app, router};
