pub mod client;
pub mod error;
pub mod models;
pub mod sync;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
