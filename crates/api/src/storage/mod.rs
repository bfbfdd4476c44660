// Storage layer for timeline events and uploaded media

mod backend;
pub mod media_store;
pub mod models;
mod repositories;

pub use backend::StorageBackend;
pub use media_store::{DiskMediaStore, UPLOADS_URL_PREFIX};
pub use repositories::Database;
