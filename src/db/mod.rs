pub mod connection;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

pub use memory::MemoryStore;
pub use repository::PgStore;
pub use store::{ContentStore, ContentWriter, StoreError, StoreResult};
