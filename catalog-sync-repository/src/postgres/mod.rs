//! PostgreSQL implementations of the store traits.
//!
//! Provides read access to the authoritative `products` table and watermark
//! persistence in a `sync_state` table.

mod product_store;
mod sync_state;

pub use product_store::PostgresProductStore;
pub use sync_state::PostgresSyncStateStore;
