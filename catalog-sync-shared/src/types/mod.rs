//! Shared type definitions.

mod product_document;
mod product_record;

pub use product_document::ProductDocument;
pub use product_record::ProductRecord;
