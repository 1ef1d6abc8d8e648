//! Product document types for the search index.
//!
//! This module defines the document structure that is indexed in the search
//! engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProductRecord;

/// Document representation for the search index.
///
/// This struct represents a product as it is stored in the search engine.
/// It is keyed by the product id and fully derived from a `ProductRecord`,
/// so re-indexing the same record always produces an equivalent document.
///
/// Optional fields (`description`, `brand`) are omitted from the serialized
/// document when absent rather than indexed as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDocument {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub indexed_at: DateTime<Utc>,
}

impl ProductDocument {
    /// Project an authoritative record into its search document.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_sync_shared::{ProductDocument, ProductRecord};
    /// use chrono::Utc;
    ///
    /// let record = ProductRecord {
    ///     id: 1,
    ///     name: "Espresso machine".to_string(),
    ///     description: None,
    ///     price: 249.99,
    ///     quantity: 12,
    ///     category_id: 3,
    ///     brand: Some("Rancilio".to_string()),
    ///     updated_at: Utc::now(),
    /// };
    /// let doc = ProductDocument::from_record(&record);
    /// assert_eq!(doc.id, record.id);
    /// ```
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            price: record.price,
            quantity: record.quantity,
            category_id: record.category_id,
            brand: record.brand.clone(),
            indexed_at: Utc::now(),
        }
    }

    /// Generate the document ID used in the search index.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            id: 42,
            name: "Pour-over kettle".to_string(),
            description: Some("Gooseneck, 1L".to_string()),
            price: 39.5,
            quantity: 7,
            category_id: 2,
            brand: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_record_copies_fields() {
        let record = sample_record();
        let doc = ProductDocument::from_record(&record);

        assert_eq!(doc.id, 42);
        assert_eq!(doc.name, record.name);
        assert_eq!(doc.description, record.description);
        assert_eq!(doc.price, record.price);
        assert_eq!(doc.quantity, record.quantity);
        assert_eq!(doc.category_id, record.category_id);
        assert!(doc.brand.is_none());
    }

    #[test]
    fn test_document_id() {
        let doc = ProductDocument::from_record(&sample_record());
        assert_eq!(doc.document_id(), "42");
    }

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let mut record = sample_record();
        record.description = None;
        record.brand = None;
        let doc = ProductDocument::from_record(&record);

        let json = serde_json::to_value(&doc).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("brand"));
        assert!(obj.contains_key("name"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let doc = ProductDocument::from_record(&sample_record());

        let json = serde_json::to_string(&doc).unwrap();
        let deserialized: ProductDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(doc.id, deserialized.id);
        assert_eq!(doc.name, deserialized.name);
        assert_eq!(doc.description, deserialized.description);
    }
}
