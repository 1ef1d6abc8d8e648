//! Authoritative product record as stored in the relational catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product row from the relational store.
///
/// The record is the source of truth for the search index: the corresponding
/// `ProductDocument` is disposable and fully reconstructible from it.
/// Records are created, updated, and deleted by upstream CRUD services;
/// the synchronizer only reads them.
///
/// # Fields
///
/// - `id`: Unique product identifier (primary key)
/// - `name`: Product display name (primary search field)
/// - `description`: Optional description text
/// - `price`: Unit price
/// - `quantity`: Units in stock
/// - `category_id`: Identifier of the product's category
/// - `brand`: Optional brand name
/// - `updated_at`: Last-modified marker, used for incremental sync
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub category_id: i64,
    pub brand: Option<String>,
    pub updated_at: DateTime<Utc>,
}
