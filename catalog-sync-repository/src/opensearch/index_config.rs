//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product
//! search index.

use serde_json::{json, Value};

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The alias name for the search index (used for all operations).
    pub alias: String,
    /// The version number for the index (e.g., 0 for "products_v0").
    pub version: u32,
}

impl IndexConfig {
    /// Create a new index configuration.
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
        }
    }

    /// The versioned physical index name behind the alias.
    pub fn versioned_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

/// The base name of the search index (without version).
pub const INDEX_NAME: &str = "products";

/// Get the versioned index name.
///
/// # Arguments
///
/// * `version` - The version number (defaults to 0 if None)
///
/// # Returns
///
/// The versioned index name (e.g., "products_v0")
pub fn get_versioned_index_name(version: Option<u32>) -> String {
    let v = version.unwrap_or(0);
    format!("{}_v{}", INDEX_NAME, v)
}

/// Get the index settings and mappings for the product search index.
///
/// Field types follow the catalog schema: `name` and `description` are
/// full-text fields, `brand` is a keyword for exact filtering, and the
/// numeric fields support range queries and sorting.
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - no replicas (single-node deployments; raise for clusters)
pub fn get_index_settings(_version: Option<u32>) -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "long"
                },
                "name": {
                    "type": "text",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "description": {
                    "type": "text"
                },
                "price": {
                    "type": "float"
                },
                "quantity": {
                    "type": "long"
                },
                "category_id": {
                    "type": "long"
                },
                "brand": {
                    "type": "keyword"
                },
                "indexed_at": {
                    "type": "date"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings(None);

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        assert_eq!(settings["mappings"]["properties"]["name"]["type"], "text");
        assert_eq!(
            settings["mappings"]["properties"]["description"]["type"],
            "text"
        );
        assert_eq!(
            settings["mappings"]["properties"]["brand"]["type"],
            "keyword"
        );
        assert_eq!(settings["mappings"]["properties"]["price"]["type"], "float");
        assert_eq!(
            settings["mappings"]["properties"]["indexed_at"]["type"],
            "date"
        );
    }

    #[test]
    fn test_index_name() {
        assert_eq!(INDEX_NAME, "products");
    }

    #[test]
    fn test_versioned_index_name() {
        assert_eq!(get_versioned_index_name(None), "products_v0");
        assert_eq!(get_versioned_index_name(Some(0)), "products_v0");
        assert_eq!(get_versioned_index_name(Some(3)), "products_v3");
    }

    #[test]
    fn test_config_versioned_name() {
        let config = IndexConfig::new("products", 2);
        assert_eq!(config.versioned_name(), "products_v2");
    }
}
