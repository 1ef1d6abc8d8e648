//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesExistsParts, IndicesGetMappingParts, IndicesPutAliasParts,
    },
    DeleteParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use catalog_sync_shared::ProductDocument;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::{BatchOperationResult, BatchOperationSummary};

/// OpenSearch provider implementation.
///
/// Writes product documents into a versioned index (`products_v{N}`) reached
/// through a stable alias, so future mapping changes can be rolled out by
/// reindexing into a new version and flipping the alias.
///
/// # Example
///
/// ```ignore
/// use catalog_sync_repository::opensearch::{IndexConfig, OpenSearchProvider};
///
/// let config = IndexConfig::new("products", 0);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config)?;
/// provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Check whether the physical index exists.
    async fn index_exists(&self, index_name: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    /// Fetch the current mapping of an existing index.
    async fn fetch_mappings(&self, index_name: &str) -> Result<Value, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        Ok(body[index_name]["mappings"].clone())
    }

    /// Create the versioned index with the product mapping.
    async fn create_index(&self, index_name: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(get_index_settings(Some(self.index_config.version)))
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // A concurrent creator beat us to it; the mapping check on the
            // next ensure call will still catch real conflicts.
            if error_body.contains("resource_already_exists_exception") {
                debug!(index = %index_name, "Index was created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index_name, "Created search index");
        Ok(())
    }

    /// Point the alias at the versioned index.
    async fn ensure_alias(&self, index_name: &str) -> Result<(), SearchIndexError> {
        // Alias and physical name coincide when version suffixing is the
        // same string; skip the no-op call.
        if index_name == self.index_config.alias {
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(
                &[index_name],
                &self.index_config.alias,
            ))
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Alias creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Alias failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index_name, alias = %self.index_config.alias, "Alias ensured");
        Ok(())
    }
}

/// Compare an existing index mapping against the expected one.
///
/// Every expected field must be present with the same type; a missing field
/// or a type mismatch is a schema conflict that requires an operator-driven
/// reindex into a new index version. Extra fields in the index are
/// tolerated.
fn check_mapping_compatibility(
    existing: &Value,
    expected: &Value,
) -> Result<(), SearchIndexError> {
    let expected_props = expected["mappings"]["properties"]
        .as_object()
        .ok_or_else(|| SearchIndexError::parse("expected mapping has no properties"))?;
    let existing_props = match existing["properties"].as_object() {
        Some(props) => props,
        None => {
            return Err(SearchIndexError::schema_conflict(
                "<mappings>",
                "object",
                "missing",
            ))
        }
    };

    for (field, expected_def) in expected_props {
        let expected_type = expected_def["type"].as_str().unwrap_or("object");
        match existing_props.get(field) {
            None => {
                return Err(SearchIndexError::schema_conflict(
                    field,
                    expected_type,
                    "missing",
                ));
            }
            Some(existing_def) => {
                let actual_type = existing_def["type"].as_str().unwrap_or("object");
                if actual_type != expected_type {
                    return Err(SearchIndexError::schema_conflict(
                        field,
                        expected_type,
                        actual_type,
                    ));
                }
            }
        }
    }

    Ok(())
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    /// Ensure the versioned index and its alias exist.
    ///
    /// Idempotent: if the index already exists its mapping is validated
    /// against the expected schema and no creation call is issued. An
    /// unreachable backend surfaces as `Connectivity`, which callers treat
    /// as non-fatal at startup.
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        let index_name = self.index_config.versioned_name();

        if self.index_exists(&index_name).await? {
            let existing = self.fetch_mappings(&index_name).await?;
            check_mapping_compatibility(&existing, &get_index_settings(None))?;
            debug!(index = %index_name, "Index already exists with compatible mapping");
            return Ok(());
        }

        self.create_index(&index_name).await?;
        self.ensure_alias(&index_name).await
    }

    /// Insert or overwrite a document, keyed by product id.
    ///
    /// The document is fully derived from its record, so a whole-document
    /// write is used rather than a partial update: re-running the same
    /// upsert always converges to the same index state.
    async fn upsert_document(&self, document: &ProductDocument) -> Result<(), SearchIndexError> {
        let doc_id = document.document_id();
        let body = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let response = self
            .client
            .index(IndexParts::IndexId(&self.index_config.alias, &doc_id))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Upsert request failed");
            return Err(SearchIndexError::upsert(format!(
                "Upsert failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document upserted");
        Ok(())
    }

    /// Upsert multiple documents, collecting per-document outcomes.
    async fn bulk_upsert_documents(
        &self,
        documents: &[ProductDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let mut results = Vec::with_capacity(documents.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for document in documents {
            match SearchIndexProvider::upsert_document(self, document).await {
                Ok(()) => {
                    succeeded += 1;
                    results.push(BatchOperationResult {
                        record_id: document.id,
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    results.push(BatchOperationResult {
                        record_id: document.id,
                        success: false,
                        error: Some(e),
                    });
                }
            }
        }

        Ok(BatchOperationSummary {
            total: documents.len(),
            succeeded,
            failed,
            results,
        })
    }

    /// Delete a document from the search index.
    ///
    /// A 404 is treated as success; the record may never have been indexed.
    async fn delete_document(&self, record_id: i64) -> Result<(), SearchIndexError> {
        let doc_id = record_id.to_string();

        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.alias, &doc_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connectivity(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %doc_id, "Document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_compatibility_identical() {
        let expected = get_index_settings(None);
        let existing = expected["mappings"].clone();
        assert!(check_mapping_compatibility(&existing, &expected).is_ok());
    }

    #[test]
    fn test_mapping_compatibility_extra_fields_tolerated() {
        let expected = get_index_settings(None);
        let mut existing = expected["mappings"].clone();
        existing["properties"]["vendor_notes"] = json!({ "type": "text" });
        assert!(check_mapping_compatibility(&existing, &expected).is_ok());
    }

    #[test]
    fn test_mapping_compatibility_type_mismatch() {
        let expected = get_index_settings(None);
        let mut existing = expected["mappings"].clone();
        existing["properties"]["price"] = json!({ "type": "keyword" });

        let err = check_mapping_compatibility(&existing, &expected).unwrap_err();
        match err {
            SearchIndexError::SchemaConflict {
                field,
                expected,
                actual,
            } => {
                assert_eq!(field, "price");
                assert_eq!(expected, "float");
                assert_eq!(actual, "keyword");
            }
            other => panic!("expected SchemaConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_compatibility_missing_field() {
        let expected = get_index_settings(None);
        let mut existing = expected["mappings"].clone();
        existing["properties"]
            .as_object_mut()
            .unwrap()
            .remove("brand");

        let err = check_mapping_compatibility(&existing, &expected).unwrap_err();
        assert!(matches!(err, SearchIndexError::SchemaConflict { .. }));
    }

    #[test]
    fn test_mapping_compatibility_empty_existing() {
        let expected = get_index_settings(None);
        let existing = json!({});
        assert!(check_mapping_compatibility(&existing, &expected).is_err());
    }
}
