//! DynamoStore - DynamoDB-backed visit storage.
//!
//! # Schema
//!
//! One table, keyed by country name:
//!
//! ```text
//! Country  S  (partition key)
//! Visit    N  (running visit count)
//! ```
//!
//! Increments for existing records go through an `UpdateItem` expression and
//! are atomic per record. Creation of a brand-new record is a separate
//! `GetItem` existence check followed by a `PutItem`; two concurrent first
//! visits to the same country can race on that pair and lose an update.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use tracing::info;

use super::{StoreError, StoreResult, VisitRecord, VisitStore};

/// Partition key attribute.
const ATTR_COUNTRY: &str = "Country";

/// Visit counter attribute.
const ATTR_VISIT: &str = "Visit";

// =============================================================================
// DynamoStore
// =============================================================================

/// Visit store backed by a DynamoDB table.
pub struct DynamoStore {
    table_name: String,
    client: Client,
}

impl DynamoStore {
    /// Create a store for `table_name`, loading AWS configuration from the
    /// environment (region, credentials).
    ///
    /// # Panics
    /// Panics if `table_name` is empty.
    pub async fn new(table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        assert!(!table_name.is_empty(), "table name cannot be empty");

        info!("Initializing DynamoDB client for table: {table_name}");
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            table_name,
            client: Client::new(&config),
        }
    }

    /// Create a store from an existing client.
    ///
    /// Useful when sharing one client across stores, or pointing at a local
    /// DynamoDB endpoint.
    #[must_use]
    pub fn from_client(table_name: impl Into<String>, client: Client) -> Self {
        let table_name = table_name.into();
        assert!(!table_name.is_empty(), "table name cannot be empty");
        Self { table_name, client }
    }

    /// True if no record exists for `country` yet.
    async fn is_new_country(&self, country: &str) -> StoreResult<bool> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_COUNTRY, AttributeValue::S(country.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::service("get item", country, DisplayErrorContext(&e)))?;
        Ok(out.item().is_none())
    }

    /// Insert a fresh record with count 1.
    async fn put_country(&self, country: &str) -> StoreResult<u64> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(ATTR_COUNTRY, AttributeValue::S(country.to_string()))
            .item(ATTR_VISIT, AttributeValue::N("1".to_string()))
            .send()
            .await
            .map_err(|e| StoreError::service("put new item", country, DisplayErrorContext(&e)))?;
        Ok(1)
    }
}

#[async_trait]
impl VisitStore for DynamoStore {
    async fn save(&self, country: &str) -> StoreResult<u64> {
        // Not transactional with the put below; see module docs.
        if self.is_new_country(country).await? {
            return self.put_country(country).await;
        }

        let out = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_COUNTRY, AttributeValue::S(country.to_string()))
            .update_expression("SET Visit = Visit + :incr")
            .expression_attribute_values(":incr", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| StoreError::service("update item", country, DisplayErrorContext(&e)))?;

        let attrs = out
            .attributes()
            .ok_or_else(|| StoreError::corrupt(country, "update returned no attributes"))?;
        parse_visit(country, attrs)
    }

    async fn results(&self) -> StoreResult<Vec<VisitRecord>> {
        let mut records = Vec::new();
        let mut pages = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send();
        while let Some(item) = pages.next().await {
            let item = item.map_err(|e| {
                StoreError::service("scan", self.table_name.as_str(), DisplayErrorContext(&e))
            })?;
            records.push(parse_record(&item)?);
        }
        Ok(records)
    }

    async fn unique_total(&self) -> StoreResult<u64> {
        let records = self.results().await?;
        Ok(records.iter().filter(|r| r.visits > 0).count() as u64)
    }
}

// =============================================================================
// Item Parsing
// =============================================================================

/// Parse the `Visit` counter out of an item or update result.
fn parse_visit(key: &str, item: &HashMap<String, AttributeValue>) -> StoreResult<u64> {
    let visit = item
        .get(ATTR_VISIT)
        .ok_or_else(|| StoreError::corrupt(key, "missing Visit attribute"))?;
    let raw = visit
        .as_n()
        .map_err(|_| StoreError::corrupt(key, "Visit attribute is not a number"))?;
    raw.parse::<u64>()
        .map_err(|e| StoreError::corrupt(key, format!("Visit attribute {raw}: {e}")))
}

/// Parse a scanned item into a [`VisitRecord`].
fn parse_record(item: &HashMap<String, AttributeValue>) -> StoreResult<VisitRecord> {
    let country = item
        .get(ATTR_COUNTRY)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::corrupt("<scan>", "missing Country attribute"))?
        .clone();
    let visits = parse_visit(&country, item)?;
    Ok(VisitRecord { country, visits })
}
