//! In-memory document database tool.
//!
//! Four fixed collections of JSON records. Ids come from a per-collection
//! counter and are zero-padded, so they are unique within a collection and
//! never reused after a delete.

use chrono::Utc;
use composer_core::{ComposerError, Result, ToolResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Collections that exist in every database instance.
pub const COLLECTIONS: [&str; 4] = ["users", "projects", "components", "deployments"];

#[derive(Default)]
struct Collection {
    records: BTreeMap<String, Map<String, Value>>,
    next_id: u64,
}

impl Collection {
    fn allocate_id(&mut self, name: &str) -> String {
        self.next_id += 1;
        format!("{}-{:04}", name, self.next_id)
    }
}

/// Record count per collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub records: usize,
}

pub struct DatabaseTool {
    collections: RwLock<HashMap<String, Collection>>,
}

impl DatabaseTool {
    pub fn new() -> Self {
        let collections = COLLECTIONS
            .iter()
            .map(|name| (name.to_string(), Collection::default()))
            .collect();
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Inserts a record and stamps `id`, `createdAt` and `updatedAt`.
    pub async fn create(&self, collection: &str, data: Value) -> ToolResult<Value> {
        match self.try_create(collection, data).await {
            Ok(record) => {
                tracing::debug!(target: "composer::tools::database", collection, id = %record["id"], "Record created");
                ToolResult::ok(record).with_message("Record created")
            }
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }

    async fn try_create(&self, collection: &str, data: Value) -> Result<Value> {
        let mut fields = into_object(data)?;
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| ComposerError::not_found("Collection", collection))?;

        let id = target.allocate_id(collection);
        let now = Value::String(Utc::now().to_rfc3339());
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);

        target.records.insert(id, fields.clone());
        Ok(Value::Object(fields))
    }

    pub async fn read(&self, collection: &str, id: &str) -> ToolResult<Value> {
        let collections = self.collections.read().await;
        ToolResult::from_result(
            find_collection(&collections, collection).and_then(|c| {
                c.records
                    .get(id)
                    .cloned()
                    .map(Value::Object)
                    .ok_or_else(|| ComposerError::not_found("Record", id))
            }),
        )
    }

    /// Merges `patch` into an existing record. `id` and `createdAt` are kept.
    pub async fn update(&self, collection: &str, id: &str, patch: Value) -> ToolResult<Value> {
        match self.try_update(collection, id, patch).await {
            Ok(record) => ToolResult::ok(record).with_message("Record updated"),
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }

    async fn try_update(&self, collection: &str, id: &str, patch: Value) -> Result<Value> {
        let patch = into_object(patch)?;
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .ok_or_else(|| ComposerError::not_found("Collection", collection))?
            .records
            .get_mut(id)
            .ok_or_else(|| ComposerError::not_found("Record", id))?;

        for (key, value) in patch {
            if key == "id" || key == "createdAt" {
                continue;
            }
            record.insert(key, value);
        }
        record.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(Value::Object(record.clone()))
    }

    pub async fn delete(&self, collection: &str, id: &str) -> ToolResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .ok_or_else(|| ComposerError::not_found("Collection", collection))
            .and_then(|c| {
                c.records
                    .remove(id)
                    .ok_or_else(|| ComposerError::not_found("Record", id))
            });

        match removed {
            Ok(_) => {
                tracing::debug!(target: "composer::tools::database", collection, id, "Record deleted");
                ToolResult::done("Record deleted")
            }
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }

    /// All records of a collection in id order.
    pub async fn list(&self, collection: &str) -> ToolResult<Vec<Value>> {
        self.query(collection, &Value::Object(Map::new())).await
    }

    /// Records whose fields recursively equal every field of `filter`.
    ///
    /// Nested objects in the filter match as subsets; every other value
    /// must be equal.
    pub async fn query(&self, collection: &str, filter: &Value) -> ToolResult<Vec<Value>> {
        let collections = self.collections.read().await;
        ToolResult::from_result(find_collection(&collections, collection).map(|c| {
            c.records
                .values()
                .filter(|record| matches_filter(record, filter))
                .cloned()
                .map(Value::Object)
                .collect()
        }))
    }

    pub async fn collections(&self) -> Vec<CollectionInfo> {
        let collections = self.collections.read().await;
        COLLECTIONS
            .iter()
            .map(|name| CollectionInfo {
                name: name.to_string(),
                records: collections.get(*name).map_or(0, |c| c.records.len()),
            })
            .collect()
    }
}

impl Default for DatabaseTool {
    fn default() -> Self {
        Self::new()
    }
}

fn find_collection<'a>(
    collections: &'a HashMap<String, Collection>,
    name: &str,
) -> Result<&'a Collection> {
    collections
        .get(name)
        .ok_or_else(|| ComposerError::not_found("Collection", name))
}

fn into_object(data: Value) -> Result<Map<String, Value>> {
    match data {
        Value::Object(map) => Ok(map),
        _ => Err(ComposerError::invalid_input(
            "Record data must be a JSON object",
        )),
    }
}

fn matches_filter(record: &Map<String, Value>, filter: &Value) -> bool {
    match filter {
        Value::Object(expected) => expected
            .iter()
            .all(|(key, want)| record.get(key).is_some_and(|have| value_matches(have, want))),
        _ => false,
    }
}

fn value_matches(have: &Value, want: &Value) -> bool {
    match (have, want) {
        (Value::Object(have), Value::Object(_)) => matches_filter(have, want),
        _ => have == want,
    }
}
