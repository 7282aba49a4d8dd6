use crate::{
    common::key::KeySchema,
    error::{Error, Result},
};

use aws_sdk_dynamodb::types;
use std::{any, collections, future::Future, sync};

/// Name and key descriptor of one secondary index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexDescriptor {
    /// Index name.
    pub name: String,
    /// Raw key descriptor; empty when the store did not report one.
    pub key_schema: Vec<types::KeySchemaElement>,
}

/// Key layout of a table and its secondary indexes.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSchema {
    /// Primary key of the table.
    pub key_schema: KeySchema,
    /// Global secondary indexes, in store order.
    pub global_indexes: Vec<IndexDescriptor>,
    /// Local secondary indexes, in store order.
    pub local_indexes: Vec<IndexDescriptor>,
}

impl TableSchema {
    /// Extract the key layout from a table description.
    pub fn from_table_description(description: &types::TableDescription) -> Result<Self> {
        let key_schema = KeySchema::parse(description.key_schema())?;
        let global_indexes = description
            .global_secondary_indexes()
            .iter()
            .filter_map(|index| {
                Some(IndexDescriptor {
                    name: index.index_name()?.to_string(),
                    key_schema: index.key_schema().to_vec(),
                })
            })
            .collect();
        let local_indexes = description
            .local_secondary_indexes()
            .iter()
            .filter_map(|index| {
                Some(IndexDescriptor {
                    name: index.index_name()?.to_string(),
                    key_schema: index.key_schema().to_vec(),
                })
            })
            .collect();
        Ok(Self {
            key_schema,
            global_indexes,
            local_indexes,
        })
    }

    /// Key attribute names of the index called `index_name`.
    ///
    /// Global indexes are searched before local ones, names match exactly. A
    /// matching descriptor without key schema is skipped.
    pub fn resolve_index(&self, index_name: &str) -> Result<KeySchema> {
        self.global_indexes
            .iter()
            .chain(&self.local_indexes)
            .find(|index| index.name == index_name && !index.key_schema.is_empty())
            .map(|index| KeySchema::parse(&index.key_schema))
            .unwrap_or_else(|| {
                Err(Error::IndexNotFound {
                    index_name: index_name.to_string(),
                })
            })
    }

    /// Table key schema, or the index key schema when `index_name` is given.
    pub fn key_schema_for(&self, index_name: Option<&str>) -> Result<KeySchema> {
        match index_name {
            Some(index_name) => self.resolve_index(index_name),
            None => Ok(self.key_schema.clone()),
        }
    }
}

/// Resolved table schemas, one per record type and table.
///
/// Lookups are cheap after the first population. Concurrent first lookups may
/// each fetch the schema; the first one stored wins and later inserts are
/// ignored, so every caller observes the same value. One record type stored in
/// several tables gets one entry per table.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: sync::RwLock<collections::HashMap<CacheKey, sync::Arc<TableSchema>>>,
}

type CacheKey = (any::TypeId, String);

fn cache_key<R: 'static>(table_name: &str) -> CacheKey {
    (any::TypeId::of::<R>(), table_name.to_string())
}

impl SchemaCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema of record type `R` stored in `table_name`.
    pub fn get<R: 'static>(&self, table_name: &str) -> Option<sync::Arc<TableSchema>> {
        let schemas = self
            .schemas
            .read()
            .unwrap_or_else(sync::PoisonError::into_inner);
        schemas.get(&cache_key::<R>(table_name)).cloned()
    }

    /// Store `schema` for `R` in `table_name` unless one is already cached,
    /// returning the cached value.
    pub fn insert<R: 'static>(
        &self,
        table_name: &str,
        schema: TableSchema,
    ) -> sync::Arc<TableSchema> {
        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(sync::PoisonError::into_inner);
        schemas
            .entry(cache_key::<R>(table_name))
            .or_insert_with(|| sync::Arc::new(schema))
            .clone()
    }

    /// Cached schema of `R` in `table_name`, running `fetch` to populate the
    /// cache on a miss.
    ///
    /// The lock is released while `fetch` runs. A failed fetch leaves the cache
    /// untouched.
    pub async fn get_or_try_populate<R, F, Fut>(
        &self,
        table_name: &str,
        fetch: F,
    ) -> Result<sync::Arc<TableSchema>>
    where
        R: 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TableSchema>>,
    {
        if let Some(schema) = self.get::<R>(table_name) {
            return Ok(schema);
        }
        let schema = fetch().await?;
        Ok(self.insert::<R>(table_name, schema))
    }
}
