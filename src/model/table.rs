use crate::{
    common::{
        condition::Condition,
        key::{Key, KeySchema, KeyValues, Keys},
        schema::{SchemaCache, TableSchema},
        value::EncodedValue,
    },
    error::{Error, ErrorContext, Operation, Result},
    model::{Record, batch_writer::BatchWriter},
    read,
    write::{self, update_item::Updates},
};

use aws_sdk_dynamodb::{Client, types};
use serde::Serialize;
use serde_dynamo::{from_item, from_items, to_attribute_value, to_item};
use std::{collections, fmt, marker, sync};

/// Per-call options of [`Table::query`] and [`Table::query_all`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    /// Condition on the sort key of the table or index: a comparison other
    /// than `<>`, `BETWEEN` or `begins_with`.
    pub sort_key_condition: Option<Condition>,
    /// Filter applied after the key condition.
    pub filter_condition: Option<Condition>,
    /// Maximum number of items evaluated per page.
    pub limit: Option<i32>,
    /// Strongly consistent read. Not supported on global secondary indexes.
    pub consistent_read: bool,
    /// Continuation token of a previous page.
    pub exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    /// Secondary index to query instead of the table; the partition value is
    /// then matched against the index's partition key.
    pub index_name: Option<String>,
}

/// One page of query results.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult<R> {
    /// Decoded records of the page.
    pub items: Vec<R>,
    /// Continuation token, `None` on the last page.
    pub last_evaluated_key: Option<collections::HashMap<String, types::AttributeValue>>,
}

/// Handle on the table storing records of type `R`.
///
/// The key schema is fetched once per record type and table with
/// `DescribeTable` and kept in a [`SchemaCache`]; handles sharing a cache share
/// the fetched schemas.
pub struct Table<R> {
    client: Client,
    table_name: String,
    cache: sync::Arc<SchemaCache>,
    _record: marker::PhantomData<fn() -> R>,
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            table_name: self.table_name.clone(),
            cache: self.cache.clone(),
            _record: marker::PhantomData,
        }
    }
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl<R> Table<R> {
    /// The store client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl<R: Record> Table<R> {
    /// Handle with its own schema cache.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self::with_cache(client, table_name, sync::Arc::default())
    }

    /// Handle sharing `cache` with other handles.
    pub fn with_cache(
        client: Client,
        table_name: impl Into<String>,
        cache: sync::Arc<SchemaCache>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            cache,
            _record: marker::PhantomData,
        }
    }

    pub(crate) fn context(&self, operation: Operation) -> ErrorContext<'_> {
        ErrorContext {
            operation,
            model_name: R::model_name(),
            table_name: &self.table_name,
        }
    }

    /// Key layout of the table, fetched on first use.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_mapper.schema",
            skip(self),
            fields(table_name = %self.table_name),
            err
        )
    )]
    pub async fn schema(&self) -> Result<sync::Arc<TableSchema>> {
        self.cache
            .get_or_try_populate::<R, _, _>(&self.table_name, || async move {
                let output = self
                    .client
                    .describe_table()
                    .table_name(&self.table_name)
                    .send()
                    .await
                    .map_err(|error| {
                        Error::from_sdk(error, self.context(Operation::DescribeTable))
                    })?;
                let description = output
                    .table
                    .unwrap_or_else(|| types::TableDescription::builder().build());
                #[cfg(feature = "tracing")]
                tracing::debug!(table_name = %self.table_name, "table schema fetched");
                TableSchema::from_table_description(&description)
            })
            .await
    }

    /// Primary key attribute names of the table.
    pub async fn key_schema(&self) -> Result<KeySchema> {
        Ok(self.schema().await?.key_schema.clone())
    }

    async fn keys(&self, key: KeyValues, operation: Operation) -> Result<Keys> {
        let partition_value = key.partition.into_attribute_value()?;
        let sort_value = key
            .sort
            .map(EncodedValue::into_attribute_value)
            .transpose()?;
        self.key_schema()
            .await?
            .keys(R::model_name(), partition_value, sort_value, Some(operation))
    }

    /// Key of `record`, taken from its key attributes.
    pub async fn record_keys(&self, record: &R) -> Result<Keys> {
        let item: collections::HashMap<String, types::AttributeValue> = to_item(record)?;
        self.key_schema()
            .await?
            .keys_from_item(R::model_name(), &item)
    }

    /// Create or replace the item of `record`.
    ///
    /// With a `condition`, the write only happens if the stored item satisfies
    /// it, otherwise [`Error::ConditionCheckFailed`] is returned.
    pub async fn save(&self, record: &R, condition: Option<Condition>) -> Result<()> {
        let put_item: write::put_item::PutItemInput = write::put_item::PutItem {
            item: record,
            write_args: write::common::WriteArgs {
                condition,
                table_name: self.table_name.clone(),
            },
        }
        .try_into()?;
        put_item
            .send(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Save)))?;
        Ok(())
    }

    /// Read one record by key, `None` when absent.
    pub async fn get_item(&self, key: KeyValues, consistent_read: bool) -> Result<Option<R>> {
        let keys = self.keys(key, Operation::Get).await?;
        let get_item: read::get_item::GetItemInput = read::get_item::GetItem {
            keys,
            single_read_args: read::common::SingleReadArgs {
                consistent_read: Some(consistent_read),
                table_name: self.table_name.clone(),
            },
        }
        .into();
        let output = get_item
            .send(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Get)))?;
        let record = output.item.map(from_item).transpose()?;
        Ok(record)
    }

    /// Set attributes of the item at `key`.
    ///
    /// An empty `updates` fails with [`Error::EmptyUpdate`] before anything is
    /// sent. The store creates the item if it does not exist.
    pub async fn update_item(
        &self,
        key: KeyValues,
        updates: Updates,
        condition: Option<Condition>,
    ) -> Result<()> {
        if updates.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        let keys = self.keys(key, Operation::Update).await?;
        let update_item: write::update_item::UpdateItemInput = write::update_item::UpdateItem {
            keys,
            updates,
            write_args: write::common::WriteArgs {
                condition,
                table_name: self.table_name.clone(),
            },
        }
        .try_into()?;
        update_item
            .send(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Update)))?;
        Ok(())
    }

    /// Delete the item at `key`. Deleting a missing item succeeds.
    pub async fn delete_item(&self, key: KeyValues, condition: Option<Condition>) -> Result<()> {
        let keys = self.keys(key, Operation::Delete).await?;
        self.delete_keys(keys, condition).await
    }

    /// Delete the item of `record`, addressed by its key attributes.
    pub async fn delete(&self, record: &R, condition: Option<Condition>) -> Result<()> {
        let keys = self.record_keys(record).await?;
        self.delete_keys(keys, condition).await
    }

    async fn delete_keys(&self, keys: Keys, condition: Option<Condition>) -> Result<()> {
        let delete_item: write::delete_item::DeleteItemInput = write::delete_item::DeleteItem {
            keys,
            write_args: write::common::WriteArgs {
                condition,
                table_name: self.table_name.clone(),
            },
        }
        .try_into()?;
        delete_item
            .send(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Delete)))?;
        Ok(())
    }

    async fn query_input(
        &self,
        partition_value: types::AttributeValue,
        options: QueryOptions,
    ) -> Result<read::query::QueryInput> {
        let schema = self.schema().await?;
        let key_schema = schema.key_schema_for(options.index_name.as_deref())?;
        read::query::Query {
            multiple_read_args: read::common::MultipleReadArgs {
                consistent_read: Some(options.consistent_read),
                exclusive_start_key: options.exclusive_start_key,
                filter: options.filter_condition,
                index_name: options.index_name,
                limit: options.limit,
                table_name: self.table_name.clone(),
            },
            partition_key: Key {
                name: key_schema.partition_key,
                value: partition_value,
            },
            scan_index_forward: None,
            sort_key_condition: options.sort_key_condition,
        }
        .try_into()
    }

    /// Fetch one page of records sharing `partition_value`.
    ///
    /// The value is encoded with `serde_dynamo`, like the record's own key
    /// attribute.
    pub async fn query(
        &self,
        partition_value: impl Serialize,
        options: QueryOptions,
    ) -> Result<QueryResult<R>> {
        let partition_value = to_attribute_value(partition_value)?;
        let query = self.query_input(partition_value, options).await?;
        let output = query
            .send(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Query)))?;
        let items = from_items(output.items.unwrap_or_default())?;
        Ok(QueryResult {
            items,
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    /// Fetch every record sharing `partition_value`, following continuation
    /// tokens until the last page.
    pub async fn query_all(
        &self,
        partition_value: impl Serialize,
        options: QueryOptions,
    ) -> Result<Vec<R>> {
        let partition_value = to_attribute_value(partition_value)?;
        let query = self.query_input(partition_value, options).await?;
        let items = query
            .send_all(&self.client)
            .await
            .map_err(|error| Error::from_sdk(error, self.context(Operation::Query)))?;
        Ok(from_items(items)?)
    }

    /// Buffered writer for many puts and deletes.
    ///
    /// With `overwrite_by_keys`, a buffered request is replaced by a later one
    /// carrying the same values for those attributes.
    pub async fn batch_writer(
        &self,
        overwrite_by_keys: Vec<String>,
    ) -> Result<BatchWriter<'_, R>> {
        let key_schema = self.key_schema().await?;
        Ok(BatchWriter::new(self, key_schema, overwrite_by_keys))
    }
}
