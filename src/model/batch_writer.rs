use crate::{
    common::key::KeySchema,
    error::{Error, Operation, Result},
    model::{Record, Table},
    write::batch_write_item::{self, BatchWriteItemRequest, MAX_BATCH_SIZE},
};

use aws_sdk_dynamodb::{operation::batch_write_item::BatchWriteItemOutput, types};
use std::collections;

/// Pending write requests, with optional replacement by key.
#[derive(Clone, Debug, Default, PartialEq)]
struct WriteBuffer {
    requests: collections::VecDeque<types::WriteRequest>,
    overwrite_by_keys: Vec<String>,
}

impl WriteBuffer {
    fn new(overwrite_by_keys: Vec<String>) -> Self {
        Self {
            requests: collections::VecDeque::new(),
            overwrite_by_keys,
        }
    }

    fn push(&mut self, request: types::WriteRequest) {
        let overwrite_by_keys = &self.overwrite_by_keys;
        if let Some(values) = overwrite_values(overwrite_by_keys, &request) {
            self.requests.retain(|buffered| {
                overwrite_values(overwrite_by_keys, buffered).as_ref() != Some(&values)
            });
        }
        self.requests.push_back(request);
    }

    /// Requests sent back by the store, retried after the ones already buffered.
    fn requeue(&mut self, requests: Vec<types::WriteRequest>) {
        self.requests.extend(requests);
    }

    fn take_chunk(&mut self) -> Vec<types::WriteRequest> {
        let size = self.requests.len().min(MAX_BATCH_SIZE);
        self.requests.drain(..size).collect()
    }

    fn len(&self) -> usize {
        self.requests.len()
    }

    fn is_full(&self) -> bool {
        self.requests.len() >= MAX_BATCH_SIZE
    }

    fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Values of the overwrite attributes, `None` when any of them is missing.
fn overwrite_values(
    overwrite_by_keys: &[String],
    request: &types::WriteRequest,
) -> Option<Vec<types::AttributeValue>> {
    if overwrite_by_keys.is_empty() {
        return None;
    }
    let attributes = match (request.put_request(), request.delete_request()) {
        (Some(put_request), _) => put_request.item(),
        (None, Some(delete_request)) => delete_request.key(),
        (None, None) => return None,
    };
    overwrite_by_keys
        .iter()
        .map(|name| attributes.get(name).cloned())
        .collect()
}

/// Requests of `table_name` the store reported as unprocessed.
fn unprocessed_requests(
    output: BatchWriteItemOutput,
    table_name: &str,
) -> Vec<types::WriteRequest> {
    output
        .unprocessed_items
        .and_then(|mut unprocessed| unprocessed.remove(table_name))
        .unwrap_or_default()
}

/// Buffered puts and deletes of records of one table.
///
/// Requests are sent in batches of [`MAX_BATCH_SIZE`] as the buffer fills up.
/// Items the store reports as unprocessed are queued again. Call
/// [`close`](Self::close) when done: requests still buffered when the writer
/// is dropped are lost, and reported with a `tracing` warning when that
/// feature is enabled.
///
/// ```rust,no_run
/// # use dynamodb_mapper::model::{Record, Table};
/// # async fn example<R: Record>(table: Table<R>, records: Vec<R>) -> dynamodb_mapper::error::Result<()> {
/// let mut writer = table.batch_writer(vec![]).await?;
/// for record in &records {
///     writer.put(record).await?;
/// }
/// writer.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BatchWriter<'a, R> {
    table: &'a Table<R>,
    key_schema: KeySchema,
    buffer: WriteBuffer,
}

impl<'a, R: Record> BatchWriter<'a, R> {
    pub(crate) fn new(
        table: &'a Table<R>,
        key_schema: KeySchema,
        overwrite_by_keys: Vec<String>,
    ) -> Self {
        Self {
            table,
            key_schema,
            buffer: WriteBuffer::new(overwrite_by_keys),
        }
    }

    /// Queue a put of `record`.
    pub async fn put(&mut self, record: &R) -> Result<()> {
        let request: types::WriteRequest = BatchWriteItemRequest::PutItem(record).try_into()?;
        self.push(request).await
    }

    /// Queue a delete of the item of `record`, addressed by its key attributes.
    pub async fn delete(&mut self, record: &R) -> Result<()> {
        let item: collections::HashMap<String, types::AttributeValue> =
            serde_dynamo::to_item(record)?;
        let keys = self.key_schema.keys_from_item(R::model_name(), &item)?;
        let request: types::WriteRequest =
            BatchWriteItemRequest::<&R>::DeleteItem(keys).try_into()?;
        self.push(request).await
    }

    async fn push(&mut self, request: types::WriteRequest) -> Result<()> {
        self.buffer.push(request);
        if self.buffer.is_full() {
            self.send_chunk().await?;
        }
        Ok(())
    }

    /// Number of buffered requests not sent yet.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Send everything buffered, retrying unprocessed items until none is left.
    pub async fn flush(&mut self) -> Result<()> {
        while !self.buffer.is_empty() {
            self.send_chunk().await?;
        }
        Ok(())
    }

    /// Flush and release the writer.
    pub async fn close(mut self) -> Result<()> {
        self.flush().await
    }

    async fn send_chunk(&mut self) -> Result<()> {
        let chunk = self.buffer.take_chunk();
        #[cfg(feature = "tracing")]
        tracing::debug!(size = chunk.len(), table_name = %self.table.table_name(), "batch write");
        let table_name = self.table.table_name().to_string();
        let output = batch_write_item::send_requests(
            self.table.client(),
            collections::HashMap::from([(table_name, chunk)]),
        )
        .await
        .map_err(|error| Error::from_sdk(error, self.table.context(Operation::BatchWrite)))?;
        let unprocessed = unprocessed_requests(output, self.table.table_name());
        if !unprocessed.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(count = unprocessed.len(), "requeueing unprocessed items");
            self.buffer.requeue(unprocessed);
        }
        Ok(())
    }
}

#[cfg(feature = "tracing")]
impl<R> Drop for BatchWriter<'_, R> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            tracing::warn!(
                count = self.buffer.len(),
                table_name = %self.table.table_name(),
                "batch writer dropped with unsent requests"
            );
        }
    }
}
