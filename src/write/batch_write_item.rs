use crate::{
    common,
    error::{Error, Result},
};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// Maximum number of requests the store accepts in one batch write.
pub const MAX_BATCH_SIZE: usize = 25;

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchWriteItemRequest<T> {
    /// Creates or replaces an item.
    PutItem(T),
    /// Removes an item by its primary key.
    DeleteItem(common::key::Keys),
}

impl<T: Serialize> TryFrom<BatchWriteItemRequest<T>> for types::WriteRequest {
    type Error = Error;

    fn try_from(write_request: BatchWriteItemRequest<T>) -> Result<Self> {
        let builder = match write_request {
            BatchWriteItemRequest::PutItem(item) => {
                let item = to_item(item)?;
                let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
                Self::builder().set_put_request(Some(put_request))
            }
            BatchWriteItemRequest::DeleteItem(keys) => {
                let delete_request = types::DeleteRequest::builder()
                    .set_key(Some(keys.into()))
                    .build()?;
                Self::builder().set_delete_request(Some(delete_request))
            }
        };
        let request = builder.build();
        Ok(request)
    }
}

/// Batch write item operation.
///
/// Sends the requests as given: at most [`MAX_BATCH_SIZE`] in total, and the
/// caller handles the unprocessed items of the output. Use
/// [`BatchWriter`](crate::model::batch_writer::BatchWriter) for chunking and
/// resubmission.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_mapper::write;
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     request_items: HashMap::from([(
///         "users".to_string(),
///         vec![write::batch_write_item::BatchWriteItemRequest::PutItem(
///             serde_json::json!({"id": "1", "name": "John"}),
///         )],
///     )]),
/// };
/// batch_write.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem<T> {
    /// A map of table names to lists of write requests.
    pub request_items: collections::HashMap<String, Vec<BatchWriteItemRequest<T>>>,
}

impl<T: Serialize> TryFrom<BatchWriteItem<T>> for operation::batch_write_item::BatchWriteItemInput {
    type Error = Error;

    fn try_from(batch_write_item: BatchWriteItem<T>) -> Result<Self> {
        let mut request_items =
            collections::HashMap::with_capacity(batch_write_item.request_items.len());
        for (table_name, table_request_items) in batch_write_item.request_items {
            let mut serialized_table_request_items = Vec::with_capacity(table_request_items.len());
            for request_item in table_request_items {
                let request_item: types::WriteRequest = request_item.try_into()?;
                serialized_table_request_items.push(request_item);
            }
            request_items.insert(table_name, serialized_table_request_items);
        }
        let operation = Self::builder()
            .set_request_items(Some(request_items))
            .build()?;
        Ok(operation)
    }
}

/// Send already encoded requests.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "dynamodb_mapper.batch_write_item", skip_all, err)
)]
pub(crate) async fn send_requests(
    client: &Client,
    request_items: collections::HashMap<String, Vec<types::WriteRequest>>,
) -> std::result::Result<
    operation::batch_write_item::BatchWriteItemOutput,
    error::SdkError<operation::batch_write_item::BatchWriteItemError>,
> {
    client
        .batch_write_item()
        .set_request_items(Some(request_items))
        .send()
        .await
}

impl<T: Serialize> BatchWriteItem<T> {
    /// Execute the batch write item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::batch_write_item::BatchWriteItemOutput,
        error::SdkError<operation::batch_write_item::BatchWriteItemError>,
    > {
        let batch_write_item: operation::batch_write_item::BatchWriteItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        send_requests(client, batch_write_item.request_items.unwrap_or_default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    fn s(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[test]
    fn test_batch_write_item() {
        let batch_write_item = BatchWriteItem {
            request_items: collections::HashMap::from(
                [(
                    "a".to_string(),
                    vec![
                        BatchWriteItemRequest::DeleteItem(
                            common::key::Keys {
                                partition_key: common::key::Key {
                                    name: "b".to_string(),
                                    value: s("c"),
                                },
                                sort_key: None,
                            }
                        ),
                        BatchWriteItemRequest::PutItem(
                            json!(
                                {
                                    "d": "e"
                                }
                            )
                        ),
                    ],
                )]
            ),
        };
        let expected = operation::batch_write_item::BatchWriteItemInput::builder()
            .set_request_items(
                Some(
                    collections::HashMap::from(
                        [(
                            "a".to_string(),
                            vec![
                                types::WriteRequest::builder()
                                    .set_delete_request(
                                        Some(
                                            types::DeleteRequest::builder()
                                                .set_key(
                                                    Some(
                                                        collections::HashMap::from(
                                                            [
                                                                ("b".to_string(), s("c")),
                                                            ]
                                                        )
                                                    )
                                                )
                                                .build()
                                                .unwrap(),
                                        )
                                    )
                                    .build(),
                                types::WriteRequest::builder()
                                    .set_put_request(
                                        Some(
                                            types::PutRequest::builder()
                                                .set_item(
                                                    Some(
                                                        collections::HashMap::from(
                                                            [
                                                                ("d".to_string(), s("e")),
                                                            ]
                                                        )
                                                    )
                                                )
                                                .build()
                                                .unwrap(),
                                        )
                                    )
                                    .build(),
                            ],
                        )]
                    )
                )
            )
            .build()
            .unwrap();
        let actual: operation::batch_write_item::BatchWriteItemInput =
            batch_write_item.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_batch_write_item_rejects_non_map_item() {
        let batch_write_item: BatchWriteItem<Value> = BatchWriteItem {
            request_items: collections::HashMap::from(
                [(
                    "a".to_string(),
                    vec![
                        BatchWriteItemRequest::PutItem(
                            json!("not a map")
                        ),
                    ],
                )]
            ),
        };
        let actual: Result<operation::batch_write_item::BatchWriteItemInput> =
            batch_write_item.try_into();
        assert!(matches!(actual, Err(Error::Serialization(_))));
    }
}
