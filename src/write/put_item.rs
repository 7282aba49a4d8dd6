use crate::{
    common::expression::ExpressionBuilder,
    error::{Error, Result},
    write,
};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::to_item;
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
pub(crate) struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_mapper::{common::condition::Condition, write};
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": "1", "name": "John"}),
///     write_args: write::common::WriteArgs {
///         condition: Some(Condition::attribute_not_exists("id")),
///         table_name: "users".to_string(),
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to put into the table.
    pub item: T,
    /// Additional write operation arguments (table name, condition).
    pub write_args: write::common::WriteArgs,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let item = to_item(put_item.item)?;
        let write_operation =
            write::common::WriteInput::new(put_item.write_args, ExpressionBuilder::new())?;
        let operation = Self {
            item,
            write_operation,
        };
        Ok(operation)
    }
}

impl PutItemInput {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.put_item", skip_all, err)
    )]
    pub(crate) async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let builder = client.put_item().set_item(Some(self.item));
        crate::apply_write_operation!(builder, self.write_operation)
            .send()
            .await
    }
}

impl<T: Serialize> PutItem<T> {
    /// Execute the put item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.try_into().map_err(error::BuildError::other)?;
        put_item.send(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::condition::Condition;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::no_condition(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [(
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                table_name: "c".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::condition_without_values(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                condition: Some(
                    Condition::attribute_not_exists("a")
                ),
                table_name: "c".to_string(),
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [(
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                condition_expression: Some(
                    "attribute_not_exists(#n0)".to_string()
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "a".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: None,
                table_name: "c".to_string(),
            },
        }
    )]
    #[case::condition_with_values(
        PutItem {
            item: json!(
                {
                    "a": "b",
                    "version": 2
                }
            ),
            write_args: write::common::WriteArgs {
                condition: Some(
                    Condition::equals("version", 1)
                ),
                table_name: "c".to_string(),
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [
                    (
                        "a".to_string(),
                        types::AttributeValue::S(
                            "b".to_string()
                        ),
                    ),
                    (
                        "version".to_string(),
                        types::AttributeValue::N(
                            "2".to_string()
                        ),
                    ),
                ]
            ),
            write_operation: write::common::WriteInput {
                condition_expression: Some(
                    "#n0 = :v0".to_string()
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "version".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":v0".to_string(),
                                types::AttributeValue::N(
                                    "1".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "c".to_string(),
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem<Value>, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
