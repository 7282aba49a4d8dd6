use crate::{
    common::{self, expression::ExpressionBuilder, field::ExpressionField, value::EncodedValue},
    error::{Error, Result},
    write,
};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections;

/// New values for a set of attributes, in insertion order.
///
/// Setting an attribute twice keeps its first position and the last value.
/// Values are encoded with `serde_dynamo`, like the record itself.
///
/// ```rust
/// use dynamodb_mapper::{common::field::ExpressionField, write::update_item::Updates};
///
/// let status: ExpressionField<String> = ExpressionField::new("status");
/// let total: ExpressionField<u64> = ExpressionField::new("total");
///
/// let updates = Updates::new().set(&status, "shipped").set(&total, 42_u64);
/// assert_eq!(updates.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Updates {
    values: IndexMap<String, EncodedValue>,
}

impl Updates {
    /// No updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`.
    pub fn set<T: Serialize>(
        mut self,
        field: &ExpressionField<T>,
        value: impl Into<T>,
    ) -> Self {
        self.insert(field, value);
        self
    }

    /// Set `field` to `value` in place.
    pub fn insert<T: Serialize>(&mut self, field: &ExpressionField<T>, value: impl Into<T>) {
        let value: T = value.into();
        self.values
            .insert(field.path().to_string(), EncodedValue::new(value));
    }

    /// Number of attributes set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Storage name to encoded value, in insertion order.
    pub fn values(&self) -> &IndexMap<String, EncodedValue> {
        &self.values
    }
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// The `SET` clause is rendered before the condition, on one shared placeholder
/// namespace.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{
///     common::{self, field::ExpressionField},
///     write::{self, update_item::Updates},
/// };
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let name: ExpressionField<String> = ExpressionField::new("name");
/// let update_item = write::update_item::UpdateItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: AttributeValue::S("1".to_string()),
///         },
///         sort_key: None,
///     },
///     updates: Updates::new().set(&name, "New"),
///     write_args: write::common::WriteArgs {
///         condition: Some(name.exists()),
///         table_name: "users".to_string(),
///     },
/// };
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem {
    /// The primary key of the item to update.
    pub keys: common::key::Keys,
    /// The attributes to set.
    pub updates: Updates,
    /// Additional write operation arguments (table name, condition).
    pub write_args: write::common::WriteArgs,
}

impl TryFrom<UpdateItem> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem) -> Result<Self> {
        let mut builder = ExpressionBuilder::new();
        let update_expression = builder.build_update_expression(update_item.updates.values())?;
        let write_operation = write::common::WriteInput::new(update_item.write_args, builder)?;
        let operation = Self {
            keys: update_item.keys.into(),
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl UpdateItemInput {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.update_item", skip(client), err)
    )]
    pub(crate) async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let builder = client
            .update_item()
            .set_key(Some(self.keys))
            .update_expression(self.update_expression);
        crate::apply_write_operation!(builder, self.write_operation)
            .send()
            .await
    }
}

impl UpdateItem {
    /// Execute the update item operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        update_item.send(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Deserialize, Serialize)]
    enum Priority {
        Express,
    }

    crate::record! {
        #[allow(dead_code)]
        #[derive(Deserialize, Serialize)]
        struct Order => OrderAttributes {
            user_id: String,
            status: String,
            total: u64 => "Total",
            note: Option<String>,
            labels: collections::HashSet<String>,
            priority: Priority,
        }
    }

    fn keys() -> common::key::Keys {
        common::key::Keys {
            partition_key: common::key::Key {
                name: "user_id".to_string(),
                value: types::AttributeValue::S(
                    "a".to_string()
                ),
            },
            sort_key: None,
        }
    }

    #[test]
    fn test_updates_keep_first_position_and_last_value() {
        let attr = OrderAttributes;
        let updates = Updates::new()
            .set(&attr.status(), "pending")
            .set(&attr.total(), 3_u64)
            .set(&attr.status(), "shipped");
        assert_eq!(
            updates.values(),
            &IndexMap::from(
                [
                    (
                        "status".to_string(),
                        EncodedValue::from(
                            types::AttributeValue::S(
                                "shipped".to_string()
                            )
                        )
                    ),
                    (
                        "Total".to_string(),
                        EncodedValue::from(
                            types::AttributeValue::N(
                                "3".to_string()
                            )
                        )
                    ),
                ]
            )
        );
    }

    #[test]
    fn test_updates_encode_like_records() {
        let labels = collections::HashSet::from(["gift".to_string()]);
        let updates = Updates::new()
            .set(&OrderAttributes.labels(), labels.clone())
            .set(&OrderAttributes.priority(), Priority::Express);
        let order = Order {
            user_id: "a".to_string(),
            status: "pending".to_string(),
            total: 0,
            note: None,
            labels,
            priority: Priority::Express,
        };
        let item: collections::HashMap<String, types::AttributeValue> =
            serde_dynamo::to_item(order).unwrap();
        for (field, value) in updates.values() {
            assert_eq!(value.attribute_value().unwrap(), &item[field]);
        }
    }

    #[rstest]
    #[case::set_only(
        UpdateItem {
            keys: keys(),
            updates: Updates::new()
                .set(&OrderAttributes.status(), "shipped")
                .set(&OrderAttributes.note(), None::<String>),
            write_args: write::common::WriteArgs {
                table_name: "b".to_string(),
                ..Default::default()
            },
        },
        UpdateItemInput {
            keys: collections::HashMap::from(
                [
                    (
                        "user_id".to_string(),
                        types::AttributeValue::S(
                            "a".to_string()
                        )
                    ),
                ]
            ),
            update_expression: "SET #n0 = :v0, #n1 = :v1".to_string(),
            write_operation: write::common::WriteInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "status".to_string()),
                            ("#n1".to_string(), "note".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":v0".to_string(),
                                types::AttributeValue::S(
                                    "shipped".to_string()
                                )
                            ),
                            (
                                ":v1".to_string(),
                                types::AttributeValue::Null(true)
                            ),
                        ]
                    )
                ),
                table_name: "b".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::condition_after_update(
        UpdateItem {
            keys: keys(),
            updates: Updates::new()
                .set(&OrderAttributes.status(), "shipped"),
            write_args: write::common::WriteArgs {
                condition: Some(
                    OrderAttributes.status().eq("pending") & OrderAttributes.total().gt(0_u64)
                ),
                table_name: "b".to_string(),
            },
        },
        UpdateItemInput {
            keys: collections::HashMap::from(
                [
                    (
                        "user_id".to_string(),
                        types::AttributeValue::S(
                            "a".to_string()
                        )
                    ),
                ]
            ),
            update_expression: "SET #n0 = :v0".to_string(),
            write_operation: write::common::WriteInput {
                condition_expression: Some(
                    "(#n0 = :v1 AND #n1 > :v2)".to_string()
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "status".to_string()),
                            ("#n1".to_string(), "Total".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":v0".to_string(),
                                types::AttributeValue::S(
                                    "shipped".to_string()
                                )
                            ),
                            (
                                ":v1".to_string(),
                                types::AttributeValue::S(
                                    "pending".to_string()
                                )
                            ),
                            (
                                ":v2".to_string(),
                                types::AttributeValue::N(
                                    "0".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "b".to_string(),
            },
        }
    )]
    fn test_update_item(#[case] args: UpdateItem, #[case] expected: UpdateItemInput) {
        let actual: UpdateItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_update_item_without_updates() {
        let update_item = UpdateItem {
            keys: keys(),
            updates: Updates::new(),
            write_args: write::common::WriteArgs {
                table_name: "b".to_string(),
                ..Default::default()
            },
        };
        let actual: Result<UpdateItemInput> = update_item.try_into();
        assert!(matches!(actual, Err(Error::EmptyUpdate)));
    }
}
