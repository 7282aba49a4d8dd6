use crate::{
    common::{self, expression::ExpressionBuilder},
    error::{Error, Result},
    read,
};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    scan_index_forward: Option<bool>,
}

/// Query operation.
///
/// The key condition is rendered first and the filter second, on one shared
/// placeholder namespace.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_mapper::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key {
///         name: "user_id".to_string(),
///         value: AttributeValue::S("user-1".to_string()),
///     },
///     sort_key_condition: Some(common::condition::Condition::begins_with("order_id", "2024-")),
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "orders".to_string(),
///         ..Default::default()
///     },
///     scan_index_forward: None,
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// Additional read operation arguments (table name, filter, pagination, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs,
    /// The partition key value to query for.
    pub partition_key: common::key::Key,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition on the sort key: a comparison other than `<>`,
    /// `BETWEEN` or `begins_with`.
    pub sort_key_condition: Option<common::condition::Condition>,
}

impl TryFrom<Query> for QueryInput {
    type Error = Error;

    fn try_from(query: Query) -> Result<Self> {
        let mut builder = ExpressionBuilder::new();
        let key_condition_expression = builder.build_key_condition_expression(
            &query.partition_key.name,
            query.partition_key.value,
            query.sort_key_condition.as_ref(),
        )?;
        let multiple_read_operation =
            read::common::MultipleReadInput::new(query.multiple_read_args, builder)?;
        let operation = Self {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: query.scan_index_forward,
        };
        Ok(operation)
    }
}

impl QueryInput {
    fn builder(self, client: &Client) -> operation::query::builders::QueryFluentBuilder {
        let builder = client
            .query()
            .key_condition_expression(self.key_condition_expression)
            .set_scan_index_forward(self.scan_index_forward);
        crate::apply_multiple_read_operation!(builder, self.multiple_read_operation)
    }

    /// Fetch one page.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.query", skip(client), err)
    )]
    pub(crate) async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::query::QueryOutput,
        error::SdkError<operation::query::QueryError>,
    > {
        self.builder(client).send().await
    }

    /// Follow continuation tokens until the last page and collect every item.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.query_all", skip(client), err)
    )]
    pub(crate) async fn send_all(
        self,
        client: &Client,
    ) -> std::result::Result<
        Vec<collections::HashMap<String, types::AttributeValue>>,
        error::SdkError<operation::query::QueryError>,
    > {
        let mut paginator = self.builder(client).into_paginator().send();
        let mut items = Vec::new();
        while let Some(page) = paginator.next().await {
            let page = page?;
            #[cfg(feature = "tracing")]
            tracing::debug!(count = page.count, "query page");
            items.extend(page.items.unwrap_or_default());
        }
        Ok(items)
    }
}

impl Query {
    /// Execute the query and return a single page.
    pub async fn send(
        self,
        client: &Client,
    ) -> std::result::Result<
        operation::query::QueryOutput,
        error::SdkError<operation::query::QueryError>,
    > {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        query.send(client).await
    }

    /// Execute the query across all pages and return every item.
    pub async fn send_all(
        self,
        client: &Client,
    ) -> std::result::Result<
        Vec<collections::HashMap<String, types::AttributeValue>>,
        error::SdkError<operation::query::QueryError>,
    > {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        query.send_all(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::condition::Condition;

    use rstest::rstest;

    fn partition_key() -> common::key::Key {
        common::key::Key {
            name: "a".to_string(),
            value: types::AttributeValue::S(
                "b".to_string()
            ),
        }
    }

    #[rstest]
    #[case::partition_key_only(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
            partition_key: partition_key(),
            scan_index_forward: None,
            sort_key_condition: None,
        },
        QueryInput {
            key_condition_expression: "#n0 = :v0".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "a".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":v0".to_string(),
                                types::AttributeValue::S(
                                    "b".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "c".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case::full(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                consistent_read: Some(false),
                exclusive_start_key: None,
                filter: Some(
                    Condition::equals("d", "e") & Condition::greater_than("a", "f")
                ),
                index_name: Some("g".to_string()),
                limit: Some(10),
                table_name: "h".to_string(),
            },
            partition_key: partition_key(),
            scan_index_forward: Some(false),
            sort_key_condition: Some(
                Condition::between("i", 1, 5)
            ),
        },
        QueryInput {
            key_condition_expression: "#n0 = :v0 AND #n1 BETWEEN :v1 AND :v2".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                consistent_read: Some(false),
                exclusive_start_key: None,
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#n0".to_string(), "a".to_string()),
                            ("#n1".to_string(), "i".to_string()),
                            ("#n2".to_string(), "d".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":v0".to_string(),
                                types::AttributeValue::S(
                                    "b".to_string()
                                )
                            ),
                            (
                                ":v1".to_string(),
                                types::AttributeValue::N(
                                    "1".to_string()
                                )
                            ),
                            (
                                ":v2".to_string(),
                                types::AttributeValue::N(
                                    "5".to_string()
                                )
                            ),
                            (
                                ":v3".to_string(),
                                types::AttributeValue::S(
                                    "e".to_string()
                                )
                            ),
                            (
                                ":v4".to_string(),
                                types::AttributeValue::S(
                                    "f".to_string()
                                )
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "(#n2 = :v3 AND #n0 > :v4)".to_string()
                ),
                index_name: Some("g".to_string()),
                limit: Some(10),
                table_name: "h".to_string(),
            },
            scan_index_forward: Some(false),
        }
    )]
    fn test_query(#[case] args: Query, #[case] expected: QueryInput) {
        let actual: QueryInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::contains(Condition::contains("i", "x"), "Contains")]
    #[case::not_equal(Condition::not_equal("i", "x"), "Ne")]
    #[case::not(!Condition::equals("i", "x"), "Not")]
    fn test_query_rejects_unsupported_sort_key_condition(
        #[case] sort_key_condition: Condition,
        #[case] expected: &str,
    ) {
        let query = Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
            partition_key: partition_key(),
            scan_index_forward: None,
            sort_key_condition: Some(sort_key_condition),
        };
        let actual: Result<QueryInput> = query.try_into();
        match actual {
            Err(Error::UnknownConditionType { condition_type }) => {
                assert_eq!(condition_type, expected)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
