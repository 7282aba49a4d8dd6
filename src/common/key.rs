use crate::{
    common::value::EncodedValue,
    error::{Error, Operation, Result},
};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use std::collections;

/// Key component.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_mapper::common::key;
///
/// let key = key::Key {
///     name: "id".to_string(),
///     value: AttributeValue::S("1".to_string()),
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    /// The attribute name of the key.
    pub name: String,
    /// The encoded value of the key.
    pub value: types::AttributeValue,
}

/// Primary key of one item (partition key and optional sort key).
#[derive(Clone, Debug, PartialEq)]
pub struct Keys {
    /// The partition key (required).
    pub partition_key: Key,
    /// The sort key, only for tables or indexes with composite keys.
    pub sort_key: Option<Key>,
}

impl From<Keys> for collections::HashMap<String, types::AttributeValue> {
    fn from(keys: Keys) -> Self {
        let mut map = Self::from([(keys.partition_key.name, keys.partition_key.value)]);
        if let Some(sort_key) = keys.sort_key {
            map.insert(sort_key.name, sort_key.value);
        }
        map
    }
}

/// Key values of one item, before they are bound to attribute names.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValues {
    /// Partition key value.
    pub partition: EncodedValue,
    /// Sort key value, required when the key schema is composite.
    pub sort: Option<EncodedValue>,
}

impl KeyValues {
    /// Key of a partition-only table.
    pub fn partition(partition: impl Serialize) -> Self {
        Self {
            partition: EncodedValue::new(partition),
            sort: None,
        }
    }

    /// Key of a table with a sort key.
    pub fn composite(partition: impl Serialize, sort: impl Serialize) -> Self {
        Self {
            partition: EncodedValue::new(partition),
            sort: Some(EncodedValue::new(sort)),
        }
    }
}

/// Key attribute names of a table or secondary index.
///
/// ```rust
/// use aws_sdk_dynamodb::types::{KeySchemaElement, KeyType};
/// use dynamodb_mapper::common::key::KeySchema;
///
/// let elements = [
///     KeySchemaElement::builder()
///         .attribute_name("pk")
///         .key_type(KeyType::Hash)
///         .build()
///         .unwrap(),
/// ];
/// let schema = KeySchema::parse(&elements).unwrap();
/// assert_eq!(schema.partition_key, "pk");
/// assert_eq!(schema.sort_key, None);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeySchema {
    /// Partition key attribute name.
    pub partition_key: String,
    /// Sort key attribute name, if the key is composite.
    pub sort_key: Option<String>,
}

impl KeySchema {
    /// Resolve a key schema descriptor into partition and sort key names.
    ///
    /// Fails with [`Error::InvalidKeySchema`] when no `HASH` element is present.
    pub fn parse(elements: &[types::KeySchemaElement]) -> Result<Self> {
        let mut partition_key = None;
        let mut sort_key = None;
        for element in elements {
            match element.key_type() {
                types::KeyType::Hash => partition_key = Some(element.attribute_name().to_string()),
                types::KeyType::Range => sort_key = Some(element.attribute_name().to_string()),
                _ => {}
            }
        }
        let partition_key = partition_key.ok_or_else(Error::invalid_key_schema)?;
        Ok(Self {
            partition_key,
            sort_key,
        })
    }

    /// Build a concrete key from explicit values.
    ///
    /// A sort value given for a partition-only schema is ignored; a missing sort
    /// value on a composite schema fails with [`Error::MissingSortKeyValue`].
    pub fn keys(
        &self,
        model_name: &str,
        partition_value: types::AttributeValue,
        sort_value: Option<types::AttributeValue>,
        operation: Option<Operation>,
    ) -> Result<Keys> {
        let partition_key = Key {
            name: self.partition_key.clone(),
            value: partition_value,
        };
        let sort_key = match (&self.sort_key, sort_value) {
            (None, _) => None,
            (Some(name), Some(value)) => Some(Key {
                name: name.clone(),
                value,
            }),
            (Some(_), None) => {
                return Err(Error::MissingSortKeyValue {
                    model_name: model_name.to_string(),
                    operation,
                });
            }
        };
        Ok(Keys {
            partition_key,
            sort_key,
        })
    }

    /// Build the key of an encoded record by picking its key attributes.
    ///
    /// A key attribute that is absent or `NULL` counts as missing.
    pub fn keys_from_item(
        &self,
        model_name: &str,
        item: &collections::HashMap<String, types::AttributeValue>,
    ) -> Result<Keys> {
        let lookup = |name: &str| {
            item.get(name)
                .filter(|value| !matches!(value, types::AttributeValue::Null(_)))
                .cloned()
        };
        let partition_value =
            lookup(&self.partition_key).ok_or_else(|| Error::MissingPartitionKeyValue {
                model_name: model_name.to_string(),
            })?;
        let sort_value = self.sort_key.as_deref().and_then(lookup);
        self.keys(model_name, partition_value, sort_value, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn element(name: &str, key_type: types::KeyType) -> types::KeySchemaElement {
        types::KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    fn s(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    fn composite() -> KeySchema {
        KeySchema {
            partition_key: "pk".to_string(),
            sort_key: Some("sk".to_string()),
        }
    }

    #[rstest]
    #[case::partition_only(
        vec![element("pk", types::KeyType::Hash)],
        KeySchema {
            partition_key: "pk".to_string(),
            sort_key: None,
        }
    )]
    #[case::composite(
        vec![
            element("pk", types::KeyType::Hash),
            element("sk", types::KeyType::Range),
        ],
        composite()
    )]
    #[case::sort_listed_first(
        vec![
            element("sk", types::KeyType::Range),
            element("pk", types::KeyType::Hash),
        ],
        composite()
    )]
    fn test_parse(#[case] elements: Vec<types::KeySchemaElement>, #[case] expected: KeySchema) {
        let actual = KeySchema::parse(&elements).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::sort_only(vec![element("sk", types::KeyType::Range)])]
    #[case::empty(vec![])]
    fn test_parse_without_partition_key(#[case] elements: Vec<types::KeySchemaElement>) {
        let actual = KeySchema::parse(&elements);
        assert!(matches!(actual, Err(Error::InvalidKeySchema(_))));
    }

    #[rstest]
    #[case::partition_only(
        KeySchema {
            partition_key: "pk".to_string(),
            sort_key: None,
        },
        Some(s("ignored")),
        collections::HashMap::from(
            [
                ("pk".to_string(), s("user-1")),
            ]
        )
    )]
    #[case::composite(
        composite(),
        Some(s("order-1")),
        collections::HashMap::from(
            [
                ("pk".to_string(), s("user-1")),
                ("sk".to_string(), s("order-1")),
            ]
        )
    )]
    fn test_keys(
        #[case] schema: KeySchema,
        #[case] sort_value: Option<types::AttributeValue>,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let keys = schema.keys("Order", s("user-1"), sort_value, None).unwrap();
        let actual: collections::HashMap<_, _> = keys.into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_keys_missing_sort_value() {
        let actual = composite().keys("Order", s("user-1"), None, Some(Operation::Get));
        match actual {
            Err(Error::MissingSortKeyValue {
                model_name,
                operation,
            }) => {
                assert_eq!(model_name, "Order");
                assert_eq!(operation, Some(Operation::Get));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[rstest]
    #[case::both_present(
        collections::HashMap::from(
            [
                ("pk".to_string(), s("user-1")),
                ("sk".to_string(), s("order-1")),
                ("total".to_string(), types::AttributeValue::N("3".to_string())),
            ]
        ),
        Ok(
            collections::HashMap::from(
                [
                    ("pk".to_string(), s("user-1")),
                    ("sk".to_string(), s("order-1")),
                ]
            )
        )
    )]
    #[case::missing_partition(
        collections::HashMap::from(
            [
                ("sk".to_string(), s("order-1")),
            ]
        ),
        Err("partition")
    )]
    #[case::missing_sort(
        collections::HashMap::from(
            [
                ("pk".to_string(), s("user-1")),
            ]
        ),
        Err("sort")
    )]
    #[case::null_sort(
        collections::HashMap::from(
            [
                ("pk".to_string(), s("user-1")),
                ("sk".to_string(), types::AttributeValue::Null(true)),
            ]
        ),
        Err("sort")
    )]
    fn test_keys_from_item(
        #[case] item: collections::HashMap<String, types::AttributeValue>,
        #[case] expected: std::result::Result<
            collections::HashMap<String, types::AttributeValue>,
            &str,
        >,
    ) {
        let actual = composite().keys_from_item("Order", &item);
        match (actual, expected) {
            (Ok(keys), Ok(expected)) => {
                let actual: collections::HashMap<_, _> = keys.into();
                assert_eq!(actual, expected);
            }
            (Err(Error::MissingPartitionKeyValue { model_name }), Err("partition")) => {
                assert_eq!(model_name, "Order")
            }
            (Err(Error::MissingSortKeyValue { model_name, .. }), Err("sort")) => {
                assert_eq!(model_name, "Order")
            }
            (actual, expected) => panic!("expected {expected:?}, got {actual:?}"),
        }
    }
}
