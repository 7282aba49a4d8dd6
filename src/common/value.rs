use crate::error::Result;

use aws_sdk_dynamodb::types;
use serde::{Serialize, ser::Error as _};

/// A literal of a condition, key or update, encoded the way records are.
///
/// Encoding goes through `serde_dynamo::to_attribute_value`, the path records
/// take with `to_item`, so a value compares equal to the stored attribute.
/// Building a value never fails: an encoding error is kept and reported as
/// [`Error::Serialization`](crate::error::Error::Serialization) when the value
/// is rendered into a request.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_mapper::common::value::EncodedValue;
/// use std::collections::HashSet;
///
/// let age = EncodedValue::new(42_i64);
/// assert_eq!(age.attribute_value().unwrap(), &AttributeValue::N("42".to_string()));
///
/// let tags = EncodedValue::new(HashSet::from(["a".to_string()]));
/// assert_eq!(
///     tags.attribute_value().unwrap(),
///     &AttributeValue::L(vec![AttributeValue::S("a".to_string())]),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedValue(std::result::Result<types::AttributeValue, String>);

impl EncodedValue {
    /// Encode `value` with `serde_dynamo`.
    pub fn new<T: Serialize>(value: T) -> Self {
        Self(serde_dynamo::to_attribute_value(value).map_err(|error| error.to_string()))
    }

    /// The encoded attribute value, or the encoding error.
    pub fn attribute_value(&self) -> Result<&types::AttributeValue> {
        self.0
            .as_ref()
            .map_err(|message| serde_dynamo::Error::custom(message).into())
    }

    /// Consume into the encoded attribute value, or the encoding error.
    pub fn into_attribute_value(self) -> Result<types::AttributeValue> {
        self.0
            .map_err(|message| serde_dynamo::Error::custom(message).into())
    }
}

impl From<types::AttributeValue> for EncodedValue {
    fn from(value: types::AttributeValue) -> Self {
        Self(Ok(value))
    }
}
