use crate::common::condition::{ComparisonOperator, Condition};

use serde::Serialize;
use std::{fmt, hash, marker};

/// Typed handle on one record attribute.
///
/// Carries the attribute's storage name (its alias when one is declared) and the
/// Rust type of the field, so comparisons only accept values of that type.
/// Handles are usually obtained from the accessor generated by
/// [`record!`](crate::record). Literals are encoded with `serde_dynamo`, like
/// the record itself.
///
/// ```rust
/// use dynamodb_mapper::common::{condition::Condition, field::ExpressionField};
///
/// let age: ExpressionField<i64> = ExpressionField::new("age");
/// assert_eq!(age.gt(18), Condition::greater_than("age", 18_i64));
/// ```
pub struct ExpressionField<T> {
    path: String,
    _type: marker::PhantomData<fn() -> T>,
}

impl<T> ExpressionField<T> {
    /// Handle on the attribute stored under `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            _type: marker::PhantomData,
        }
    }

    /// Storage name of the attribute.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `attribute_exists(field)`.
    pub fn exists(&self) -> Condition {
        Condition::attribute_exists(self.path.clone())
    }

    /// `attribute_not_exists(field)`.
    pub fn not_exists(&self) -> Condition {
        Condition::attribute_not_exists(self.path.clone())
    }

    /// `contains(field, value)`, for strings, sets and lists.
    pub fn contains(&self, value: impl Serialize) -> Condition {
        Condition::contains(self.path.clone(), value)
    }

    /// Handle on `size(field)`.
    pub fn size(&self) -> SizeField {
        SizeField {
            path: self.path.clone(),
        }
    }
}

impl<T: Serialize> ExpressionField<T> {
    fn compare(&self, operator: ComparisonOperator, value: impl Into<T>) -> Condition {
        let value: T = value.into();
        Condition::compare(self.path.clone(), operator, value)
    }

    /// `field = value`.
    pub fn eq(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::Equals, value)
    }

    /// `field <> value`.
    pub fn ne(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::NotEqual, value)
    }

    /// `field < value`.
    pub fn lt(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::LessThan, value)
    }

    /// `field <= value`.
    pub fn lte(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::LessThanOrEqual, value)
    }

    /// `field > value`.
    pub fn gt(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::GreaterThan, value)
    }

    /// `field >= value`.
    pub fn gte(&self, value: impl Into<T>) -> Condition {
        self.compare(ComparisonOperator::GreaterThanOrEqual, value)
    }

    /// `field BETWEEN lower AND upper`.
    pub fn between(&self, lower: impl Into<T>, upper: impl Into<T>) -> Condition {
        let lower: T = lower.into();
        let upper: T = upper.into();
        Condition::between(self.path.clone(), lower, upper)
    }

    /// `begins_with(field, prefix)`, for string and binary attributes.
    pub fn begins_with(&self, prefix: impl Into<T>) -> Condition {
        let prefix: T = prefix.into();
        Condition::begins_with(self.path.clone(), prefix)
    }

    /// `field IN (values...)`.
    pub fn is_in<V: Into<T>>(&self, values: impl IntoIterator<Item = V>) -> Condition {
        Condition::is_in(self.path.clone(), values.into_iter().map(Into::<T>::into))
    }
}

impl<T> Clone for ExpressionField<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> fmt::Debug for ExpressionField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpressionField").field(&self.path).finish()
    }
}

impl<T> PartialEq for ExpressionField<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for ExpressionField<T> {}

impl<T> hash::Hash for ExpressionField<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Handle on `size(field)`, the length of a string, binary, set, list or map.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SizeField {
    path: String,
}

impl SizeField {
    fn compare(&self, operator: ComparisonOperator, value: u64) -> Condition {
        Condition::size(self.path.clone(), operator, value)
    }

    /// `size(field) = value`.
    pub fn eq(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::Equals, value)
    }

    /// `size(field) <> value`.
    pub fn ne(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::NotEqual, value)
    }

    /// `size(field) < value`.
    pub fn lt(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::LessThan, value)
    }

    /// `size(field) <= value`.
    pub fn lte(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::LessThanOrEqual, value)
    }

    /// `size(field) > value`.
    pub fn gt(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::GreaterThan, value)
    }

    /// `size(field) >= value`.
    pub fn gte(&self, value: u64) -> Condition {
        self.compare(ComparisonOperator::GreaterThanOrEqual, value)
    }
}

/// Declare a record struct together with its typed attribute accessor.
///
/// Emits the struct as written, an accessor struct named after `=>`, and the
/// [`Record`](crate::model::Record) impl binding the two. Each field becomes an
/// accessor method returning an
/// [`ExpressionField`](crate::common::field::ExpressionField) bound to the
/// field's storage name: the string after `=>` when given, the field name
/// otherwise. That alias is also emitted as the field's `#[serde(rename)]`, so
/// storage names are declared once; do not rename fields through serde
/// attributes of your own.
///
/// The struct must derive `Serialize` and `Deserialize`.
///
/// ```rust
/// use dynamodb_mapper::model::Record;
/// use serde::{Deserialize, Serialize};
///
/// dynamodb_mapper::record! {
///     /// An order.
///     #[derive(Clone, Debug, Deserialize, Serialize)]
///     pub struct Order => OrderAttributes {
///         pub user_id: String,
///         pub order_id: String => "SK",
///         pub total: u64,
///     }
/// }
///
/// let attr = Order::attr();
/// assert_eq!(attr.user_id().path(), "user_id");
/// assert_eq!(attr.order_id().path(), "SK");
///
/// let order = Order {
///     user_id: "u".to_string(),
///     order_id: "o".to_string(),
///     total: 3,
/// };
/// let item: std::collections::HashMap<String, aws_sdk_dynamodb::types::AttributeValue> =
///     serde_dynamo::to_item(&order).unwrap();
/// assert!(item.contains_key("SK"));
/// ```
#[macro_export]
macro_rules! record {
    (@path $field:ident $alias:literal) => {
        $alias
    };
    (@path $field:ident) => {
        stringify!($field)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $attributes:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $alias:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $(#[serde(rename = $alias)])?
                $field_vis $field: $ty,
            )*
        }

        #[doc = concat!("Typed attribute accessor of [`", stringify!($name), "`].")]
        #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
        $vis struct $attributes;

        impl $attributes {
            $(
                #[doc = concat!("Handle on the `", stringify!($field), "` attribute.")]
                #[allow(dead_code)]
                pub fn $field(&self) -> $crate::common::field::ExpressionField<$ty> {
                    $crate::common::field::ExpressionField::new(
                        $crate::record!(@path $field $($alias)?)
                    )
                }
            )*
        }

        impl $crate::model::Record for $name {
            type Attributes = $attributes;
        }
    };
}
