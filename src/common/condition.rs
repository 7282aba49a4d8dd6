use crate::{
    common::value::EncodedValue,
    error::{Error, Result},
};

use serde::Serialize;
use std::ops;

/// Logical operator for combining conditions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogicalOperator {
    /// Logical AND - all conditions must be true.
    And,
    /// Logical OR - at least one condition must be true.
    Or,
}

impl LogicalOperator {
    /// Name reported in errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "And",
            Self::Or => "Or",
        }
    }
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Comparison operator of a comparison or size predicate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ComparisonOperator {
    /// `=`
    Equals,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl ops::Deref for ComparisonOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Equals => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

/// A boolean predicate over record attributes.
///
/// Conditions are plain data: they can be built, combined with `&`, `|` and
/// `!`, compared and inspected without a store client. Field names are the
/// attributes' storage names.
///
/// ```rust
/// use dynamodb_mapper::common::condition::Condition;
///
/// let adult = Condition::greater_than_or_equal("age", 18);
/// let active = Condition::equals("status", "active");
/// let banned = Condition::attribute_exists("banned_at");
///
/// let condition = adult & active & !banned;
/// assert_eq!(condition.operands().map(<[_]>::len), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// `field <op> value`.
    Comparison {
        /// Storage name of the attribute.
        field: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Right-hand side.
        value: EncodedValue,
    },
    /// `field BETWEEN lower AND upper` (inclusive, bounds kept as given).
    Between {
        /// Storage name of the attribute.
        field: String,
        /// Lower bound.
        lower: EncodedValue,
        /// Upper bound.
        upper: EncodedValue,
    },
    /// `begins_with(field, prefix)`.
    BeginsWith {
        /// Storage name of the attribute.
        field: String,
        /// Prefix to match.
        prefix: EncodedValue,
    },
    /// `contains(field, value)`.
    Contains {
        /// Storage name of the attribute.
        field: String,
        /// Substring or set/list element.
        value: EncodedValue,
    },
    /// `field IN (values...)`, order preserved, duplicates kept.
    In {
        /// Storage name of the attribute.
        field: String,
        /// Candidate values.
        values: Vec<EncodedValue>,
    },
    /// `attribute_exists(field)`.
    AttributeExists {
        /// Storage name of the attribute.
        field: String,
    },
    /// `attribute_not_exists(field)`.
    AttributeNotExists {
        /// Storage name of the attribute.
        field: String,
    },
    /// `size(field) <op> value`.
    Size {
        /// Storage name of the attribute.
        field: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Length to compare against.
        value: u64,
    },
    /// All operands must hold. Always has at least two operands.
    And(Vec<Condition>),
    /// At least one operand must hold. Always has at least two operands.
    Or(Vec<Condition>),
    /// Negation of the inner condition.
    Not(Box<Condition>),
}

impl Condition {
    /// Comparison predicate.
    pub fn compare(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Serialize,
    ) -> Self {
        Self::Comparison {
            field: field.into(),
            operator,
            value: EncodedValue::new(value),
        }
    }

    /// `field = value`.
    pub fn equals(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::Equals, value)
    }

    /// `field <> value`.
    pub fn not_equal(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::NotEqual, value)
    }

    /// `field < value`.
    pub fn less_than(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::LessThan, value)
    }

    /// `field <= value`.
    pub fn less_than_or_equal(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::LessThanOrEqual, value)
    }

    /// `field > value`.
    pub fn greater_than(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::GreaterThan, value)
    }

    /// `field >= value`.
    pub fn greater_than_or_equal(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::compare(field, ComparisonOperator::GreaterThanOrEqual, value)
    }

    /// `field BETWEEN lower AND upper`. The bounds are never reordered.
    pub fn between(field: impl Into<String>, lower: impl Serialize, upper: impl Serialize) -> Self {
        Self::Between {
            field: field.into(),
            lower: EncodedValue::new(lower),
            upper: EncodedValue::new(upper),
        }
    }

    /// `begins_with(field, prefix)`.
    pub fn begins_with(field: impl Into<String>, prefix: impl Serialize) -> Self {
        Self::BeginsWith {
            field: field.into(),
            prefix: EncodedValue::new(prefix),
        }
    }

    /// `contains(field, value)`.
    pub fn contains(field: impl Into<String>, value: impl Serialize) -> Self {
        Self::Contains {
            field: field.into(),
            value: EncodedValue::new(value),
        }
    }

    /// `field IN (values...)`.
    pub fn is_in<V: Serialize>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(EncodedValue::new).collect(),
        }
    }

    /// `attribute_exists(field)`.
    pub fn attribute_exists(field: impl Into<String>) -> Self {
        Self::AttributeExists {
            field: field.into(),
        }
    }

    /// `attribute_not_exists(field)`.
    pub fn attribute_not_exists(field: impl Into<String>) -> Self {
        Self::AttributeNotExists {
            field: field.into(),
        }
    }

    /// `size(field) <op> value`.
    pub fn size(field: impl Into<String>, operator: ComparisonOperator, value: u64) -> Self {
        Self::Size {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Conjunction of `conditions`, kept as given (no flattening).
    ///
    /// Fails with [`Error::InsufficientConditions`] for fewer than two operands.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Self::logical(LogicalOperator::And, conditions.into_iter().collect())
    }

    /// Disjunction of `conditions`, kept as given (no flattening).
    ///
    /// Fails with [`Error::InsufficientConditions`] for fewer than two operands.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Self::logical(LogicalOperator::Or, conditions.into_iter().collect())
    }

    /// Negation of `condition`. Double negation is kept as is.
    pub fn negate(condition: Condition) -> Self {
        Self::Not(Box::new(condition))
    }

    fn logical(operator: LogicalOperator, conditions: Vec<Condition>) -> Result<Self> {
        if conditions.len() < 2 {
            return Err(Error::InsufficientConditions {
                operator: operator.name(),
                count: conditions.len(),
            });
        }
        let condition = match operator {
            LogicalOperator::And => Self::And(conditions),
            LogicalOperator::Or => Self::Or(conditions),
        };
        Ok(condition)
    }

    /// Name of the variant, as reported in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Comparison { operator, .. } => match operator {
                ComparisonOperator::Equals => "Eq",
                ComparisonOperator::NotEqual => "Ne",
                ComparisonOperator::LessThan => "Lt",
                ComparisonOperator::LessThanOrEqual => "Lte",
                ComparisonOperator::GreaterThan => "Gt",
                ComparisonOperator::GreaterThanOrEqual => "Gte",
            },
            Self::Between { .. } => "Between",
            Self::BeginsWith { .. } => "BeginsWith",
            Self::Contains { .. } => "Contains",
            Self::In { .. } => "In",
            Self::AttributeExists { .. } => "AttributeExists",
            Self::AttributeNotExists { .. } => "AttributeNotExists",
            Self::Size { operator, .. } => match operator {
                ComparisonOperator::Equals => "SizeEq",
                ComparisonOperator::NotEqual => "SizeNe",
                ComparisonOperator::LessThan => "SizeLt",
                ComparisonOperator::LessThanOrEqual => "SizeLte",
                ComparisonOperator::GreaterThan => "SizeGt",
                ComparisonOperator::GreaterThanOrEqual => "SizeGte",
            },
            Self::And(_) => "And",
            Self::Or(_) => "Or",
            Self::Not(_) => "Not",
        }
    }

    /// Operands of an `And`/`Or` node, `None` for any other variant.
    pub fn operands(&self) -> Option<&[Condition]> {
        match self {
            Self::And(conditions) | Self::Or(conditions) => Some(conditions),
            _ => None,
        }
    }

    fn combine(self, operator: LogicalOperator, other: Self) -> Self {
        let mut conditions = match (operator, self) {
            (LogicalOperator::And, Self::And(conditions))
            | (LogicalOperator::Or, Self::Or(conditions)) => conditions,
            (_, condition) => vec![condition],
        };
        match (operator, other) {
            (LogicalOperator::And, Self::And(others)) | (LogicalOperator::Or, Self::Or(others)) => {
                conditions.extend(others)
            }
            (_, condition) => conditions.push(condition),
        }
        match operator {
            LogicalOperator::And => Self::And(conditions),
            LogicalOperator::Or => Self::Or(conditions),
        }
    }
}

impl ops::BitAnd for Condition {
    type Output = Condition;

    /// Same-type operands are flattened into one `And`, anything else is wrapped.
    fn bitand(self, rhs: Self) -> Self::Output {
        self.combine(LogicalOperator::And, rhs)
    }
}

impl ops::BitOr for Condition {
    type Output = Condition;

    /// Same-type operands are flattened into one `Or`, anything else is wrapped.
    fn bitor(self, rhs: Self) -> Self::Output {
        self.combine(LogicalOperator::Or, rhs)
    }
}

impl ops::Not for Condition {
    type Output = Condition;

    fn not(self) -> Self::Output {
        Self::negate(self)
    }
}
