use crate::{
    common::{
        condition::{ComparisonOperator, Condition, LogicalOperator},
        value::EncodedValue,
    },
    error::{Error, Result},
};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use std::collections;

const NAME_PREFIX: &str = "#n";
const VALUE_PREFIX: &str = ":v";

/// Compiles conditions and updates into expression strings with placeholders.
///
/// Each attribute name gets one `#n<i>` placeholder that is reused every time
/// the name is referenced again; every value gets a fresh `:v<i>` placeholder.
/// Counters live as long as the builder, so a key condition and a filter built
/// on the same builder share one placeholder namespace. Use one builder per
/// store request.
///
/// ```rust
/// use dynamodb_mapper::common::{condition::Condition, expression::ExpressionBuilder};
///
/// let mut builder = ExpressionBuilder::new();
/// let condition = Condition::greater_than("age", 18) & Condition::equals("status", "active");
/// let expression = builder.build_condition_expression(&condition).unwrap();
/// assert_eq!(expression, "(#n0 > :v0 AND #n1 = :v1)");
/// assert_eq!(builder.attribute_names()["#n1"], "status");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionBuilder {
    names: IndexMap<String, String>,
    values: IndexMap<String, types::AttributeValue>,
    value_index: usize,
}

impl ExpressionBuilder {
    /// Empty builder with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn name_placeholder(&mut self, name: &str) -> String {
        if let Some(placeholder) = self.names.get(name) {
            return placeholder.clone();
        }
        let placeholder = format!("{NAME_PREFIX}{}", self.names.len());
        self.names.insert(name.to_string(), placeholder.clone());
        placeholder
    }

    fn push_value(&mut self, value: types::AttributeValue) -> String {
        let placeholder = format!("{VALUE_PREFIX}{}", self.value_index);
        self.value_index += 1;
        self.values.insert(placeholder.clone(), value);
        placeholder
    }

    pub(crate) fn value_placeholder(&mut self, value: &EncodedValue) -> Result<String> {
        let value = value.attribute_value()?.clone();
        Ok(self.push_value(value))
    }

    /// Render `condition` as a condition or filter expression.
    ///
    /// Fails with [`Error::Serialization`] when a literal of the condition could
    /// not be encoded.
    pub fn build_condition_expression(&mut self, condition: &Condition) -> Result<String> {
        let expression = match condition {
            Condition::Comparison {
                field,
                operator,
                value,
            } => {
                let name = self.name_placeholder(field);
                let value = self.value_placeholder(value)?;
                format!("{} {} {}", name, &**operator, value)
            }
            Condition::Between {
                field,
                lower,
                upper,
            } => {
                let name = self.name_placeholder(field);
                let lower = self.value_placeholder(lower)?;
                let upper = self.value_placeholder(upper)?;
                format!("{} BETWEEN {} AND {}", name, lower, upper)
            }
            Condition::BeginsWith { field, prefix } => {
                let name = self.name_placeholder(field);
                let prefix = self.value_placeholder(prefix)?;
                format!("begins_with({}, {})", name, prefix)
            }
            Condition::Contains { field, value } => {
                let name = self.name_placeholder(field);
                let value = self.value_placeholder(value)?;
                format!("contains({}, {})", name, value)
            }
            Condition::In { field, values } => {
                let name = self.name_placeholder(field);
                let placeholders = values
                    .iter()
                    .map(|value| self.value_placeholder(value))
                    .collect::<Result<Vec<_>>>()?;
                format!("{} IN ({})", name, placeholders.join(", "))
            }
            Condition::AttributeExists { field } => {
                let name = self.name_placeholder(field);
                format!("attribute_exists({})", name)
            }
            Condition::AttributeNotExists { field } => {
                let name = self.name_placeholder(field);
                format!("attribute_not_exists({})", name)
            }
            Condition::Size {
                field,
                operator,
                value,
            } => {
                let name = self.name_placeholder(field);
                let value = self.push_value(types::AttributeValue::N(value.to_string()));
                format!("size({}) {} {}", name, &**operator, value)
            }
            Condition::And(conditions) => self.build_logical(LogicalOperator::And, conditions)?,
            Condition::Or(conditions) => self.build_logical(LogicalOperator::Or, conditions)?,
            Condition::Not(condition) => {
                let inner = self.build_condition_expression(condition)?;
                format!("NOT ({})", inner)
            }
        };
        Ok(expression)
    }

    fn build_logical(
        &mut self,
        operator: LogicalOperator,
        conditions: &[Condition],
    ) -> Result<String> {
        let expressions = conditions
            .iter()
            .map(|condition| self.build_condition_expression(condition))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", expressions.join(&*operator)))
    }

    /// Render a query key condition: partition key equality, then the optional
    /// sort key condition.
    ///
    /// Only comparisons other than `<>`, `BETWEEN` and `begins_with` are valid on a
    /// sort key; any other variant fails with [`Error::UnknownConditionType`].
    pub fn build_key_condition_expression(
        &mut self,
        partition_key: &str,
        partition_value: types::AttributeValue,
        sort_key_condition: Option<&Condition>,
    ) -> Result<String> {
        let name = self.name_placeholder(partition_key);
        let value = self.push_value(partition_value);
        let mut expression = format!("{} = {}", name, value);
        if let Some(condition) = sort_key_condition {
            let supported = match condition {
                Condition::Comparison { operator, .. } => {
                    *operator != ComparisonOperator::NotEqual
                }
                Condition::Between { .. } | Condition::BeginsWith { .. } => true,
                _ => false,
            };
            if !supported {
                return Err(Error::UnknownConditionType {
                    condition_type: condition.type_name(),
                });
            }
            let sort_expression = self.build_condition_expression(condition)?;
            expression = format!("{}{}{}", expression, &*LogicalOperator::And, sort_expression);
        }
        Ok(expression)
    }

    /// Render `SET` assignments, one per entry, in insertion order.
    ///
    /// Fails with [`Error::EmptyUpdate`] when `updates` is empty, and with
    /// [`Error::Serialization`] when a value could not be encoded.
    pub fn build_update_expression(
        &mut self,
        updates: &IndexMap<String, EncodedValue>,
    ) -> Result<String> {
        if updates.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        let assignments = updates
            .iter()
            .map(|(field, value)| {
                let name = self.name_placeholder(field);
                let value = self.value_placeholder(value)?;
                Ok(format!("{} = {}", name, value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("SET {}", assignments.join(", ")))
    }

    /// Placeholder to attribute name map, as sent in `ExpressionAttributeNames`.
    pub fn attribute_names(&self) -> collections::HashMap<String, String> {
        self.names
            .iter()
            .map(|(name, placeholder)| (placeholder.clone(), name.clone()))
            .collect()
    }

    /// Placeholder to value map, as sent in `ExpressionAttributeValues`.
    pub fn attribute_values(&self) -> collections::HashMap<String, types::AttributeValue> {
        self.values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), value.clone()))
            .collect()
    }

    /// Consume the builder into the request's name and value maps; an empty map
    /// becomes `None` since the store rejects empty placeholder maps.
    pub(crate) fn into_attribute_maps(
        self,
    ) -> (
        Option<collections::HashMap<String, String>>,
        Option<collections::HashMap<String, types::AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then(|| {
            self.names
                .into_iter()
                .map(|(name, placeholder)| (placeholder, name))
                .collect()
        });
        let values = (!self.values.is_empty()).then(|| self.values.into_iter().collect());
        (names, values)
    }
}
