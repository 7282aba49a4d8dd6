use crate::{
    common::{condition::Condition, expression::ExpressionBuilder},
    error::Result,
};

use aws_sdk_dynamodb::types;
use std::collections;

/// Internal representation of write operation parameters.
///
/// Holds the rendered condition expression together with the placeholder maps
/// of every expression of the request, ready for the DynamoDB API call.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) table_name: String,
}

impl WriteInput {
    /// Render the condition on `builder`, after whatever it already holds (the
    /// update expression, for updates), and take its placeholder maps.
    pub(crate) fn new(write_args: WriteArgs, mut builder: ExpressionBuilder) -> Result<Self> {
        let condition_expression = write_args
            .condition
            .map(|condition| builder.build_condition_expression(&condition))
            .transpose()?;
        let (expression_attribute_names, expression_attribute_values) =
            builder.into_attribute_maps();
        Ok(Self {
            condition_expression,
            expression_attribute_names,
            expression_attribute_values,
            table_name: write_args.table_name,
        })
    }
}

/// Arguments common to all write operations (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Condition that must hold for the write to be applied.
    ///
    /// When it does not, the store rejects the write with a conditional check
    /// error and the item is left untouched.
    pub condition: Option<Condition>,
    /// The name of the table to write to.
    pub table_name: String,
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .table_name($write_operation.table_name)
    };
}
