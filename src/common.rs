//! Common building blocks for read operations.
//!
//! This module holds the pieces shared by get, query and scan: key schemas,
//! the five comparison operators, value marshalling, and the conditions built
//! from them.

/// Key and filter conditions rendered into DynamoDB expressions.
pub mod condition;

/// Key schema types resolved from table metadata.
pub mod key;

/// The closed set of comparison operators.
pub mod operator;

/// Conversion of command-line text into attribute values.
pub mod value;

use aws_sdk_dynamodb::types;
use std::collections;

/// Placeholder base for an attribute name.
///
/// Identifiers starting with a letter are used as-is. Anything else gets a
/// positional alias starting with `_`, which no plain name can clash with.
pub(crate) fn placeholder_base(name: &str, index: usize) -> String {
    let is_plain = name
        .chars()
        .next()
        .is_some_and(|character| character.is_ascii_alphabetic())
        && name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_');
    if is_plain {
        name.to_string()
    } else {
        format!("_attr{index}")
    }
}

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// expression operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        match names {
            Some(existing) => existing.extend(self.expression_attribute_names),
            None => *names = Some(self.expression_attribute_names),
        }
        match values {
            Some(existing) => existing.extend(self.expression_attribute_values),
            None => *values = Some(self.expression_attribute_values),
        }
        self.expression
    }
}
