use crate::args::TableSpec;
use crate::common::condition::FilterCondition;

use aws_sdk_dynamodb::types;
use std::collections;

/// Request settings shared by query and scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReadInput {
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) table_name: String,
}

impl ReadInput {
    /// Build the shared settings, rendering the filter with placeholders
    /// numbered from `index`.
    pub(crate) fn new(table: TableSpec, filter: Option<FilterCondition>, index: &mut usize) -> Self {
        let (expression_attribute_names, expression_attribute_values, filter_expression) =
            match filter {
                Some(filter) => {
                    let filter_operation = filter.get_expression_operation(index);
                    (
                        Some(filter_operation.expression_attribute_names),
                        Some(filter_operation.expression_attribute_values),
                        Some(filter_operation.expression),
                    )
                }
                None => (None, None, None),
            };
        Self {
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: table.index_name,
            table_name: table.table_name,
        }
    }
}

/// apply common read settings to a query or scan builder
#[macro_export]
macro_rules! apply_read_input {
    ($builder:expr, $read_input:expr) => {
        $builder
            .set_expression_attribute_names($read_input.expression_attribute_names)
            .set_expression_attribute_values($read_input.expression_attribute_values)
            .set_filter_expression($read_input.filter_expression)
            .set_index_name($read_input.index_name)
            .table_name($read_input.table_name)
    };
}
