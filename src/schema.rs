//! Key schema resolution for tables and secondary indexes.

use crate::args::TableSpec;
use crate::common::key::{Key, KeyRole, KeySchema, ScalarType};
use crate::error::SchemaError;

use async_trait::async_trait;
use aws_sdk_dynamodb::types;
use tracing::debug;

/// Source of table metadata.
///
/// Implemented by [`crate::session::Session`] over `DescribeTable`; tests
/// use in-memory descriptions.
#[async_trait]
pub trait DescribeTable {
    /// Describe `table_name`.
    async fn describe_table(&self, table_name: &str)
    -> Result<types::TableDescription, SchemaError>;
}

/// Resolve the key schema of a table, or of one of its secondary indexes.
pub async fn resolve<D>(describer: &D, table: &TableSpec) -> Result<KeySchema, SchemaError>
where
    D: DescribeTable + ?Sized,
{
    debug!(table = %table.table_name, "describing table");
    let description = describer.describe_table(&table.table_name).await?;
    let schema = key_schema(&table.table_name, &description, table.index_name.as_deref())?;
    debug!(table = %table, keys = %schema.names(), "resolved key schema");
    Ok(schema)
}

/// Extract the key schema from a table description.
///
/// Index key schemas do not redeclare types, so every key's type is looked
/// up in the table's attribute definitions.
pub fn key_schema(
    table_name: &str,
    description: &types::TableDescription,
    index_name: Option<&str>,
) -> Result<KeySchema, SchemaError> {
    let elements = match index_name {
        None => description.key_schema(),
        Some(index_name) => index_key_schema(description, index_name).ok_or_else(|| {
            SchemaError::IndexNotFound {
                table: table_name.to_string(),
                index: index_name.to_string(),
            }
        })?,
    };
    let invalid = |message: String| SchemaError::Invalid {
        table: table_name.to_string(),
        message,
    };
    let mut partition_key = None;
    let mut sort_key = None;
    for element in elements {
        let name = element.attribute_name();
        let role = KeyRole::try_from(element.key_type()).map_err(invalid)?;
        let definition = description
            .attribute_definitions()
            .iter()
            .find(|definition| definition.attribute_name() == name)
            .ok_or_else(|| invalid(format!("key {name} has no attribute definition")))?;
        let scalar_type = ScalarType::try_from(definition.attribute_type()).map_err(invalid)?;
        let key = Key {
            name: name.to_string(),
            role,
            scalar_type,
        };
        let slot = match role {
            KeyRole::Partition => &mut partition_key,
            KeyRole::Sort => &mut sort_key,
        };
        if slot.replace(key).is_some() {
            return Err(invalid(format!("more than one {role:?} key")));
        }
    }
    let partition_key = partition_key.ok_or_else(|| invalid("no partition key".to_string()))?;
    Ok(KeySchema {
        partition_key,
        sort_key,
    })
}

fn index_key_schema<'a>(
    description: &'a types::TableDescription,
    index_name: &str,
) -> Option<&'a [types::KeySchemaElement]> {
    let global = description
        .global_secondary_indexes()
        .iter()
        .find(|index| index.index_name() == Some(index_name))
        .map(|index| index.key_schema());
    global.or_else(|| {
        description
            .local_secondary_indexes()
            .iter()
            .find(|index| index.index_name() == Some(index_name))
            .map(|index| index.key_schema())
    })
}
