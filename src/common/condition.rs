use crate::args::FilterClause;
use crate::common::{self, key::Key, operator::Operator, value};
use crate::error::{Error, MarshalError, Result};

use aws_sdk_dynamodb::types;
use std::{collections, fmt};

const AND: &str = " AND ";

/// Single attribute comparison, the leaf of every condition.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use ddb::common::{condition::Comparison, operator::Operator};
///
/// let comparison = Comparison {
///     name: "ts".to_string(),
///     operator: Operator::GreaterThan,
///     value: AttributeValue::N("100".to_string()),
/// };
/// assert_eq!(comparison.to_string(), "ts > 100");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// The attribute name.
    pub name: String,
    /// How the attribute is compared.
    pub operator: Operator,
    /// The value it is compared against.
    pub value: types::AttributeValue,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.name, self.operator)?;
        match &self.value {
            types::AttributeValue::S(string) => write!(f, "{string:?}"),
            types::AttributeValue::N(number) => f.write_str(number),
            types::AttributeValue::Bool(boolean) => write!(f, "{boolean}"),
            types::AttributeValue::Null(_) => f.write_str("null"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl Comparison {
    /// Compare a key attribute, checking the value carries the key's declared type.
    pub fn for_key(key: &Key, operator: Operator, value: types::AttributeValue) -> Result<Self> {
        if !key.scalar_type.matches(&value) {
            return Err(Error::Marshal {
                target: format!("key {}", key.name),
                value: format!("{value:?}"),
                scalar_type: key.scalar_type,
                source: MarshalError::TypeMismatch {
                    expected: key.scalar_type,
                },
            });
        }
        Ok(Self {
            name: key.name.clone(),
            operator,
            value,
        })
    }

    /// Compare a filter field against its value, marshalled with the inferred type.
    pub fn for_filter(clause: &FilterClause) -> Result<Self> {
        let (raw, scalar_type) = value::infer(&clause.raw_value);
        let value = value::marshal(raw, scalar_type).map_err(|source| Error::Marshal {
            target: format!("filter on field {}", clause.field),
            value: raw.to_string(),
            scalar_type,
            source,
        })?;
        Ok(Self {
            name: clause.field.clone(),
            operator: clause.operator,
            value,
        })
    }

    fn get_expression(self, index: &mut usize) -> common::ExpressionInput {
        let base = common::placeholder_base(&self.name, *index);
        let name_placeholder = format!("#{base}");
        let value_placeholder = format!(":{base}_{}{index}", self.operator.placeholder_suffix());
        *index += 1;
        let expression = match self.operator {
            Operator::Equal => format!("{name_placeholder} = {value_placeholder}"),
            Operator::LessThan => format!("{name_placeholder} < {value_placeholder}"),
            Operator::LessThanOrEqual => format!("{name_placeholder} <= {value_placeholder}"),
            Operator::GreaterThan => format!("{name_placeholder} > {value_placeholder}"),
            Operator::GreaterThanOrEqual => format!("{name_placeholder} >= {value_placeholder}"),
        };
        common::ExpressionInput {
            expression,
            expression_attribute_names: collections::HashMap::from([(name_placeholder, self.name)]),
            expression_attribute_values: collections::HashMap::from([(
                value_placeholder,
                self.value,
            )]),
        }
    }
}

/// Key condition: partition key equality, optionally AND a sort key comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition {
    /// Equality on the partition key.
    pub partition: Comparison,
    /// Comparison on the sort key.
    pub sort: Option<Comparison>,
}

impl fmt::Display for KeyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.partition)?;
        if let Some(sort) = &self.sort {
            write!(f, "{AND}{sort}")?;
        }
        Ok(())
    }
}

impl KeyCondition {
    /// Build the key condition from marshalled key values.
    pub fn new(
        partition_key: &Key,
        partition_value: types::AttributeValue,
        sort: Option<(&Key, Operator, types::AttributeValue)>,
    ) -> Result<Self> {
        let partition = Comparison::for_key(partition_key, Operator::Equal, partition_value)?;
        let sort = sort
            .map(|(key, operator, value)| Comparison::for_key(key, operator, value))
            .transpose()?;
        Ok(Self { partition, sort })
    }

    pub(crate) fn get_expression_operation(self, index: &mut usize) -> common::ExpressionInput {
        let mut operations = vec![self.partition.get_expression(index)];
        if let Some(sort) = self.sort {
            operations.push(sort.get_expression(index));
        }
        common::ExpressionInput::merge(AND, operations)
    }
}

/// Filter condition: a conjunction of comparisons, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterCondition {
    /// The conjoined comparisons, never empty.
    pub clauses: Vec<Comparison>,
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, clause) in self.clauses.iter().enumerate() {
            if position > 0 {
                f.write_str(AND)?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

impl FilterCondition {
    /// Build the filter condition, or `None` when there are no clauses.
    pub fn from_clauses(clauses: &[FilterClause]) -> Result<Option<Self>> {
        if clauses.is_empty() {
            return Ok(None);
        }
        let clauses = clauses
            .iter()
            .map(Comparison::for_filter)
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Self { clauses }))
    }

    pub(crate) fn get_expression_operation(self, index: &mut usize) -> common::ExpressionInput {
        let operations = self
            .clauses
            .into_iter()
            .map(|clause| clause.get_expression(index))
            .collect();
        common::ExpressionInput::merge(AND, operations)
    }
}
