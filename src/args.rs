//! Parsing of positional command-line tokens into read requests.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! table[:index]  partition-value  [op]sort-value  --filter field<op>value ...
//! ```
//!
//! where `op` is one of `=`, `<`, `<=`, `>`, `>=` and defaults to `=`.

use crate::common::operator::Operator;
use crate::error::UsageError;

use std::{fmt, str};

/// Table name with an optional secondary index.
///
/// ```rust
/// use ddb::args::TableSpec;
///
/// let spec: TableSpec = "orders:byStatus".parse().unwrap();
/// assert_eq!(spec.table_name, "orders");
/// assert_eq!(spec.index_name.as_deref(), Some("byStatus"));
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TableSpec {
    /// The table name.
    pub table_name: String,
    /// The secondary index to read from, if any.
    pub index_name: Option<String>,
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index_name {
            Some(index_name) => write!(f, "{}:{index_name}", self.table_name),
            None => f.write_str(&self.table_name),
        }
    }
}

impl str::FromStr for TableSpec {
    type Err = UsageError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (table_name, index_name) = match spec.split_once(':') {
            Some((table_name, index_name)) => (table_name, Some(index_name)),
            None => (spec, None),
        };
        if table_name.is_empty() {
            return Err(UsageError::EmptyTableName {
                spec: spec.to_string(),
            });
        }
        Ok(Self {
            table_name: table_name.to_string(),
            index_name: index_name
                .filter(|index_name| !index_name.is_empty())
                .map(str::to_string),
        })
    }
}

impl TableSpec {
    /// Take the table spec from `--table` when given, otherwise from the first positional.
    ///
    /// Returns the spec and the remaining positional values.
    pub fn from_positionals(
        table: Option<&str>,
        mut positionals: Vec<String>,
    ) -> Result<(Self, Vec<String>), UsageError> {
        match table {
            Some(table) => Ok((table.parse()?, positionals)),
            None if positionals.is_empty() => Err(UsageError::MissingTable),
            None => {
                let spec = positionals.remove(0).parse()?;
                Ok((spec, positionals))
            }
        }
    }
}

/// `field<op>value` clause given with `--filter`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FilterClause {
    /// The attribute to filter on.
    pub field: String,
    /// How the attribute is compared.
    pub operator: Operator,
    /// The value as typed; its type is inferred when marshalled.
    pub raw_value: String,
}

impl str::FromStr for FilterClause {
    type Err = UsageError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (field, operator, raw_value) =
            Operator::split_once(token).ok_or_else(|| UsageError::InvalidFilter {
                token: token.to_string(),
            })?;
        if field.is_empty() {
            return Err(UsageError::EmptyFilterField {
                token: token.to_string(),
            });
        }
        Ok(Self {
            field: field.to_string(),
            operator,
            raw_value: raw_value.to_string(),
        })
    }
}

fn parse_filters(tokens: &[String]) -> Result<Vec<FilterClause>, UsageError> {
    tokens.iter().map(|token| token.parse()).collect()
}

/// Point lookup request: one value per key of the base table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GetRequest {
    /// The table to read from.
    pub table: TableSpec,
    /// Key values in schema order.
    pub key_values: Vec<String>,
}

impl GetRequest {
    /// Validate the parts of a get request that do not need the schema.
    pub fn new(table: TableSpec, key_values: Vec<String>) -> Result<Self, UsageError> {
        if let Some(index) = &table.index_name {
            return Err(UsageError::IndexNotSupported {
                command: "get",
                index: index.clone(),
            });
        }
        if key_values.len() > 2 {
            return Err(UsageError::TooManyValues {
                command: "get",
                max: 2,
                supplied: key_values.len(),
            });
        }
        Ok(Self { table, key_values })
    }
}

/// Range query request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryRequest {
    /// The table or index to query.
    pub table: TableSpec,
    /// The partition key value.
    pub partition_value: String,
    /// The sort key value, without its operator.
    pub sort_value: Option<String>,
    /// How the sort key is compared.
    pub sort_operator: Operator,
    /// Filter clauses in the order given.
    pub filters: Vec<FilterClause>,
}

impl QueryRequest {
    /// Parse `partition-value [op]sort-value` plus filter tokens.
    ///
    /// An empty sort token is treated as absent.
    ///
    /// ```rust
    /// use ddb::args::{QueryRequest, TableSpec};
    /// use ddb::common::operator::Operator;
    ///
    /// let request = QueryRequest::parse(
    ///     "mytable".parse().unwrap(),
    ///     vec!["abc".to_string(), ">100".to_string()],
    ///     &[],
    /// )
    /// .unwrap();
    /// assert_eq!(request.sort_value.as_deref(), Some("100"));
    /// assert_eq!(request.sort_operator, Operator::GreaterThan);
    /// ```
    pub fn parse(
        table: TableSpec,
        values: Vec<String>,
        filters: &[String],
    ) -> Result<Self, UsageError> {
        if values.len() > 2 {
            return Err(UsageError::TooManyValues {
                command: "query",
                max: 2,
                supplied: values.len(),
            });
        }
        let mut values = values.into_iter();
        let partition_value = values
            .next()
            .ok_or_else(|| UsageError::MissingPartitionValue {
                table: table.to_string(),
            })?;
        let (sort_operator, sort_value) = match values.next() {
            Some(token) if !token.is_empty() => {
                let (operator, value) = Operator::strip_prefix(&token);
                (operator, Some(value.to_string()))
            }
            _ => (Operator::Equal, None),
        };
        Ok(Self {
            table,
            partition_value,
            sort_value,
            sort_operator,
            filters: parse_filters(filters)?,
        })
    }
}

/// Full table or index scan request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanRequest {
    /// The table or index to scan.
    pub table: TableSpec,
    /// Filter clauses in the order given.
    pub filters: Vec<FilterClause>,
}

impl ScanRequest {
    /// Parse a scan request; scans take no key values.
    pub fn parse(
        table: TableSpec,
        values: Vec<String>,
        filters: &[String],
    ) -> Result<Self, UsageError> {
        if !values.is_empty() {
            return Err(UsageError::TooManyValues {
                command: "scan",
                max: 0,
                supplied: values.len(),
            });
        }
        Ok(Self {
            table,
            filters: parse_filters(filters)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn table(table_name: &str) -> TableSpec {
        TableSpec {
            table_name: table_name.to_string(),
            index_name: None,
        }
    }

    #[rstest]
    #[case::table_only("users", "users", None)]
    #[case::with_index("users:byEmail", "users", Some("byEmail"))]
    #[case::empty_index("users:", "users", None)]
    #[case::first_colon_only("users:a:b", "users", Some("a:b"))]
    fn test_table_spec(
        #[case] spec: &str,
        #[case] table_name: &str,
        #[case] index_name: Option<&str>,
    ) {
        let actual: TableSpec = spec.parse().unwrap();
        assert_eq!(actual.table_name, table_name);
        assert_eq!(actual.index_name.as_deref(), index_name);
    }

    #[rstest]
    #[case::empty("")]
    #[case::index_only(":byEmail")]
    fn test_table_spec_empty_table(#[case] spec: &str) {
        let actual = spec.parse::<TableSpec>();
        assert_eq!(
            actual,
            Err(UsageError::EmptyTableName {
                spec: spec.to_string()
            })
        );
    }

    #[rstest]
    #[case::positional(None, &["users:byEmail", "a", "b"], "users:byEmail", &["a", "b"])]
    #[case::legacy_flag(Some("users"), &["a", "b"], "users", &["a", "b"])]
    #[case::legacy_flag_no_values(Some("users"), &[], "users", &[])]
    fn test_from_positionals(
        #[case] flag: Option<&str>,
        #[case] positionals: &[&str],
        #[case] spec: &str,
        #[case] rest: &[&str],
    ) {
        let (actual_spec, actual_rest) =
            TableSpec::from_positionals(flag, strings(positionals)).unwrap();
        assert_eq!(actual_spec.to_string(), spec);
        assert_eq!(actual_rest, strings(rest));
    }

    #[test]
    fn test_from_positionals_missing_table() {
        let actual = TableSpec::from_positionals(None, vec![]);
        assert_eq!(actual, Err(UsageError::MissingTable));
    }

    #[rstest]
    #[case::equal("status=active", "status", Operator::Equal, "active")]
    #[case::less_than_equal("field<=5", "field", Operator::LessThanOrEqual, "5")]
    #[case::greater_than_equal("age>=21", "age", Operator::GreaterThanOrEqual, "21")]
    #[case::quoted("zip=\"02134\"", "zip", Operator::Equal, "\"02134\"")]
    #[case::empty_value("note=", "note", Operator::Equal, "")]
    fn test_filter_clause(
        #[case] token: &str,
        #[case] field: &str,
        #[case] operator: Operator,
        #[case] raw_value: &str,
    ) {
        let actual: FilterClause = token.parse().unwrap();
        assert_eq!(
            actual,
            FilterClause {
                field: field.to_string(),
                operator,
                raw_value: raw_value.to_string(),
            }
        );
    }

    #[rstest]
    #[case::no_operator("status", UsageError::InvalidFilter { token: "status".to_string() })]
    #[case::no_field("=active", UsageError::EmptyFilterField { token: "=active".to_string() })]
    fn test_filter_clause_invalid(#[case] token: &str, #[case] expected: UsageError) {
        assert_eq!(token.parse::<FilterClause>(), Err(expected));
    }

    #[rstest]
    #[case::partition_only(&["abc"], None, Operator::Equal)]
    #[case::sort_default(&["abc", "100"], Some("100"), Operator::Equal)]
    #[case::sort_greater_than(&["abc", ">100"], Some("100"), Operator::GreaterThan)]
    #[case::sort_less_than_equal(&["abc", "<=5"], Some("5"), Operator::LessThanOrEqual)]
    #[case::sort_explicit_equal(&["abc", "=x"], Some("x"), Operator::Equal)]
    #[case::empty_sort(&["abc", ""], None, Operator::Equal)]
    fn test_query_request(
        #[case] values: &[&str],
        #[case] sort_value: Option<&str>,
        #[case] sort_operator: Operator,
    ) {
        let actual = QueryRequest::parse(table("mytable"), strings(values), &[]).unwrap();
        assert_eq!(actual.partition_value, "abc");
        assert_eq!(actual.sort_value.as_deref(), sort_value);
        assert_eq!(actual.sort_operator, sort_operator);
        assert!(actual.filters.is_empty());
    }

    #[test]
    fn test_query_request_filters_keep_order() {
        let actual = QueryRequest::parse(
            table("mytable"),
            strings(&["abc"]),
            &strings(&["status=active", "age>21"]),
        )
        .unwrap();
        let fields: Vec<_> = actual
            .filters
            .iter()
            .map(|filter| filter.field.as_str())
            .collect();
        assert_eq!(fields, ["status", "age"]);
    }

    #[rstest]
    #[case::missing_partition(
        &[],
        UsageError::MissingPartitionValue { table: "mytable".to_string() }
    )]
    #[case::too_many(
        &["a", "b", "c"],
        UsageError::TooManyValues { command: "query", max: 2, supplied: 3 }
    )]
    fn test_query_request_arity(#[case] values: &[&str], #[case] expected: UsageError) {
        let actual = QueryRequest::parse(table("mytable"), strings(values), &[]);
        assert_eq!(actual, Err(expected));
    }

    #[test]
    fn test_get_request_rejects_index() {
        let spec: TableSpec = "users:byEmail".parse().unwrap();
        let actual = GetRequest::new(spec, strings(&["a"]));
        assert_eq!(
            actual,
            Err(UsageError::IndexNotSupported {
                command: "get",
                index: "byEmail".to_string(),
            })
        );
    }

    #[test]
    fn test_scan_request_rejects_values() {
        let actual = ScanRequest::parse(table("users"), strings(&["a"]), &[]);
        assert_eq!(
            actual,
            Err(UsageError::TooManyValues {
                command: "scan",
                max: 0,
                supplied: 1,
            })
        );
    }
}
