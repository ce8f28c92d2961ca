use crate::common::key::ScalarType;

use std::io;

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for a command invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command-line arguments have the wrong count or shape.
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// The table or index schema could not be resolved.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A key or filter value could not be converted to its attribute type.
    #[error("failed to marshal {target} with value {value:?} to type {scalar_type}")]
    Marshal {
        /// Which argument or filter was being converted.
        target: String,
        /// The raw text supplied on the command line.
        value: String,
        /// The declared or inferred type.
        scalar_type: ScalarType,
        /// The underlying conversion failure.
        #[source]
        source: MarshalError,
    },
    /// The store rejected a request or a page could not be fetched.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// A returned item could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The configuration file could not be loaded.
    #[error("invalid configuration in {path}: {message}")]
    Config {
        /// The configuration file path.
        path: String,
        /// What went wrong.
        message: String,
    },
    /// A record could not be written to the output.
    #[error("failed to write record")]
    Output(#[from] io::Error),
    /// A record could not be serialized as JSON.
    #[error("failed to serialize record as json")]
    Serialize(#[from] serde_json::Error),
}

/// Bad argument count or shape, detected before any store call.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum UsageError {
    /// No table was given either positionally or with `--table`.
    #[error("missing table name: pass <table[:index]> or --table")]
    MissingTable,
    /// The table spec has nothing before the `:`.
    #[error("invalid table spec {spec:?}: table name is empty")]
    EmptyTableName {
        /// The table spec as given.
        spec: String,
    },
    /// A query was given without a partition key value.
    #[error("query on {table} requires a partition key value")]
    MissingPartitionValue {
        /// The table spec.
        table: String,
    },
    /// More positional values than the command accepts.
    #[error("{command} accepts at most {max} key value(s), {supplied} were provided")]
    TooManyValues {
        /// The subcommand name.
        command: &'static str,
        /// The maximum number of values.
        max: usize,
        /// How many were supplied.
        supplied: usize,
    },
    /// The number of key values does not match the table's key schema.
    #[error(
        "get requires one argument per key, {supplied} were provided. table {table} has {expected} key(s): {keys}"
    )]
    KeyArity {
        /// The table name.
        table: String,
        /// How many values were supplied.
        supplied: usize,
        /// How many keys the table declares.
        expected: usize,
        /// The declared key names, comma separated.
        keys: String,
    },
    /// A sort value was given for a table or index without a sort key.
    #[error("{table} has no sort key, but sort value {value:?} was provided")]
    NoSortKey {
        /// The table spec.
        table: String,
        /// The sort value that was supplied.
        value: String,
    },
    /// The command cannot target a secondary index.
    #[error("{command} does not support secondary indexes, got index {index:?}")]
    IndexNotSupported {
        /// The subcommand name.
        command: &'static str,
        /// The index that was requested.
        index: String,
    },
    /// A filter token has no comparison operator.
    #[error("invalid filter {token:?}: expected <field><op><value> with op one of =, <, <=, >, >=")]
    InvalidFilter {
        /// The filter token as given.
        token: String,
    },
    /// A filter token has nothing before its operator.
    #[error("invalid filter {token:?}: field name is empty")]
    EmptyFilterField {
        /// The filter token as given.
        token: String,
    },
}

/// Failure resolving a table or index key schema.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// The table does not exist.
    #[error("table {table} not found")]
    TableNotFound {
        /// The table name.
        table: String,
    },
    /// The table exists but has no index with this name.
    #[error("index {index} not found on table {table}")]
    IndexNotFound {
        /// The table name.
        table: String,
        /// The index name.
        index: String,
    },
    /// The describe call failed for a reason other than a missing table.
    #[error("failed to describe table {table}: {message}")]
    Transient {
        /// The table name.
        table: String,
        /// The client's error report.
        message: String,
    },
    /// The table metadata is inconsistent or uses an unknown type.
    #[error("table {table} has an invalid key schema: {message}")]
    Invalid {
        /// The table name.
        table: String,
        /// What is wrong with the metadata.
        message: String,
    },
}

/// Failure converting command-line text to an attribute value.
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    /// The text is not a decimal number.
    #[error("{value:?} is not a valid number")]
    InvalidNumber {
        /// The rejected text.
        value: String,
    },
    /// The value's tag differs from the key's declared type.
    #[error("value does not carry the declared type {expected}")]
    TypeMismatch {
        /// The declared type.
        expected: ScalarType,
    },
    /// Values of this type cannot be typed on a command line.
    #[error("{scalar_type} values cannot be supplied as command-line text")]
    Unsupported {
        /// The unsupported type.
        scalar_type: ScalarType,
    },
    /// The encoding layer rejected the value.
    #[error(transparent)]
    Encoding(#[from] serde_dynamo::Error),
}

/// Failure reported by the store while reading items.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// One page of a query or scan could not be fetched.
    #[error("failed to retrieve page {page} from {operation} on table {table}: {message}")]
    Page {
        /// `query` or `scan`.
        operation: &'static str,
        /// The table name.
        table: String,
        /// The 1-based page number that failed.
        page: usize,
        /// The client's error report.
        message: String,
    },
    /// A point lookup failed.
    #[error("failed to get item from table {table}: {message}")]
    GetItem {
        /// The table name.
        table: String,
        /// The client's error report.
        message: String,
    },
}

/// Failure decoding a returned item.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// An `N` value does not hold a decimal number.
    #[error("attribute {path}: invalid number {value:?}")]
    InvalidNumber {
        /// Dotted path to the attribute.
        path: String,
        /// The rejected text.
        value: String,
    },
    /// The attribute value carries a tag this client does not know.
    #[error("attribute {path}: unsupported attribute value type")]
    UnknownType {
        /// Dotted path to the attribute.
        path: String,
    },
}
