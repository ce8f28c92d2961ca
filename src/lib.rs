#![deny(missing_docs)]
#![deny(warnings)]

//! # ddb
//!
//! Terse, read-only access to Amazon DynamoDB tables from the command line.
//!
//! ## Overview
//!
//! Key values are given positionally and typed against the table's key
//! schema, so there are no expression strings or attribute type tags to
//! write by hand:
//!
//! ```text
//! ddb get   users abc
//! ddb query orders:byCustomer c-42 ">=2024-01-01" --filter status=shipped
//! ddb scan  orders --filter total>100
//! ```
//!
//! The library holds every step of that pipeline:
//! - Parsing positional tokens into requests
//! - Resolving the key schema of a table or secondary index
//! - Marshalling text into typed attribute values
//! - Building key conditions and filters with collision-free placeholders
//! - Streaming paginated results lazily, one page per pull
//! - Decoding items into plain JSON records
//!
//! ## Quick Example
//!
//! ```no_run
//! use ddb::{args::QueryRequest, output, read, session::Session};
//!
//! # async fn example() -> ddb::Result<()> {
//! let session = Session::from_env(None, None).await;
//! let request = QueryRequest::parse(
//!     "orders".parse()?,
//!     vec!["c-42".to_string(), ">100".to_string()],
//!     &["status=shipped".to_string()],
//! )?;
//! let query = read::query::Query::plan(&session, request).await?;
//! let records = read::decode::decode_stream(session.query(query).into_stream());
//! let mut printer = output::Printer::new(std::io::stdout(), Default::default());
//! output::print_all(records, &mut printer).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@args`] - Positional argument grammar
//! - [`mod@common`] - Keys, operators, values and conditions
//! - [`mod@read`] - Get, query and scan, the item stream and the decoder
//! - [`mod@schema`] - Key schema resolution
//! - [`mod@session`] - The store client

/// Parsing of positional tokens into get, query and scan requests.
pub mod args;

/// Common utilities for keys, operators, values and conditions.
pub mod common;

/// Configuration file and settings precedence.
pub mod config;

/// Error types for every stage of a command.
pub mod error;

/// Rendering of records as JSON text.
pub mod output;

/// Read operations for retrieving items from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions
/// - Scanning tables and indexes
pub mod read;

/// Key schema resolution.
pub mod schema;

/// The store session.
pub mod session;

pub use error::{Error, Result};
