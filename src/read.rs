//! Read operations for retrieving items from DynamoDB tables.
//!
//! This module provides:
//! - Point lookups by full primary key
//! - Queries with key conditions and filters
//! - Scans with filters
//! - The lazy item stream both queries and scans are read through
//! - Decoding of returned items into plain JSON records

/// Request settings shared by query and scan.
pub(crate) mod common;

/// Decoding of raw items into JSON records.
pub mod decode;

/// Point lookup of a single item by primary key.
pub mod get_item;

/// Query operation with a key condition and optional filter.
pub mod query;

/// Scan operation over a table or index.
pub mod scan;

/// Lazy, page-at-a-time item streams.
pub mod stream;
