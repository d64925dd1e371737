//! Read operations for observing a table and its items.
//!
//! This module provides:
//! - Describing a table to find its hash key attribute
//! - Getting an individual item by primary key

/// Common utilities and types for read operations.
pub mod common;

/// Describe table operation and the schema derived from it.
pub mod describe_table;

/// Get item operation for retrieving a single item by primary key.
pub mod get_item;
