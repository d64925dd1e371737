//! Write operations for modifying an item in a table.
//!
//! This module provides:
//! - Putting a new item or replacing an existing one
//! - Deleting an item by primary key

/// Common utilities and types for write operations.
pub mod common;

/// Delete item operation for removing items from tables.
pub mod delete_item;

/// Put item operation for creating or replacing items.
pub mod put_item;
