//! Common utilities for item reconciliation.
//!
//! This module provides the item representation shared by the read and write operations:
//! the type-tagged attribute codec, item comparison, and key projection.

/// Type-tagged JSON codec for attribute values.
pub mod attribute;

/// Item representation, payload formats, and comparison.
pub mod item;

/// Key type for addressing a single item.
pub mod key;
