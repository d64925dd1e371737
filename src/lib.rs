#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Item
//!
//! Reconcile a single Amazon DynamoDB item against a desired state.
//!
//! ## Overview
//!
//! Given a table and either an item (`present`) or a key (`absent`), this crate performs at
//! most one read and at most one write, then reports whether anything changed along with
//! the item before and after:
//! - `present` puts the item, replacing whatever was stored under its key
//! - `absent` deletes the item at the key, if any
//! - a dry run only observes and predicts the outcome
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_item::{config, params, reconcile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let args: params::ModuleArgs = serde_json::from_str(
//!     r#"{"table": "test-table", "item": "{\"key\": {\"S\": \"aaaaa\"}, \"value\": {\"S\": \"bbbb\"}}"}"#,
//! )?;
//! let request = params::Request::from_args(&args)?;
//! let client = config::connect(&args.connection).await?;
//! let result = reconcile::reconcile(&client, &request).await?;
//! println!("{}", result.render(request.format));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Item representation, attribute codec, and keys
//! - [`mod@read`] - Read operations (DescribeTable, GetItem)
//! - [`mod@write`] - Write operations (PutItem, DeleteItem)
//! - [`mod@store`] - The table storage capability and its implementations
//! - [`mod@reconcile`] - The reconciler

/// Common utilities for items, attribute values, and keys.
pub mod common;

/// Connection resolution: region, credentials, endpoint.
pub mod config;

/// Error types.
pub mod error;

/// Module arguments and request validation.
pub mod params;

/// Read operations for observing a table and its items.
pub mod read;

/// Reconciliation of one item against its desired state.
pub mod reconcile;

/// Table storage capability.
pub mod store;

/// Write operations for modifying an item.
pub mod write;

pub use error::{Error, Result};
