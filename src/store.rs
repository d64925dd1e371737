//! Table storage capability used by the reconciler.
//!
//! [`TableStore`] is the minimal interface the reconciler needs from the remote service.
//! It is implemented for the SDK [`Client`] and by [`memory::MemoryStore`].

/// In-memory table store.
pub mod memory;

use crate::common::{item::Item, key::Key};
use crate::error::{Error, Result};
use crate::read::{self, describe_table::TableSchema};
use crate::write;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types};

/// Remote table operations, one call each, never retried here.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Look up the table's schema.
    ///
    /// Fails with [`Error::RemoteLookup`] when the table does not exist or the call fails.
    async fn describe_table(&self, table_name: &str) -> Result<TableSchema>;

    /// Read the item at `key`, `None` when there is no such item.
    ///
    /// Fails with [`Error::RemoteRead`].
    async fn get_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>>;

    /// Write `item`, replacing any item with the same key, and return the replaced item.
    ///
    /// Fails with [`Error::RemoteWrite`].
    async fn put_item(&self, table_name: &str, item: &Item) -> Result<Option<Item>>;

    /// Remove the item at `key` and return it; removing a missing item is not an error.
    ///
    /// Fails with [`Error::RemoteDelete`].
    async fn delete_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>>;
}

/// An empty attribute map means no item.
fn non_empty(item: Option<&Item>) -> Option<Item> {
    item.filter(|item| !item.is_empty()).cloned()
}

#[async_trait]
impl TableStore for Client {
    async fn describe_table(&self, table_name: &str) -> Result<TableSchema> {
        let lookup_error = |message: String| Error::RemoteLookup {
            table_name: table_name.to_string(),
            message,
        };
        let output = read::describe_table::DescribeTable {
            table_name: table_name.to_string(),
        }
        .send(self)
        .await
        .map_err(|error| lookup_error(DisplayErrorContext(&error).to_string()))?;
        let table = output
            .table()
            .ok_or_else(|| lookup_error("response carries no table description".to_string()))?;
        TableSchema::try_from(table).map_err(lookup_error)
    }

    async fn get_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>> {
        let output = read::get_item::GetItem {
            key: key.clone(),
            single_read_args: read::common::SingleReadArgs {
                consistent_read: Some(true),
                table_name: table_name.to_string(),
            },
        }
        .send(self)
        .await
        .map_err(|error| Error::RemoteRead {
            table_name: table_name.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })?;
        Ok(non_empty(output.item()))
    }

    async fn put_item(&self, table_name: &str, item: &Item) -> Result<Option<Item>> {
        let output = write::put_item::PutItem {
            item: item.clone(),
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::AllOld),
                table_name: table_name.to_string(),
            },
        }
        .send(self)
        .await
        .map_err(|error| Error::RemoteWrite {
            table_name: table_name.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })?;
        Ok(non_empty(output.attributes()))
    }

    async fn delete_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>> {
        let output = write::delete_item::DeleteItem {
            key: key.clone(),
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::AllOld),
                table_name: table_name.to_string(),
            },
        }
        .send(self)
        .await
        .map_err(|error| Error::RemoteDelete {
            table_name: table_name.to_string(),
            message: DisplayErrorContext(&error).to_string(),
        })?;
        Ok(non_empty(output.attributes()))
    }
}
