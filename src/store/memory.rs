use crate::common::{item::Item, key::Key};
use crate::error::{Error, Result};
use crate::read::describe_table::TableSchema;
use crate::store::TableStore;

use async_trait::async_trait;
use std::collections;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::RwLock;

const TABLE_NOT_FOUND: &str = "ResourceNotFoundException: Requested resource not found";
const KEY_MISMATCH: &str =
    "ValidationException: The provided key element does not match the schema";

#[derive(Clone, Debug)]
struct MemoryTable {
    schema: TableSchema,
    items: Arc<RwLock<Vec<Item>>>,
}

impl MemoryTable {
    /// A key addresses an item only when it holds exactly the hash-key attribute.
    fn check_key(&self, key: &Key) -> std::result::Result<(), String> {
        if key.len() == 1 && key.attributes().contains_key(&self.schema.hash_key) {
            Ok(())
        } else {
            Err(KEY_MISMATCH.to_string())
        }
    }
}

/// Number of calls made to each operation of a [`MemoryStore`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallCounts {
    /// `describe_table` calls.
    pub describe_table: usize,
    /// `get_item` calls.
    pub get_item: usize,
    /// `put_item` calls.
    pub put_item: usize,
    /// `delete_item` calls.
    pub delete_item: usize,
}

impl CallCounts {
    /// Calls across all operations.
    pub fn total(&self) -> usize {
        self.describe_table + self.get_item + self.put_item + self.delete_item
    }

    /// Calls that could have mutated the store.
    pub fn writes(&self) -> usize {
        self.put_item + self.delete_item
    }
}

#[derive(Debug, Default)]
struct Counters {
    describe_table: AtomicUsize,
    get_item: AtomicUsize,
    put_item: AtomicUsize,
    delete_item: AtomicUsize,
}

/// In-memory table store.
///
/// Tables are created up front with [`MemoryStore::with_table`]; operations on any other
/// table fail the way the service does for a missing table. Every call is counted.
/// Clones share the items and counters of the tables that existed when they were made.
///
/// ```rust
/// use dynamodb_item::store::memory::MemoryStore;
///
/// let store = MemoryStore::new().with_table("users", "id");
/// assert_eq!(store.calls().total(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<collections::HashMap<String, MemoryTable>>,
    counters: Arc<Counters>,
}

impl MemoryStore {
    /// Creates an empty store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty table keyed by `hash_key`.
    pub fn with_table(
        mut self,
        table_name: impl Into<String>,
        hash_key: impl Into<String>,
    ) -> Self {
        let table = MemoryTable {
            schema: TableSchema::new(hash_key),
            items: Arc::default(),
        };
        Arc::make_mut(&mut self.tables).insert(table_name.into(), table);
        self
    }

    fn table(&self, table_name: &str) -> std::result::Result<&MemoryTable, String> {
        self.tables
            .get(table_name)
            .ok_or_else(|| TABLE_NOT_FOUND.to_string())
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            describe_table: self.counters.describe_table.load(Ordering::SeqCst),
            get_item: self.counters.get_item.load(Ordering::SeqCst),
            put_item: self.counters.put_item.load(Ordering::SeqCst),
            delete_item: self.counters.delete_item.load(Ordering::SeqCst),
        }
    }

    /// All items of a table without counting a call, `None` for an unknown table.
    pub async fn items(&self, table_name: &str) -> Option<Vec<Item>> {
        let table = self.tables.get(table_name)?;
        Some(table.items.read().await.clone())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn describe_table(&self, table_name: &str) -> Result<TableSchema> {
        self.counters.describe_table.fetch_add(1, Ordering::SeqCst);
        let table = self.table(table_name).map_err(|message| Error::RemoteLookup {
            table_name: table_name.to_string(),
            message,
        })?;
        Ok(table.schema.clone())
    }

    async fn get_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>> {
        self.counters.get_item.fetch_add(1, Ordering::SeqCst);
        let table = self
            .table(table_name)
            .and_then(|table| table.check_key(key).map(|_| table))
            .map_err(|message| Error::RemoteRead {
                table_name: table_name.to_string(),
                message,
            })?;
        let items = table.items.read().await;
        Ok(items.iter().find(|item| key.matches(item)).cloned())
    }

    async fn put_item(&self, table_name: &str, item: &Item) -> Result<Option<Item>> {
        self.counters.put_item.fetch_add(1, Ordering::SeqCst);
        let write_error = |message: String| Error::RemoteWrite {
            table_name: table_name.to_string(),
            message,
        };
        let table = self.table(table_name).map_err(write_error)?;
        let key = Key::project(item, &table.schema.hash_key).map_err(|_| {
            write_error(format!(
                "ValidationException: One of the required keys was not given a value: {}",
                table.schema.hash_key
            ))
        })?;
        let mut items = table.items.write().await;
        match items.iter_mut().find(|stored| key.matches(stored)) {
            Some(stored) => Ok(Some(std::mem::replace(stored, item.clone()))),
            None => {
                items.push(item.clone());
                Ok(None)
            }
        }
    }

    async fn delete_item(&self, table_name: &str, key: &Key) -> Result<Option<Item>> {
        self.counters.delete_item.fetch_add(1, Ordering::SeqCst);
        let table = self
            .table(table_name)
            .and_then(|table| table.check_key(key).map(|_| table))
            .map_err(|message| Error::RemoteDelete {
                table_name: table_name.to_string(),
                message,
            })?;
        let mut items = table.items.write().await;
        let position = items.iter().position(|item| key.matches(item));
        Ok(position.map(|position| items.remove(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types::AttributeValue;

    fn item(key: &str, value: &str) -> Item {
        Item::from([
            ("key".to_string(), AttributeValue::S(key.to_string())),
            ("value".to_string(), AttributeValue::S(value.to_string())),
        ])
    }

    fn key(key: &str) -> Key {
        Key::try_from(Item::from([(
            "key".to_string(),
            AttributeValue::S(key.to_string()),
        )]))
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new().with_table("a", "key");

        assert_eq!(store.put_item("a", &item("b", "c")).await.unwrap(), None);
        assert_eq!(
            store.put_item("a", &item("b", "d")).await.unwrap(),
            Some(item("b", "c"))
        );
        assert_eq!(
            store.get_item("a", &key("b")).await.unwrap(),
            Some(item("b", "d"))
        );
        assert_eq!(
            store.delete_item("a", &key("b")).await.unwrap(),
            Some(item("b", "d"))
        );
        assert_eq!(store.delete_item("a", &key("b")).await.unwrap(), None);
        assert_eq!(store.get_item("a", &key("b")).await.unwrap(), None);
        assert_eq!(store.items("a").await, Some(vec![]));
        assert_eq!(
            store.calls(),
            CallCounts {
                describe_table: 0,
                get_item: 2,
                put_item: 2,
                delete_item: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_describe_table() {
        let store = MemoryStore::new().with_table("a", "key");
        assert_eq!(
            store.describe_table("a").await.unwrap(),
            TableSchema::new("key")
        );
        let error = store.describe_table("b").await.unwrap_err();
        assert!(matches!(error, Error::RemoteLookup { table_name, .. } if table_name == "b"));
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_item("a", &key("b")).await.unwrap_err(),
            Error::RemoteRead { .. }
        ));
        assert!(matches!(
            store.put_item("a", &item("b", "c")).await.unwrap_err(),
            Error::RemoteWrite { .. }
        ));
        assert!(matches!(
            store.delete_item("a", &key("b")).await.unwrap_err(),
            Error::RemoteDelete { .. }
        ));
        assert_eq!(store.calls().total(), 3);
        assert_eq!(store.calls().writes(), 2);
    }

    #[tokio::test]
    async fn test_put_item_without_hash_key() {
        let store = MemoryStore::new().with_table("a", "id");
        let error = store.put_item("a", &item("b", "c")).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "failed to put item into table `a`: ValidationException: One of the required keys was not given a value: id"
        );
    }

    #[tokio::test]
    async fn test_key_must_match_schema() {
        let store = MemoryStore::new().with_table("a", "key");
        store.put_item("a", &item("b", "c")).await.unwrap();

        let wrong_name = Key::try_from(Item::from([(
            "id".to_string(),
            AttributeValue::S("b".to_string()),
        )]))
        .unwrap();
        let extra_attribute = Key::try_from(item("b", "c")).unwrap();

        for key in [wrong_name, extra_attribute] {
            let error = store.get_item("a", &key).await.unwrap_err();
            assert_eq!(
                error.to_string(),
                format!("failed to get item from table `a`: {KEY_MISMATCH}")
            );
            let error = store.delete_item("a", &key).await.unwrap_err();
            assert!(matches!(
                error,
                Error::RemoteDelete { ref message, .. } if message == KEY_MISMATCH
            ));
        }
        assert_eq!(store.items("a").await, Some(vec![item("b", "c")]));
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = MemoryStore::new().with_table("a", "key");
        let clone = store.clone();
        clone.put_item("a", &item("b", "c")).await.unwrap();
        assert_eq!(store.items("a").await, Some(vec![item("b", "c")]));
        assert_eq!(store.calls().put_item, 1);

        let extended = store.with_table("d", "key");
        assert!(clone.items("d").await.is_none());
        assert_eq!(extended.items("a").await, Some(vec![item("b", "c")]));
    }
}
