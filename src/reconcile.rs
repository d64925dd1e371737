//! Reconciliation of one item against its desired state.
//!
//! Each request takes exactly one path:
//!
//! | state   | dry run | calls                                | changed when                        |
//! |---------|---------|--------------------------------------|-------------------------------------|
//! | present | yes     | describe table, get item             | target differs from the stored item |
//! | present | no      | put item                             | target differs from the replaced one|
//! | absent  | yes     | get item                             | an item is stored at the key        |
//! | absent  | no      | delete item                          | the delete removed an item          |
//!
//! A dry run never writes.

use crate::common::item::{Item, ItemFormat, items_equal};
use crate::common::key::Key;
use crate::error::Result;
use crate::params::{Desired, ModuleArgs, Request};
use crate::store::TableStore;

use serde_json::{Map, Value};

/// Outcome of one reconciliation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciliationResult {
    /// Whether the stored item differs (or would differ, on a dry run) from before.
    pub changed: bool,
    /// The item stored before, empty when there was none.
    pub old_item: Item,
    /// The target item; only for the present state.
    pub new_item: Option<Item>,
}

impl ReconciliationResult {
    /// Render the result record as JSON in `format`.
    ///
    /// ```rust
    /// use dynamodb_item::common::item::{Item, ItemFormat};
    /// use dynamodb_item::reconcile::ReconciliationResult;
    /// use serde_json::json;
    ///
    /// let result = ReconciliationResult {
    ///     changed: false,
    ///     old_item: Item::new(),
    ///     new_item: None,
    /// };
    /// assert_eq!(
    ///     result.render(ItemFormat::Typed),
    ///     json!({"changed": false, "old_item": {}}),
    /// );
    /// ```
    pub fn render(&self, format: ItemFormat) -> Value {
        let mut record = Map::new();
        record.insert("changed".to_string(), Value::Bool(self.changed));
        record.insert("old_item".to_string(), format.render(&self.old_item));
        if let Some(new_item) = &self.new_item {
            record.insert("new_item".to_string(), format.render(new_item));
        }
        Value::Object(record)
    }
}

/// Converge the item described by `request`, issuing at most one write.
#[tracing::instrument(
    name = "dynamodb_item.reconcile",
    skip_all,
    fields(table_name = %request.table_name, state = %request.state(), dry_run = request.dry_run),
    err
)]
pub async fn reconcile<S: TableStore + ?Sized>(
    store: &S,
    request: &Request,
) -> Result<ReconciliationResult> {
    let table_name = request.table_name.as_str();
    let result = match (&request.desired, request.dry_run) {
        (Desired::Present(item), true) => {
            let schema = store.describe_table(table_name).await?;
            let key = Key::project(item, &schema.hash_key)?;
            let observed = store.get_item(table_name, &key).await?;
            present(item, observed)
        }
        (Desired::Present(item), false) => {
            let replaced = store.put_item(table_name, item).await?;
            present(item, replaced)
        }
        (Desired::Absent(key), true) => absent(store.get_item(table_name, key).await?),
        (Desired::Absent(key), false) => absent(store.delete_item(table_name, key).await?),
    };
    tracing::debug!(changed = result.changed, "reconciled item");
    Ok(result)
}

/// Validate `args`, then reconcile. Invalid arguments fail before any store call.
pub async fn run<S: TableStore + ?Sized>(store: &S, args: &ModuleArgs) -> Result<ReconciliationResult> {
    let request = Request::from_args(args)?;
    reconcile(store, &request).await
}

fn present(target: &Item, previous: Option<Item>) -> ReconciliationResult {
    let old_item = previous.unwrap_or_default();
    ReconciliationResult {
        changed: old_item.is_empty() || !items_equal(target, &old_item),
        old_item,
        new_item: Some(target.clone()),
    }
}

fn absent(previous: Option<Item>) -> ReconciliationResult {
    let old_item = previous.unwrap_or_default();
    ReconciliationResult {
        changed: !old_item.is_empty(),
        old_item,
        new_item: None,
    }
}
