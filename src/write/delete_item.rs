use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    key: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// Deleting a key with no item behind it succeeds and changes nothing.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::{AttributeValue, ReturnValue}};
/// use dynamodb_item::{common, write};
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let key = HashMap::from([("id".to_string(), AttributeValue::S("1".to_string()))]);
/// let delete_item = write::delete_item::DeleteItem {
///     key: common::key::Key::try_from(key)?,
///     write_args: write::common::WriteArgs {
///         return_values: Some(ReturnValue::AllOld),
///         table_name: "users".to_string(),
///     },
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct DeleteItem {
    /// The primary key of the item to delete.
    pub key: common::key::Key,
    /// Additional write operation arguments (table name, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<DeleteItem> for DeleteItemInput {
    fn from(delete_item: DeleteItem) -> Self {
        Self {
            key: delete_item.key.into(),
            write_operation: delete_item.write_args.into(),
        }
    }
}

impl DeleteItem {
    /// Execute the delete item operation.
    #[tracing::instrument(
        name = "dynamodb_item.delete_item",
        skip_all,
        fields(table_name = %self.write_args.table_name),
        err
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: DeleteItemInput = self.into();
        let builder = client.delete_item().set_key(Some(delete_item.key));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}
