use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// Replaces any existing item with the same key in a single call.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::{AttributeValue, ReturnValue}};
/// use dynamodb_item::write;
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: HashMap::from([
///         ("id".to_string(), AttributeValue::S("1".to_string())),
///         ("name".to_string(), AttributeValue::S("John".to_string())),
///     ]),
///     write_args: write::common::WriteArgs {
///         return_values: Some(ReturnValue::AllOld),
///         table_name: "users".to_string(),
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem {
    /// The item to put into the table.
    pub item: common::item::Item,
    /// Additional write operation arguments (table name, return values).
    pub write_args: write::common::WriteArgs,
}

impl From<PutItem> for PutItemInput {
    fn from(put_item: PutItem) -> Self {
        Self {
            item: put_item.item,
            write_operation: put_item.write_args.into(),
        }
    }
}

impl PutItem {
    /// Execute the put item operation.
    #[tracing::instrument(
        name = "dynamodb_item.put_item",
        skip_all,
        fields(table_name = %self.write_args.table_name),
        err
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.into();
        let builder = client.put_item().set_item(Some(put_item.item));
        crate::apply_write_operation!(builder, put_item.write_operation)
            .send()
            .await
    }
}
