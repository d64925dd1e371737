use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct GetItemInput {
    key: collections::HashMap<String, types::AttributeValue>,
    single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types::AttributeValue};
/// use dynamodb_item::{common, read};
/// use std::collections::HashMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let key = HashMap::from([("id".to_string(), AttributeValue::S("1".to_string()))]);
/// let get_item = read::get_item::GetItem {
///     key: common::key::Key::try_from(key)?,
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem {
    /// The primary key of the item to retrieve.
    pub key: common::key::Key,
    /// Additional read operation arguments (table name, consistent read).
    pub single_read_args: read::common::SingleReadArgs,
}

impl From<GetItem> for GetItemInput {
    fn from(get_item: GetItem) -> Self {
        Self {
            key: get_item.key.into(),
            single_read_operation: get_item.single_read_args.into(),
        }
    }
}

impl GetItem {
    /// Execute the get item operation.
    #[tracing::instrument(
        name = "dynamodb_item.get_item",
        skip_all,
        fields(table_name = %self.single_read_args.table_name),
        err
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: GetItemInput = self.into();
        let builder = client.get_item().set_key(Some(get_item.key));
        crate::apply_single_read_operation!(builder, get_item.single_read_operation)
            .send()
            .await
    }
}
