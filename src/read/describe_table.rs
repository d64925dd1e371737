use aws_sdk_dynamodb::{Client, error, operation, types};

/// Read-only facts about a table needed to address its items.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableSchema {
    /// Name of the partition (`HASH`) key attribute.
    pub hash_key: String,
}

impl TableSchema {
    /// Schema of a table keyed by `hash_key`.
    pub fn new(hash_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
        }
    }

    /// Derive the schema from a table's key schema elements.
    ///
    /// The first element classified `HASH` wins; `None` when there is none.
    pub fn from_key_schema(key_schema: &[types::KeySchemaElement]) -> Option<Self> {
        key_schema
            .iter()
            .find(|element| *element.key_type() == types::KeyType::Hash)
            .map(|element| Self::new(element.attribute_name()))
    }
}

impl TryFrom<&types::TableDescription> for TableSchema {
    type Error = String;

    fn try_from(table: &types::TableDescription) -> Result<Self, Self::Error> {
        Self::from_key_schema(table.key_schema()).ok_or_else(|| {
            format!(
                "table `{}` declares no HASH key attribute",
                table.table_name().unwrap_or_default()
            )
        })
    }
}

/// Describe table operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_item::read;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let describe_table = read::describe_table::DescribeTable {
///     table_name: "users".to_string(),
/// };
/// describe_table.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DescribeTable {
    /// The name of the table to describe.
    pub table_name: String,
}

impl DescribeTable {
    /// Execute the describe table operation.
    #[tracing::instrument(
        name = "dynamodb_item.describe_table",
        skip_all,
        fields(table_name = %self.table_name),
        err
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::describe_table::DescribeTableOutput,
        error::SdkError<operation::describe_table::DescribeTableError>,
    > {
        client
            .describe_table()
            .table_name(self.table_name)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn element(name: &str, key_type: types::KeyType) -> types::KeySchemaElement {
        types::KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    #[rstest]
    #[case::hash_only(
        vec![
            element("a", types::KeyType::Hash),
        ],
        Some(TableSchema::new("a"))
    )]
    #[case::range_first(
        vec![
            element("b", types::KeyType::Range),
            element("a", types::KeyType::Hash),
        ],
        Some(TableSchema::new("a"))
    )]
    #[case::first_hash_wins(
        vec![
            element("a", types::KeyType::Hash),
            element("c", types::KeyType::Hash),
        ],
        Some(TableSchema::new("a"))
    )]
    #[case::no_hash(
        vec![
            element("b", types::KeyType::Range),
        ],
        None
    )]
    #[case::empty(vec![], None)]
    fn test_from_key_schema(
        #[case] key_schema: Vec<types::KeySchemaElement>,
        #[case] expected: Option<TableSchema>,
    ) {
        assert_eq!(TableSchema::from_key_schema(&key_schema), expected);
    }

    #[test]
    fn test_try_from_table_description() {
        let table = types::TableDescription::builder()
            .table_name("test-table")
            .key_schema(element("key", types::KeyType::Hash))
            .build();
        assert_eq!(TableSchema::try_from(&table), Ok(TableSchema::new("key")));

        let table = types::TableDescription::builder()
            .table_name("test-table")
            .build();
        assert_eq!(
            TableSchema::try_from(&table),
            Err("table `test-table` declares no HASH key attribute".to_string())
        );
    }
}
