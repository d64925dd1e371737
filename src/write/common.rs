use aws_sdk_dynamodb::types;

/// Internal representation of write operation parameters.
///
/// This is an internal type that holds the processed write operation parameters
/// after conversion from the public `WriteArgs` type.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

/// Arguments common to write operations (Put, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Which item attributes to return in the response.
    ///
    /// Put and Delete only accept `AllOld` or `None`; `AllOld` returns the item
    /// as it was before the write.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl From<WriteArgs> for WriteInput {
    fn from(write_args: WriteArgs) -> Self {
        Self {
            return_values: write_args.return_values,
            table_name: write_args.table_name,
        }
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}
