/// Internal representation of single-item read parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) table_name: String,
}

/// Arguments for single-item read operations (GetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    /// A strongly consistent read reflects every write acknowledged before it.
    pub consistent_read: Option<bool>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        Self {
            consistent_read: single_read_args.consistent_read,
            table_name: single_read_args.table_name,
        }
    }
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .table_name($single_read_operation.table_name)
    };
}
