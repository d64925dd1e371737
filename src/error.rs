//! Error taxonomy.
//!
//! Parameter and configuration errors are raised before any remote call.
//! Remote errors carry the service message verbatim; nothing is retried here.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid or missing input supplied by the caller.
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    /// A parameter required by the desired state was not supplied.
    #[error("{message}")]
    Missing {
        /// The parameter name.
        field: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A parameter was supplied but empty.
    #[error("parameter `{field}` must not be empty")]
    Empty {
        /// The parameter name.
        field: &'static str,
    },

    /// A structured-data parameter could not be parsed.
    #[error("parameter `{field}` is malformed: {reason}")]
    Malformed {
        /// The parameter name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The item does not carry the table's hash-key attribute.
    #[error("parameter `item` does not contain the hash key attribute `{hash_key}`")]
    MissingHashKey {
        /// The hash-key attribute name of the table.
        hash_key: String,
    },
}

impl ParameterError {
    /// The name of the offending parameter.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field, .. } | Self::Empty { field } | Self::Malformed { field, .. } => {
                field
            }
            Self::MissingHashKey { .. } => "item",
        }
    }
}

/// Errors that can occur while reconciling an item.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied invalid or missing input.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Region or credentials could not be resolved.
    #[error("{0}")]
    Configuration(String),

    /// Describing the table failed.
    #[error("failed to describe table `{table_name}`: {message}")]
    RemoteLookup {
        /// The table being described.
        table_name: String,
        /// The message reported by the service or transport.
        message: String,
    },

    /// Reading the item failed.
    #[error("failed to get item from table `{table_name}`: {message}")]
    RemoteRead {
        /// The table being read.
        table_name: String,
        /// The message reported by the service or transport.
        message: String,
    },

    /// Writing the item failed.
    #[error("failed to put item into table `{table_name}`: {message}")]
    RemoteWrite {
        /// The table being written.
        table_name: String,
        /// The message reported by the service or transport.
        message: String,
    },

    /// Deleting the item failed.
    #[error("failed to delete item from table `{table_name}`: {message}")]
    RemoteDelete {
        /// The table being written.
        table_name: String,
        /// The message reported by the service or transport.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::missing(
        ParameterError::Missing {
            field: "item",
            message: "To put an item, it must be specified",
        },
        "item",
        "To put an item, it must be specified"
    )]
    #[case::empty(
        ParameterError::Empty {
            field: "table",
        },
        "table",
        "parameter `table` must not be empty"
    )]
    #[case::malformed(
        ParameterError::Malformed {
            field: "key",
            reason: "expected value at line 1 column 1".to_string(),
        },
        "key",
        "parameter `key` is malformed: expected value at line 1 column 1"
    )]
    #[case::missing_hash_key(
        ParameterError::MissingHashKey {
            hash_key: "id".to_string(),
        },
        "item",
        "parameter `item` does not contain the hash key attribute `id`"
    )]
    fn test_parameter_error(
        #[case] error: ParameterError,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        assert_eq!(error.field(), field);
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn test_remote_error_display() {
        let error = Error::RemoteWrite {
            table_name: "a".to_string(),
            message: "ResourceNotFoundException: Requested resource not found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed to put item into table `a`: ResourceNotFoundException: Requested resource not found"
        );
    }
}
