//! Module arguments and their validation.
//!
//! [`ModuleArgs`] is what the orchestration engine hands over; [`Request`] is the validated,
//! parsed form the reconciler works on. Converting one into the other performs no I/O.

use crate::common::{item::Item, item::ItemFormat, key::Key};
use crate::config::ConnectionArgs;
use crate::error::ParameterError;

use serde::Deserialize;
use serde_json::Value;
use std::{fmt, str};

/// Desired state of the item.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// The item exists with exactly the given attributes.
    #[default]
    Present,
    /// No item exists at the given key.
    Absent,
}

impl str::FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!(
                "value of state must be one of: present, absent, got: {other}"
            )),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// Arguments as supplied by the orchestration engine.
///
/// `item` and `key` may be JSON-encoded strings or inline JSON objects.
///
/// ```rust
/// use dynamodb_item::params::{ModuleArgs, State};
///
/// let args: ModuleArgs = serde_json::from_str(
///     r#"{"table": "test-table", "item": "{\"key\": {\"S\": \"aaaaa\"}}", "_ansible_check_mode": true}"#,
/// )
/// .unwrap();
/// assert_eq!(args.state, State::Present);
/// assert!(args.check_mode);
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ModuleArgs {
    /// Desired state of the item.
    #[serde(default)]
    pub state: State,
    /// Name of the table.
    pub table: String,
    /// The item to put, required when `state` is `present`.
    #[serde(default)]
    pub item: Option<Value>,
    /// The key to delete, required when `state` is `absent`.
    #[serde(default)]
    pub key: Option<Value>,
    /// Encoding of `item`, `key`, and the reported items.
    #[serde(default)]
    pub format: ItemFormat,
    /// Report what would change without changing it.
    #[serde(default, rename = "_ansible_check_mode", alias = "check_mode")]
    pub check_mode: bool,
    /// Region, credentials, and endpoint.
    #[serde(flatten)]
    pub connection: ConnectionArgs,
}

/// The change the reconciler is asked to converge on.
#[derive(Clone, Debug, PartialEq)]
pub enum Desired {
    /// Put this item.
    Present(Item),
    /// Remove the item at this key.
    Absent(Key),
}

/// A validated reconciliation request.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// Name of the table.
    pub table_name: String,
    /// Desired state with its parsed payload.
    pub desired: Desired,
    /// Observe only, never write.
    pub dry_run: bool,
    /// Encoding of the reported items.
    pub format: ItemFormat,
}

impl Request {
    /// Validate the arguments and parse the payload the desired state needs.
    pub fn from_args(args: &ModuleArgs) -> Result<Self, ParameterError> {
        if args.table.trim().is_empty() {
            return Err(ParameterError::Empty { field: "table" });
        }
        let desired = match args.state {
            State::Present => {
                let item = args.item.as_ref().ok_or(ParameterError::Missing {
                    field: "item",
                    message: "To put an item, it must be specified",
                })?;
                Desired::Present(parse_payload("item", item, args.format)?)
            }
            State::Absent => {
                let key = args.key.as_ref().ok_or(ParameterError::Missing {
                    field: "key",
                    message: "To delete an item, its key must be specified",
                })?;
                Desired::Absent(Key::try_from(parse_payload("key", key, args.format)?)?)
            }
        };
        Ok(Self {
            table_name: args.table.clone(),
            desired,
            dry_run: args.check_mode,
            format: args.format,
        })
    }

    /// The desired state this request converges on.
    pub fn state(&self) -> State {
        match self.desired {
            Desired::Present(_) => State::Present,
            Desired::Absent(_) => State::Absent,
        }
    }
}

fn parse_payload(
    field: &'static str,
    value: &Value,
    format: ItemFormat,
) -> Result<Item, ParameterError> {
    let malformed = |reason: String| ParameterError::Malformed { field, reason };
    match value {
        Value::String(encoded) => {
            let decoded: Value =
                serde_json::from_str(encoded).map_err(|error| malformed(error.to_string()))?;
            format.parse(&decoded).map_err(malformed)
        }
        other => format.parse(other).map_err(malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types::AttributeValue;
    use rstest::rstest;
    use serde_json::json;

    fn args(value: Value) -> ModuleArgs {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case::present("present", Ok(State::Present))]
    #[case::absent("absent", Ok(State::Absent))]
    #[case::unknown(
        "gone",
        Err("value of state must be one of: present, absent, got: gone".to_string())
    )]
    fn test_state_from_str(#[case] input: &str, #[case] expected: Result<State, String>) {
        assert_eq!(input.parse::<State>(), expected);
    }

    #[test]
    fn test_module_args_defaults() {
        let actual = args(json!({"table": "a"}));
        assert_eq!(
            actual,
            ModuleArgs {
                table: "a".to_string(),
                ..Default::default()
            }
        );
    }

    #[rstest]
    #[case::encoded_item(
        json!({
            "table": "test-table",
            "item": "{\"key\": {\"S\": \"aaaaa\"}, \"value\": {\"S\": \"bbbb\"}}",
        }),
        Request {
            table_name: "test-table".to_string(),
            desired: Desired::Present(Item::from([
                ("key".to_string(), AttributeValue::S("aaaaa".to_string())),
                ("value".to_string(), AttributeValue::S("bbbb".to_string())),
            ])),
            dry_run: false,
            format: ItemFormat::Typed,
        }
    )]
    #[case::inline_plain_item_check_mode(
        json!({
            "table": "a",
            "item": {"key": "b", "count": 1},
            "format": "plain",
            "_ansible_check_mode": true,
        }),
        Request {
            table_name: "a".to_string(),
            desired: Desired::Present(Item::from([
                ("key".to_string(), AttributeValue::S("b".to_string())),
                ("count".to_string(), AttributeValue::N("1".to_string())),
            ])),
            dry_run: true,
            format: ItemFormat::Plain,
        }
    )]
    #[case::absent_key(
        json!({
            "state": "absent",
            "table": "a",
            "key": "{\"key\": {\"S\": \"b\"}}",
            "item": "not parsed when absent",
        }),
        Request {
            table_name: "a".to_string(),
            desired: Desired::Absent(
                Key::try_from(Item::from([(
                    "key".to_string(),
                    AttributeValue::S("b".to_string()),
                )]))
                .unwrap()
            ),
            dry_run: false,
            format: ItemFormat::Typed,
        }
    )]
    fn test_request_from_args(#[case] value: Value, #[case] expected: Request) {
        let actual = Request::from_args(&args(value)).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::empty_table(
        json!({"table": " ", "item": "{}"}),
        ParameterError::Empty { field: "table" }
    )]
    #[case::missing_item(
        json!({"table": "a"}),
        ParameterError::Missing {
            field: "item",
            message: "To put an item, it must be specified",
        }
    )]
    #[case::missing_key(
        json!({"table": "a", "state": "absent", "item": "{}"}),
        ParameterError::Missing {
            field: "key",
            message: "To delete an item, its key must be specified",
        }
    )]
    #[case::item_not_json(
        json!({"table": "a", "item": "{key"}),
        ParameterError::Malformed {
            field: "item",
            reason: "key must be a string at line 1 column 2".to_string(),
        }
    )]
    #[case::item_not_object(
        json!({"table": "a", "item": "[1]"}),
        ParameterError::Malformed {
            field: "item",
            reason: "expected a JSON object".to_string(),
        }
    )]
    #[case::item_untagged(
        json!({"table": "a", "item": "{\"key\": \"b\"}"}),
        ParameterError::Malformed {
            field: "item",
            reason: "`key` must be a type-tagged object such as {\"S\": \"...\"}".to_string(),
        }
    )]
    #[case::key_empty(
        json!({"table": "a", "state": "absent", "key": "{}"}),
        ParameterError::Empty { field: "key" }
    )]
    fn test_request_from_args_rejects(#[case] value: Value, #[case] expected: ParameterError) {
        let actual = Request::from_args(&args(value)).unwrap_err();
        assert_eq!(actual, expected);
    }
}
