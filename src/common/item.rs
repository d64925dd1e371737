use crate::common::attribute;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::Deserialize;
use serde_json::Value;
use std::{collections, str};

/// A single record: attribute name to typed value.
pub type Item = collections::HashMap<String, AttributeValue>;

/// JSON encoding used for item and key payloads, both on input and output.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ItemFormat {
    /// Type-tagged form, e.g. `{"id": {"S": "a"}}`.
    #[default]
    Typed,
    /// Plain JSON, e.g. `{"id": "a"}`, mapped through `serde_dynamo`.
    Plain,
}

impl str::FromStr for ItemFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typed" => Ok(Self::Typed),
            "plain" => Ok(Self::Plain),
            other => Err(format!(
                "unknown item format `{other}`, expected `typed` or `plain`"
            )),
        }
    }
}

impl ItemFormat {
    /// Parse a JSON object into an attribute map.
    pub fn parse(self, value: &Value) -> Result<Item, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "expected a JSON object".to_string())?;
        match self {
            Self::Typed => attribute::map_from_tagged_json("", object),
            Self::Plain => serde_dynamo::to_item(object).map_err(|error| error.to_string()),
        }
    }

    /// Render an attribute map as a JSON object.
    ///
    /// An item with no plain JSON form (binary values) is rendered type-tagged as a whole.
    pub fn render(self, item: &Item) -> Value {
        match self {
            Self::Typed => Value::Object(attribute::map_to_tagged_json(item)),
            Self::Plain => match serde_dynamo::from_item(item.clone()) {
                Ok(value) => value,
                Err(error) => {
                    tracing::warn!(%error, "item has no plain JSON form, rendering it type-tagged");
                    Value::Object(attribute::map_to_tagged_json(item))
                }
            },
        }
    }
}

/// Compare two items attribute by attribute.
///
/// Set-typed values (`SS`, `NS`, `BS`) are compared without regard to element order,
/// at any nesting depth.
pub fn items_equal(left: &Item, right: &Item) -> bool {
    left.len() == right.len()
        && left.iter().all(|(name, value)| {
            right
                .get(name)
                .is_some_and(|other| values_equal(value, other))
        })
}

fn values_equal(left: &AttributeValue, right: &AttributeValue) -> bool {
    match (left, right) {
        (AttributeValue::M(left), AttributeValue::M(right)) => items_equal(left, right),
        (AttributeValue::L(left), AttributeValue::L(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| values_equal(left, right))
        }
        (AttributeValue::Ss(left), AttributeValue::Ss(right))
        | (AttributeValue::Ns(left), AttributeValue::Ns(right)) => sorted(left) == sorted(right),
        (AttributeValue::Bs(left), AttributeValue::Bs(right)) => {
            let left: Vec<&[u8]> = left.iter().map(AsRef::as_ref).collect();
            let right: Vec<&[u8]> = right.iter().map(AsRef::as_ref).collect();
            sorted(&left) == sorted(&right)
        }
        _ => left == right,
    }
}

fn sorted<T: Clone + Ord>(values: &[T]) -> Vec<T> {
    let mut values = values.to_vec();
    values.sort();
    values
}
