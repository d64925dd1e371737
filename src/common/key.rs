use crate::common::item::Item;
use crate::error::ParameterError;

use aws_sdk_dynamodb::types;
use std::collections;

/// Primary key of an item: only the key attributes, enough to address exactly one item.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_item::common::key::Key;
/// use std::collections::HashMap;
///
/// let item = HashMap::from([
///     ("id".to_string(), AttributeValue::S("1".to_string())),
///     ("name".to_string(), AttributeValue::S("John".to_string())),
/// ]);
/// let key = Key::project(&item, "id").unwrap();
/// assert_eq!(key.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key(collections::HashMap<String, types::AttributeValue>);

impl Key {
    /// Project an item onto its hash-key attribute.
    pub fn project(item: &Item, hash_key: &str) -> Result<Self, ParameterError> {
        let value = item
            .get(hash_key)
            .ok_or_else(|| ParameterError::MissingHashKey {
                hash_key: hash_key.to_string(),
            })?;
        Ok(Self(collections::HashMap::from([(
            hash_key.to_string(),
            value.clone(),
        )])))
    }

    /// Number of key attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `item` is the one this key addresses.
    pub fn matches(&self, item: &Item) -> bool {
        self.0
            .iter()
            .all(|(name, value)| item.get(name) == Some(value))
    }

    /// The key attributes.
    pub fn attributes(&self) -> &collections::HashMap<String, types::AttributeValue> {
        &self.0
    }
}

impl TryFrom<Item> for Key {
    type Error = ParameterError;

    fn try_from(attributes: Item) -> Result<Self, Self::Error> {
        if attributes.is_empty() {
            return Err(ParameterError::Empty { field: "key" });
        }
        Ok(Self(attributes))
    }
}

impl From<Key> for collections::HashMap<String, types::AttributeValue> {
    fn from(key: Key) -> Self {
        key.0
    }
}
