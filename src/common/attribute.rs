use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use std::collections;

/// Parse one type-tagged JSON value (`{"S": "a"}`, `{"N": "1"}`, ...) into an attribute value.
///
/// `path` is the attribute path used in error messages.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_item::common::attribute;
/// use serde_json::json;
///
/// let value = attribute::from_tagged_json("value", &json!({"S": "bbbb"})).unwrap();
/// assert_eq!(value, AttributeValue::S("bbbb".to_string()));
/// ```
pub fn from_tagged_json(path: &str, value: &Value) -> Result<AttributeValue, String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("`{path}` must be a type-tagged object such as {{\"S\": \"...\"}}"))?;
    let mut entries = object.iter();
    let (tag, inner) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(format!(
                "`{path}` must contain exactly one type tag, found {}",
                object.len()
            ));
        }
    };
    let attribute = match tag.as_str() {
        "S" => AttributeValue::S(as_str(path, tag, inner)?.to_string()),
        "N" => AttributeValue::N(as_str(path, tag, inner)?.to_string()),
        "B" => AttributeValue::B(decode_blob(path, inner)?),
        "BOOL" => AttributeValue::Bool(
            inner
                .as_bool()
                .ok_or_else(|| format!("`{path}` tag `BOOL` expects a boolean"))?,
        ),
        "NULL" => match inner {
            Value::Bool(true) => AttributeValue::Null(true),
            _ => return Err(format!("`{path}` tag `NULL` expects `true`")),
        },
        "M" => {
            let map = inner
                .as_object()
                .ok_or_else(|| format!("`{path}` tag `M` expects an object"))?;
            AttributeValue::M(map_from_tagged_json(path, map)?)
        }
        "L" => {
            let list = as_array(path, tag, inner)?;
            let mut values = Vec::with_capacity(list.len());
            for (index, element) in list.iter().enumerate() {
                values.push(from_tagged_json(&format!("{path}[{index}]"), element)?);
            }
            AttributeValue::L(values)
        }
        "SS" => AttributeValue::Ss(string_set(path, tag, inner)?),
        "NS" => AttributeValue::Ns(string_set(path, tag, inner)?),
        "BS" => {
            let list = as_array(path, tag, inner)?;
            let mut blobs = Vec::with_capacity(list.len());
            for element in list {
                blobs.push(decode_blob(path, element)?);
            }
            AttributeValue::Bs(blobs)
        }
        other => return Err(format!("`{path}` has unknown type tag `{other}`")),
    };
    Ok(attribute)
}

/// Parse a JSON object of type-tagged values into an attribute map.
pub fn map_from_tagged_json(
    path: &str,
    object: &Map<String, Value>,
) -> Result<collections::HashMap<String, AttributeValue>, String> {
    let mut attributes = collections::HashMap::with_capacity(object.len());
    for (name, value) in object {
        let nested = if path.is_empty() {
            name.clone()
        } else {
            format!("{path}.{name}")
        };
        attributes.insert(name.clone(), from_tagged_json(&nested, value)?);
    }
    Ok(attributes)
}

/// Render an attribute value in its type-tagged JSON form.
pub fn to_tagged_json(value: &AttributeValue) -> Value {
    let (tag, inner) = match value {
        AttributeValue::S(s) => ("S", Value::String(s.clone())),
        AttributeValue::N(n) => ("N", Value::String(n.clone())),
        AttributeValue::B(blob) => ("B", Value::String(STANDARD.encode(blob.as_ref()))),
        AttributeValue::Bool(b) => ("BOOL", Value::Bool(*b)),
        AttributeValue::Null(null) => ("NULL", Value::Bool(*null)),
        AttributeValue::M(map) => ("M", Value::Object(map_to_tagged_json(map))),
        AttributeValue::L(list) => ("L", Value::Array(list.iter().map(to_tagged_json).collect())),
        AttributeValue::Ss(set) => ("SS", strings(set)),
        AttributeValue::Ns(set) => ("NS", strings(set)),
        AttributeValue::Bs(set) => (
            "BS",
            Value::Array(
                set.iter()
                    .map(|blob| Value::String(STANDARD.encode(blob.as_ref())))
                    .collect(),
            ),
        ),
        _ => return Value::Null,
    };
    Value::Object(Map::from_iter([(tag.to_string(), inner)]))
}

/// Render an attribute map in its type-tagged JSON form.
pub fn map_to_tagged_json(map: &collections::HashMap<String, AttributeValue>) -> Map<String, Value> {
    map.iter()
        .map(|(name, value)| (name.clone(), to_tagged_json(value)))
        .collect()
}

fn as_str<'a>(path: &str, tag: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("`{path}` tag `{tag}` expects a string"))
}

fn as_array<'a>(path: &str, tag: &str, value: &'a Value) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("`{path}` tag `{tag}` expects an array"))
}

fn string_set(path: &str, tag: &str, value: &Value) -> Result<Vec<String>, String> {
    as_array(path, tag, value)?
        .iter()
        .map(|element| as_str(path, tag, element).map(str::to_string))
        .collect()
}

fn decode_blob(path: &str, value: &Value) -> Result<Blob, String> {
    let encoded = value
        .as_str()
        .ok_or_else(|| format!("`{path}` binary values must be base64 strings"))?;
    STANDARD
        .decode(encoded)
        .map(Blob::new)
        .map_err(|error| format!("`{path}` is not valid base64: {error}"))
}

fn strings(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}
