//! Conversion between plain JSON and Firestore's typed value encoding
//!
//! Firestore REST documents wrap every value in a single-key object naming
//! its type (`{"stringValue": "x"}`, `{"integerValue": "4"}`,
//! `{"mapValue": {"fields": {..}}}`, ...). Documents are converted to plain
//! JSON so they can go through the same serde models as the local backend.

use serde_json::{json, Map, Number, Value};

/// Encode a plain JSON value as a Firestore value
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode an object's entries as a Firestore `fields` map
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    let fields: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect();
    Value::Object(fields)
}

/// Decode a Firestore value into plain JSON
pub fn decode(value: &Value) -> Result<Value, String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("expected a typed value, got {}", value))?;
    let (kind, inner) = object
        .iter()
        .next()
        .ok_or_else(|| "empty typed value".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| format!("bad booleanValue: {}", inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| format!("bad integerValue: {}", inner))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            };
            parsed
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("bad doubleValue: {}", inner))
        }
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values,
                _ => return Ok(Value::Array(Vec::new())),
            };
            values.iter().map(decode).collect::<Result<Vec<_>, _>>().map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => decode_fields(fields),
            None => Ok(Value::Object(Map::new())),
        },
        other => Err(format!("unsupported value type: {}", other)),
    }
}

/// Decode a Firestore `fields` map into a plain JSON object
pub fn decode_fields(fields: &Value) -> Result<Value, String> {
    let map = fields
        .as_object()
        .ok_or_else(|| "document fields must be an object".to_string())?;
    let mut decoded = Map::new();
    for (key, value) in map {
        decoded.insert(key.clone(), decode(value)?);
    }
    Ok(Value::Object(decoded))
}

/// Last path segment of a document name, i.e. its id
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Plain JSON body of a Firestore document, with its id added under `"id"`
pub fn document_to_json(document: &Value) -> Result<Value, String> {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| "document has no name".to_string())?;
    let mut body = match document.get("fields") {
        Some(fields) => decode_fields(fields)?,
        None => Value::Object(Map::new()),
    };
    if let Value::Object(map) = &mut body {
        map.insert("id".to_string(), Value::String(document_id(name).to_string()));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars_and_containers() {
        assert_eq!(encode(&json!("x")), json!({ "stringValue": "x" }));
        assert_eq!(encode(&json!(4)), json!({ "integerValue": "4" }));
        assert_eq!(encode(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(encode(&json!(null)), json!({ "nullValue": null }));
        assert_eq!(
            encode(&json!([{ "title": "", "url": "https://x" }])),
            json!({ "arrayValue": { "values": [
                { "mapValue": { "fields": {
                    "title": { "stringValue": "" },
                    "url": { "stringValue": "https://x" }
                } } }
            ] } })
        );
    }

    #[test]
    fn test_decode_document() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/users/u1/modules/CM1005",
            "fields": {
                "level": { "integerValue": "4" },
                "name": { "stringValue": "CM1005 – Introduction to Programming I" },
                "files": { "arrayValue": {} },
                "links": { "arrayValue": { "values": [
                    { "mapValue": { "fields": { "title": { "stringValue": "Docs" }, "url": { "stringValue": "https://x" } } } }
                ] } },
                "score": { "doubleValue": 0.5 }
            }
        });

        let body = document_to_json(&document).unwrap();
        assert_eq!(body["id"], "CM1005");
        assert_eq!(body["level"], 4);
        assert_eq!(body["files"], json!([]));
        assert_eq!(body["links"][0]["url"], "https://x");
        assert_eq!(body["score"], 0.5);
    }

    #[test]
    fn test_round_trip_module_shape() {
        let module = serde_json::to_value(crate::catalog::default_modules().remove(0)).unwrap();
        let fields = encode_fields(module.as_object().unwrap());
        assert_eq!(decode_fields(&fields).unwrap(), module);
    }

    #[test]
    fn test_decode_rejects_unknown_types() {
        assert!(decode(&json!({ "mysteryValue": 1 })).is_err());
        assert!(decode(&json!("bare")).is_err());
        assert!(decode(&json!({ "integerValue": "four" })).is_err());
    }
}
