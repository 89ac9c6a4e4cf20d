//! Lossy conversion between script values and JSON.
//!
//! Chart introspection speaks JSON, scripts speak `rhai::Dynamic`. Values
//! JSON cannot hold (host objects, function pointers, NaN) become `null`.

use rhai::{Array, Dynamic, Map as ScriptMap};
use serde_json::{Map, Number, Value};

#[must_use]
pub fn dynamic_to_json(value: &Dynamic) -> Value {
    if value.is_unit() {
        return Value::Null;
    }
    if let Ok(flag) = value.as_bool() {
        return Value::Bool(flag);
    }
    if let Ok(number) = value.as_int() {
        return Value::Number(Number::from(number));
    }
    if let Ok(number) = value.as_float() {
        return Number::from_f64(number).map_or(Value::Null, Value::Number);
    }
    if let Ok(character) = value.as_char() {
        return Value::String(character.to_string());
    }
    if value.is_string() {
        return Value::String(value.to_string());
    }
    if let Some(items) = value.read_lock::<Array>() {
        return Value::Array(items.iter().map(dynamic_to_json).collect());
    }
    if let Some(map) = value.read_lock::<ScriptMap>() {
        return Value::Object(map_to_json(&map));
    }
    Value::Null
}

#[must_use]
pub fn map_to_json(map: &ScriptMap) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.to_string(), dynamic_to_json(value)))
        .collect()
}

#[must_use]
pub fn json_to_dynamic(value: &Value) -> Dynamic {
    match value {
        Value::Null => Dynamic::UNIT,
        Value::Bool(flag) => Dynamic::from(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Dynamic::from(integer),
            None => Dynamic::from(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => Dynamic::from(text.clone()),
        Value::Array(items) => Dynamic::from_array(items.iter().map(json_to_dynamic).collect()),
        Value::Object(map) => Dynamic::from_map(
            map.iter()
                .map(|(key, value)| (key.as_str().into(), json_to_dynamic(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use rhai::{Dynamic, Engine};
    use serde_json::json;

    use super::{dynamic_to_json, json_to_dynamic};

    #[test]
    fn script_literals_become_json() {
        let engine = Engine::new();
        let value: Dynamic = engine
            .eval(r#"[#{ genre: "Sports", sold: 275, share: 0.5, hot: true, note: () }]"#)
            .expect("eval");
        assert_eq!(
            dynamic_to_json(&value),
            json!([{ "genre": "Sports", "sold": 275, "share": 0.5, "hot": true, "note": null }])
        );
    }

    #[test]
    fn json_survives_a_trip_through_script_values() {
        let original = json!({ "title": { "title": "Sales" }, "data": [{ "a": 1 }, { "a": 2.5 }] });
        assert_eq!(dynamic_to_json(&json_to_dynamic(&original)), original);
    }

    #[test]
    fn nan_and_host_values_become_null() {
        assert_eq!(dynamic_to_json(&Dynamic::from(f64::NAN)), json!(null));
        assert_eq!(dynamic_to_json(&Dynamic::from(std::time::Duration::ZERO)), json!(null));
    }
}
