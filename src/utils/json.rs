use serde_json::Value;

/// A JSON field that distinguishes "absent" from an explicit `null`.
#[derive(Debug, PartialEq, Eq)]
pub enum NullableValue<T> {
    Omitted,
    Null,
    Value(T),
}

pub fn classify_nullable_string(
    optional_value: Option<&Value>,
) -> Result<NullableValue<String>, String> {
    match optional_value {
        None => Ok(NullableValue::Omitted),
        Some(Value::Null) => Ok(NullableValue::Null),
        Some(Value::String(s)) => Ok(NullableValue::Value(s.to_owned())),
        Some(other) => Err(format!("expected string or null, got {other}")),
    }
}

pub fn classify_nullable_id(optional_value: Option<&Value>) -> Result<NullableValue<i32>, String> {
    match optional_value {
        None => Ok(NullableValue::Omitted),
        Some(Value::Null) => Ok(NullableValue::Null),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .map(NullableValue::Value)
            .ok_or_else(|| format!("expected an integer id, got {n}")),
        Some(other) => Err(format!("expected integer or null, got {other}")),
    }
}
