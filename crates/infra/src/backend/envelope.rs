//! Response envelopes.
//!
//! The backend answers lists either as a bare array or as
//! `{ "message": ..., "data": [...] }`, and single objects bare or under
//! `data`. Both shapes are accepted here and nowhere else.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
pub enum Envelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default)]
        data: Option<Vec<T>>,
    },
}

impl<T> Envelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Envelope::Bare(items) => items,
            Envelope::Wrapped { data, .. } => data.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Single<T> {
    pub fn into_inner(self) -> T {
        match self {
            Single::Wrapped { data } => data,
            Single::Bare(item) => item,
        }
    }
}

/// Error text of an upstream rejection. Array messages (validation pipes) are
/// joined with `", "`.
pub fn upstream_message(body: &Value) -> Option<String> {
    let field = body.get("message").or_else(|| body.get("error"))?;
    match field {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_shapes() {
        let bare: Envelope<i64> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let wrapped: Envelope<i64> = serde_json::from_value(json!({"message": "ok", "data": [3]})).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);

        let null_data: Envelope<i64> = serde_json::from_value(json!({"message": "vacío", "data": null})).unwrap();
        assert!(null_data.into_vec().is_empty());
    }

    #[test]
    fn single_shapes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Named {
            name: String,
        }
        let wrapped: Single<Named> = serde_json::from_value(json!({"data": {"name": "a"}})).unwrap();
        assert_eq!(wrapped.into_inner().name, "a");
        let bare: Single<Named> = serde_json::from_value(json!({"name": "b"})).unwrap();
        assert_eq!(bare.into_inner().name, "b");
    }

    #[test]
    fn messages_are_verbatim_or_joined() {
        assert_eq!(
            upstream_message(&json!({"message": "El abono excede la deuda"})).as_deref(),
            Some("El abono excede la deuda")
        );
        assert_eq!(
            upstream_message(&json!({"message": ["price must be positive", "name too short"]})).as_deref(),
            Some("price must be positive, name too short")
        );
        assert_eq!(upstream_message(&json!({"error": "Bad Request"})).as_deref(), Some("Bad Request"));
        assert_eq!(upstream_message(&json!({"statusCode": 500})), None);
    }
}
