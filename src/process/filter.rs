// src/process/filter.rs
//! Revenue-positivity rule. Lists are filtered per element; objects pass or fail whole.

use serde_json::Value;

pub const REVENUE_FIELD: &str = "revenue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Object payload whose revenue is zero, negative or not a number.
    NonPositiveRevenue,
    /// Neither a list nor an object.
    UnsupportedShape,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NonPositiveRevenue => "non-positive revenue",
            SkipReason::UnsupportedShape => "payload is neither a list nor an object",
        }
    }
}

fn is_positive(revenue: &Value) -> bool {
    revenue.as_f64().is_some_and(|r| r > 0.0)
}

/// Missing revenue counts as 0, so list elements without it are dropped.
fn element_passes(item: &Value) -> bool {
    item.as_object()
        .and_then(|o| o.get(REVENUE_FIELD))
        .is_some_and(is_positive)
}

/// Apply the rule to one artifact payload.
pub fn filter_payload(payload: Value) -> Result<Value, SkipReason> {
    match payload {
        Value::Array(items) => Ok(Value::Array(
            items.into_iter().filter(element_passes).collect(),
        )),
        Value::Object(obj) => match obj.get(REVENUE_FIELD) {
            Some(r) if !is_positive(r) => Err(SkipReason::NonPositiveRevenue),
            _ => Ok(Value::Object(obj)),
        },
        _ => Err(SkipReason::UnsupportedShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_keeps_only_strictly_positive() {
        let out = filter_payload(json!([{"revenue": 10}, {"revenue": -5}, {"revenue": 0}])).unwrap();
        assert_eq!(out, json!([{"revenue": 10}]));
    }

    #[test]
    fn list_drops_missing_and_non_numeric_revenue() {
        let out = filter_payload(json!([
            {"name": "a"},
            {"revenue": "12"},
            {"revenue": 0.5},
            7,
            null
        ]))
        .unwrap();
        assert_eq!(out, json!([{"revenue": 0.5}]));
        assert_eq!(filter_payload(json!([])).unwrap(), json!([]));
    }

    #[test]
    fn object_is_filtered_as_a_whole() {
        assert_eq!(
            filter_payload(json!({"revenue": -1})),
            Err(SkipReason::NonPositiveRevenue)
        );
        assert_eq!(
            filter_payload(json!({"revenue": 0})),
            Err(SkipReason::NonPositiveRevenue)
        );
        assert_eq!(
            filter_payload(json!({"revenue": 5, "q": "Q3"})).unwrap(),
            json!({"revenue": 5, "q": "Q3"})
        );
        // no field: passes through untouched
        assert_eq!(filter_payload(json!({})).unwrap(), json!({}));
        assert_eq!(
            filter_payload(json!({"cost": -3})).unwrap(),
            json!({"cost": -3})
        );
    }

    #[test]
    fn scalars_are_unsupported() {
        assert_eq!(filter_payload(json!(3)), Err(SkipReason::UnsupportedShape));
        assert_eq!(filter_payload(json!("x")), Err(SkipReason::UnsupportedShape));
        assert_eq!(filter_payload(Value::Null), Err(SkipReason::UnsupportedShape));
    }
}
