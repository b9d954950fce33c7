use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Activity, CompareResult, GenerateResult, Mode, ProductivityData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedOutput {
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
}

/// Default weekly distribution used when compare output has no usable rows.
pub fn fallback_activities() -> Vec<Activity> {
    vec![
        Activity::new("Core Responsibilities", "15 - 18"),
        Activity::new("Collaboration & Meetings", "4 - 6"),
        Activity::new("Planning & Strategy", "4 - 6"),
        Activity::new("Execution & Delivery", "8 - 10"),
        Activity::new("Learning & Development", "2 - 4"),
    ]
}

const ACTIVITY_LIST_KEYS: [&str; 3] = ["activities", "weekly_distribution", "tasks"];
const TITLE_KEYS: [&str; 4] = ["title", "task", "name", "activity"];
const HOURS_KEYS: [&str; 4] = ["hours", "time", "duration", "range"];
const DEFAULT_TITLE: &str = "Activity";

/// Returns the substring from the first `{` to the last `}` inclusive.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start <= end).then(|| &raw[start..=end])
}

/// Turns raw model text into the normalized result for `mode`.
pub fn normalize(raw: &str, mode: Mode) -> Result<ProductivityData, MalformedOutput> {
    let candidate = extract_json_object(raw).ok_or(MalformedOutput::NoJsonObject)?;

    let parsed: Value = serde_json::from_str(candidate)
        .map_err(|e| MalformedOutput::InvalidJson(e.to_string()))?;
    let Value::Object(object) = parsed else {
        return Err(MalformedOutput::InvalidJson("top-level value is not an object".into()));
    };

    match mode {
        Mode::Generate => {
            let result = generate_from_object(&object);
            if result.is_empty() {
                return Err(MalformedOutput::InvalidJson("no report sections present".into()));
            }
            Ok(ProductivityData::Generate(result))
        }
        Mode::Compare => Ok(ProductivityData::Compare(compare_from_object(&object))),
    }
}

fn generate_from_object(object: &Map<String, Value>) -> GenerateResult {
    let strings = |key: &str| -> Vec<String> {
        match object.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str())
                .map(ToOwned::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    };

    GenerateResult {
        summary: object
            .get("summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned),
        improvements: strings("improvements"),
        daily_plan: strings("daily_plan"),
        growth_tips: strings("growth_tips"),
    }
}

fn compare_from_object(object: &Map<String, Value>) -> CompareResult {
    let rows = ACTIVITY_LIST_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
        .filter(|items| !items.is_empty());

    let activities = match rows {
        Some(items) => items.iter().map(normalize_activity).collect(),
        None => {
            tracing::warn!("Compare output had no activity list; using fallback distribution");
            fallback_activities()
        }
    };
    CompareResult { activities }
}

/// Maps one upstream activity record onto the canonical `Activity`.
///
/// Title priority: `title`, `task`, `name`, `activity`, then `"Activity"`.
/// Hours priority: `hours`, `time`, `duration`, `range`, then a
/// `min_hours`/`max_hours` pair rendered as `"min - max"`, then `""`.
pub fn normalize_activity(item: &Value) -> Activity {
    let Some(fields) = item.as_object() else {
        return Activity::new(DEFAULT_TITLE, "");
    };

    let title = first_text(fields, &TITLE_KEYS).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let hours = first_text(fields, &HOURS_KEYS)
        .or_else(|| {
            let min = text_of(fields.get("min_hours")?)?;
            let max = text_of(fields.get("max_hours")?)?;
            Some(format!("{min} - {max}"))
        })
        .unwrap_or_default();

    Activity { title, hours }
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| fields.get(*key).and_then(text_of))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compare(raw: &str) -> Vec<Activity> {
        match normalize(raw, Mode::Compare).unwrap() {
            ProductivityData::Compare(result) => result.activities,
            other => panic!("expected compare data, got {other:?}"),
        }
    }

    #[test]
    fn extracts_object_from_prose_and_fences() {
        let raw = "Sure! ```json {\"summary\":\"x\",\"improvements\":[\"a\"]} ``` Hope this helps.";
        assert_eq!(extract_json_object(raw), Some("{\"summary\":\"x\",\"improvements\":[\"a\"]}"));

        let data = normalize(raw, Mode::Generate).unwrap();
        assert_eq!(
            data,
            ProductivityData::Generate(GenerateResult {
                summary: Some("x".into()),
                improvements: vec!["a".into()],
                ..Default::default()
            })
        );
    }

    #[test]
    fn extraction_is_greedy_across_objects() {
        assert_eq!(extract_json_object("a {1} b {2} c"), Some("{1} b {2}"));
    }

    #[test]
    fn missing_braces_is_no_json_object() {
        assert_eq!(normalize("I cannot help with that.", Mode::Generate), Err(MalformedOutput::NoJsonObject));
        assert_eq!(normalize("} backwards {", Mode::Compare), Err(MalformedOutput::NoJsonObject));
        assert_eq!(normalize("", Mode::Compare), Err(MalformedOutput::NoJsonObject));
    }

    #[test]
    fn unparseable_span_is_invalid_json() {
        let err = normalize("{summary: unquoted}", Mode::Generate).unwrap_err();
        assert!(matches!(err, MalformedOutput::InvalidJson(_)));

        // Invalid JSON is not repaired by the compare fallback.
        let err = normalize("{\"activities\": [,]}", Mode::Compare).unwrap_err();
        assert!(matches!(err, MalformedOutput::InvalidJson(_)));
    }

    #[test]
    fn compare_without_activity_array_uses_fallback() {
        assert_eq!(compare("{}"), fallback_activities());
        assert_eq!(compare(r#"{"activities": "none"}"#), fallback_activities());
        assert_eq!(compare(r#"{"activities": []}"#), fallback_activities());
    }

    #[test]
    fn fallback_has_five_fixed_rows() {
        let rows = fallback_activities();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], Activity::new("Core Responsibilities", "15 - 18"));
        assert_eq!(rows[4], Activity::new("Learning & Development", "2 - 4"));
    }

    #[test]
    fn canonical_activities_pass_through() {
        let raw = r#"{"activities":[{"title":"Inventory","hours":"10-12"},{"title":"Baking","hours":"20 - 22"}]}"#;
        assert_eq!(
            compare(raw),
            vec![Activity::new("Inventory", "10-12"), Activity::new("Baking", "20 - 22")]
        );
    }

    #[test]
    fn legacy_weekly_distribution_is_normalized() {
        let raw = r#"{
            "weekly_distribution": [
                {"activity": "Client Calls", "min_hours": 6, "max_hours": 8},
                {"activity": "Reporting", "min_hours": "3", "max_hours": "4"}
            ],
            "total_estimated_hours": 40
        }"#;
        assert_eq!(
            compare(raw),
            vec![Activity::new("Client Calls", "6 - 8"), Activity::new("Reporting", "3 - 4")]
        );
    }

    #[test]
    fn activity_fields_follow_priority_order() {
        let item = json!({"name": "by name", "task": "by task", "duration": "2h", "time": 5});
        assert_eq!(normalize_activity(&item), Activity::new("by task", "5"));

        let item = json!({"title": "", "activity": "fallthrough", "range": "1 - 2"});
        assert_eq!(normalize_activity(&item), Activity::new("fallthrough", "1 - 2"));

        assert_eq!(normalize_activity(&json!({})), Activity::new("Activity", ""));
        assert_eq!(normalize_activity(&json!("loose string")), Activity::new("Activity", ""));
    }

    #[test]
    fn generate_keeps_only_present_sections() {
        let data = normalize(r#"{"summary": "Stay focused.", "daily_plan": "not a list"}"#, Mode::Generate).unwrap();
        assert_eq!(
            data,
            ProductivityData::Generate(GenerateResult { summary: Some("Stay focused.".into()), ..Default::default() })
        );
    }

    #[test]
    fn generate_drops_non_string_entries() {
        let data = normalize(r#"{"growth_tips": ["Read", 3, null, "Mentor"]}"#, Mode::Generate).unwrap();
        let ProductivityData::Generate(result) = data else { panic!("expected generate data") };
        assert_eq!(result.growth_tips, vec!["Read".to_string(), "Mentor".to_string()]);
    }

    #[test]
    fn generate_without_any_section_is_rejected() {
        let err = normalize(r#"{"activities": []}"#, Mode::Generate).unwrap_err();
        assert!(matches!(err, MalformedOutput::InvalidJson(_)));
    }
}
