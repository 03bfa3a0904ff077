//! Alert filter builder
//!
//! Translates `list_alerts`/`analyze_alerts` arguments into the upstream
//! [`AlertFilter`]. Operations are matched case-insensitively and sent in
//! canonical upper case.

use chronomcp_client::{AlertFilter, FilterMode, LabelMatcher, MatchOperation, MuteStatus, StringMatcher};
use chronomcp_core::{params, Error, Result, ToolArgs};

use crate::mcp::ParamSchema;

pub const MONITOR_SLUG: &str = "monitor_slug";
pub const MONITOR_LABELS: &str = "monitor_labels";
pub const SIGNALS: &str = "signals";
pub const NOTIFICATION_POLICY_SLUG: &str = "notification_policy_slug";
pub const MUTE_STATUS: &str = "mute_status";
pub const FILTER_MODE: &str = "filter_mode";

const OPERATION: &str = "operation";
const SINGLE_VALUE: &str = "single_value";
const MULTI_VALUES: &str = "multi_values";

/// Build a string matcher from `{operation, single_value, multi_values}`.
///
/// `ANY_OF` and `NONE_OF` need a non-empty `multi_values`; every other
/// operation needs a non-empty `single_value`. The unused field is dropped.
pub fn string_matcher(raw: &ToolArgs, param: &str) -> Result<StringMatcher> {
    let op_name = params::optional_string(raw, OPERATION)
        .map_err(|e| Error::invalid_argument(param, e.to_string()))?
        .ok_or_else(|| Error::invalid_argument(param, "operation is required"))?;
    let operation = MatchOperation::parse(&op_name).ok_or_else(|| {
        Error::invalid_argument(param, format!("unknown operation {op_name:?}"))
    })?;

    if operation.takes_multiple_values() {
        let values = params::string_array(raw, MULTI_VALUES, false, &[])
            .map_err(|e| Error::invalid_argument(param, e.to_string()))?;
        if values.is_empty() {
            return Err(Error::invalid_argument(
                param,
                format!("{} requires a non-empty multi_values array", operation.as_str()),
            ));
        }
        Ok(StringMatcher {
            operation,
            single_value: None,
            multi_values: values,
        })
    } else {
        let value = params::optional_string(raw, SINGLE_VALUE)
            .map_err(|e| Error::invalid_argument(param, e.to_string()))?
            .ok_or_else(|| {
                Error::invalid_argument(
                    param,
                    format!("{} requires a non-empty single_value", operation.as_str()),
                )
            })?;
        Ok(StringMatcher {
            operation,
            single_value: Some(value),
            multi_values: Vec::new(),
        })
    }
}

fn label_matchers(args: &ToolArgs, param: &str) -> Result<Vec<LabelMatcher>> {
    params::object_array(args, param)?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let item = format!("{param}[{i}]");
            let name = params::optional_string(raw, "name")
                .map_err(|e| Error::invalid_argument(&item, e.to_string()))?
                .ok_or_else(|| Error::invalid_argument(&item, "name is required"))?;
            Ok(LabelMatcher {
                name,
                value: string_matcher(raw, &item)?,
            })
        })
        .collect()
}

fn mute_status(args: &ToolArgs) -> Result<Option<MuteStatus>> {
    let Some(raw) = params::optional_string(args, MUTE_STATUS)? else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "muted" => Ok(Some(MuteStatus::Muted)),
        "not_muted" | "unmuted" => Ok(Some(MuteStatus::NotMuted)),
        _ => Err(Error::invalid_argument(
            MUTE_STATUS,
            format!("expected muted or not_muted, got {raw:?}"),
        )),
    }
}

/// `AND` is the upstream default and is left unset.
fn filter_mode(args: &ToolArgs) -> Result<Option<FilterMode>> {
    let Some(raw) = params::optional_string(args, FILTER_MODE)? else {
        return Ok(None);
    };
    match raw.trim().to_ascii_uppercase().as_str() {
        "AND" => Ok(None),
        "OR" => Ok(Some(FilterMode::Or)),
        _ => Err(Error::invalid_argument(
            FILTER_MODE,
            format!("expected AND or OR, got {raw:?}"),
        )),
    }
}

/// Build the upstream filter, or `None` when no filter argument is set.
pub fn build_filter(args: &ToolArgs) -> Result<Option<AlertFilter>> {
    let scalar_matcher = |param: &str| -> Result<Option<StringMatcher>> {
        params::object(args, param, false)?
            .map(|raw| string_matcher(raw, param))
            .transpose()
    };

    let filter = AlertFilter {
        monitor_slug: scalar_matcher(MONITOR_SLUG)?,
        monitor_labels: label_matchers(args, MONITOR_LABELS)?,
        signals: label_matchers(args, SIGNALS)?,
        notification_policy_slug: scalar_matcher(NOTIFICATION_POLICY_SLUG)?,
        mute_status: mute_status(args)?,
        filter_mode: filter_mode(args)?,
    };

    let only_mode = AlertFilter {
        filter_mode: filter.filter_mode,
        ..AlertFilter::default()
    };
    if filter == only_mode {
        return Ok(None);
    }
    Ok(Some(filter))
}

fn matcher_schema() -> ParamSchema {
    let operations: Vec<&str> = MatchOperation::ALL.iter().map(MatchOperation::as_str).collect();
    ParamSchema::new()
        .enumeration(
            OPERATION,
            "Comparison, case-insensitive.",
            &operations,
            true,
        )
        .string(
            SINGLE_VALUE,
            "Value to compare against. Required for every operation except ANY_OF and NONE_OF.",
            false,
        )
        .string_array(
            MULTI_VALUES,
            "Values to compare against. Required for ANY_OF and NONE_OF.",
            false,
        )
}

fn label_matcher_schema() -> ParamSchema {
    ParamSchema::new()
        .string("name", "Label name.", true)
        .merge(matcher_schema())
}

/// Filter parameters shared by the alert tools.
pub fn filter_schema(schema: ParamSchema) -> ParamSchema {
    schema
        .object(MONITOR_SLUG, "Match on the monitor slug.", matcher_schema(), false)
        .object_array(
            MONITOR_LABELS,
            "Match on labels of the monitor definition.",
            label_matcher_schema(),
            false,
        )
        .object_array(
            SIGNALS,
            "Match on labels of the firing signal.",
            label_matcher_schema(),
            false,
        )
        .object(
            NOTIFICATION_POLICY_SLUG,
            "Match on the notification policy slug.",
            matcher_schema(),
            false,
        )
        .enumeration(
            MUTE_STATUS,
            "Only muted or only unmuted alerts.",
            &["muted", "not_muted"],
            false,
        )
        .enumeration(
            FILTER_MODE,
            "How filter categories combine (default AND).",
            &["AND", "OR"],
            false,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronomcp_core::ErrorCode;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_any_of_with_single_value_is_rejected() {
        let err = string_matcher(&args(json!({"operation": "ANY_OF", "single_value": "x"})), MONITOR_SLUG)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_equal_with_multi_values_is_rejected() {
        let err = string_matcher(&args(json!({"operation": "EQUAL", "multi_values": ["x"]})), MONITOR_SLUG)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_lowercase_operation_is_canonicalized() {
        let matcher =
            string_matcher(&args(json!({"operation": "equal", "single_value": "x"})), MONITOR_SLUG).unwrap();
        assert_eq!(matcher.operation, MatchOperation::Equal);
        assert_eq!(
            serde_json::to_value(&matcher).unwrap(),
            json!({"operation": "EQUAL", "single_value": "x"})
        );
    }

    #[test]
    fn test_unused_field_is_dropped() {
        let matcher = string_matcher(
            &args(json!({"operation": "none_of", "single_value": "ignored", "multi_values": ["a", "b"]})),
            MONITOR_SLUG,
        )
        .unwrap();
        assert_eq!(matcher.single_value, None);
        assert_eq!(matcher.multi_values, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_operation() {
        let err = string_matcher(&args(json!({"operation": "LIKE", "single_value": "x"})), MONITOR_SLUG)
            .unwrap_err();
        assert!(err.to_string().contains("unknown operation"));
    }

    #[test]
    fn test_no_filter_arguments() {
        assert_eq!(build_filter(&ToolArgs::new()).unwrap(), None);
        assert_eq!(build_filter(&args(json!({"filter_mode": "and"}))).unwrap(), None);
    }

    #[test]
    fn test_full_filter() {
        let filter = build_filter(&args(json!({
            "monitor_slug": {"operation": "contains", "single_value": "cpu"},
            "signals": [{"name": "service", "operation": "ANY_OF", "multi_values": ["api", "web"]}],
            "monitor_labels": [{"name": "team", "operation": "EQUAL", "single_value": "infra"}],
            "mute_status": "not_muted",
            "filter_mode": "or",
        })))
        .unwrap()
        .unwrap();
        assert_eq!(filter.signals[0].name, "service");
        assert_eq!(filter.signals[0].value.operation, MatchOperation::AnyOf);
        assert_eq!(filter.monitor_labels.len(), 1);
        assert_eq!(filter.mute_status, Some(MuteStatus::NotMuted));
        assert_eq!(filter.filter_mode, Some(FilterMode::Or));
    }

    #[test]
    fn test_label_matcher_requires_name() {
        let err = build_filter(&args(json!({
            "signals": [{"operation": "EQUAL", "single_value": "api"}]
        })))
        .unwrap_err();
        assert!(err.to_string().contains("signals[0]"));
    }

    #[test]
    fn test_bad_mode_and_mute_status() {
        assert!(build_filter(&args(json!({"filter_mode": "XOR"}))).is_err());
        assert!(build_filter(&args(json!({"mute_status": "sometimes"}))).is_err());
    }

    fn op_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            proptest::sample::select(MatchOperation::ALL.to_vec()).prop_map(|op| op.as_str().to_lowercase()),
            "[A-Z_]{1,12}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_matcher_fails_exactly_on_invalid_input(
            op in op_strategy(),
            single in proptest::option::of("[a-z]{0,3}"),
            multi in proptest::option::of(proptest::collection::vec("[a-z]{1,3}", 0..3)),
        ) {
            let mut raw = ToolArgs::new();
            raw.insert(OPERATION.into(), json!(op));
            if let Some(s) = &single {
                raw.insert(SINGLE_VALUE.into(), json!(s));
            }
            if let Some(m) = &multi {
                raw.insert(MULTI_VALUES.into(), json!(m));
            }

            let expected_ok = match MatchOperation::parse(&op) {
                None => false,
                Some(parsed) if parsed.takes_multiple_values() => multi.as_ref().is_some_and(|m| !m.is_empty()),
                Some(_) => single.as_ref().is_some_and(|s| !s.is_empty()),
            };
            prop_assert_eq!(string_matcher(&raw, MONITOR_SLUG).is_ok(), expected_ok);
        }
    }
}
