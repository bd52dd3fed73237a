//! Event Codec - Decodes raw (event, payload) pairs into typed events.
//!
//! The codec never fails the stream: anything it cannot make sense of comes
//! back as a [`DecodeError`] for the caller to log and drop.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::decision::{AttributeDimension, DecisionOption, DEFAULT_DIMENSION_VALUE};

use super::events::{AuditListKind, DecisionAudit, DecisionStreamEvent};

/// Message used when an `error` event carries no usable text.
const UNKNOWN_ERROR: &str = "unknown error";

/// Why a raw event was not turned into a typed one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized event '{0}'")]
    UnknownEvent(String),

    #[error("malformed '{event}' payload: {reason}")]
    MalformedPayload { event: String, reason: String },
}

impl DecodeError {
    fn malformed(event: &str, reason: impl Into<String>) -> Self {
        DecodeError::MalformedPayload {
            event: event.to_string(),
            reason: reason.into(),
        }
    }
}

/// Decoder for the closed set of decision stream events.
pub struct EventCodec;

impl EventCodec {
    /// Decodes one event.
    ///
    /// # Recognized tags
    /// `status`, `option`, `recommendation`, `audit:key_factors`,
    /// `audit:assumptions`, `audit:reversal_triggers`, `audit:recommendation`,
    /// `audit:confidence`, `decision_audit`, `error`, `done`.
    pub fn decode(event: &str, payload: &Value) -> Result<DecisionStreamEvent, DecodeError> {
        match event {
            "status" => message_field(payload)
                .map(|message| DecisionStreamEvent::StatusUpdate(message.to_string()))
                .ok_or_else(|| DecodeError::malformed(event, "missing message")),
            "option" => decode_option(payload)
                .map(DecisionStreamEvent::OptionReceived)
                .ok_or_else(|| DecodeError::malformed(event, "option requires a title")),
            "recommendation" => recommendation_text(payload)
                .map(|text| DecisionStreamEvent::RecommendationText(text.to_string()))
                .ok_or_else(|| DecodeError::malformed(event, "missing recommendation text")),
            "audit:key_factors" => decode_audit_list(event, AuditListKind::KeyFactors, payload),
            "audit:assumptions" => decode_audit_list(event, AuditListKind::Assumptions, payload),
            "audit:reversal_triggers" => {
                decode_audit_list(event, AuditListKind::ReversalTriggers, payload)
            }
            "audit:recommendation" => data_value(payload)
                .as_str()
                .map(|text| DecisionStreamEvent::AuditRecommendation(text.to_string()))
                .ok_or_else(|| DecodeError::malformed(event, "data must be a string")),
            "audit:confidence" => number(data_value(payload))
                .filter(|value| value.is_finite())
                .map(|value| DecisionStreamEvent::AuditConfidence(value.clamp(0.0, 1.0)))
                .ok_or_else(|| DecodeError::malformed(event, "data must be a finite number")),
            "decision_audit" => decode_decision_audit(payload)
                .map(DecisionStreamEvent::DecisionAudit)
                .ok_or_else(|| DecodeError::malformed(event, "audit must be an object")),
            "error" => {
                let message = message_field(payload)
                    .or_else(|| payload.get("data").and_then(Value::as_str))
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or(UNKNOWN_ERROR);
                Ok(DecisionStreamEvent::StreamError(message.to_string()))
            }
            "done" => Ok(DecisionStreamEvent::StreamDone),
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }
}

/// `{message}` or `{data: {message}}`.
fn message_field(payload: &Value) -> Option<&str> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            payload
                .get("data")
                .and_then(|data| data.get("message"))
                .and_then(Value::as_str)
        })
}

/// The `data` member of a wrapped payload, or the payload itself.
fn data_value(payload: &Value) -> &Value {
    match payload {
        Value::Object(object) => object.get("data").unwrap_or(payload),
        other => other,
    }
}

/// Numbers, or strings that parse as numbers.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// String elements of an array; other elements are skipped.
fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

/// The object itself, or its `data` member when the backend wrapped it.
fn unwrap_object<'a>(payload: &'a Value, marker: &str) -> Option<&'a Map<String, Value>> {
    let object = payload.as_object()?;
    if object.contains_key(marker) {
        return Some(object);
    }
    match object.get("data") {
        Some(Value::Object(inner)) => Some(inner),
        _ => Some(object),
    }
}

fn decode_option(payload: &Value) -> Option<DecisionOption> {
    let object = unwrap_object(payload, "title")?;
    let title = object.get("title").and_then(Value::as_str)?;
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let list = |key: &str| object.get(key).and_then(string_list).unwrap_or_default();

    let option = DecisionOption::new(title)
        .with_id(text("id"))
        .with_description(text("description"))
        .with_pros(list("pros"))
        .with_cons(list("cons"))
        .with_risk(text("risk"));

    let option = object
        .get("dimensions")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            AttributeDimension::from_name(key)
                .map(|dimension| (dimension, number(value).unwrap_or(DEFAULT_DIMENSION_VALUE)))
        })
        .fold(option, |option, (dimension, value)| {
            option.with_dimension(dimension, value)
        });

    Some(option.with_default_dimensions())
}

fn recommendation_text(payload: &Value) -> Option<&str> {
    match payload.get("data") {
        Some(Value::String(text)) => Some(text.as_str()),
        Some(Value::Object(inner)) => inner
            .get("reasoning")
            .or_else(|| inner.get("title"))
            .and_then(Value::as_str),
        _ => payload
            .get("title")
            .or_else(|| payload.get("reasoning"))
            .and_then(Value::as_str),
    }
}

fn decode_audit_list(
    event: &str,
    kind: AuditListKind,
    payload: &Value,
) -> Result<DecisionStreamEvent, DecodeError> {
    string_list(data_value(payload))
        .map(|items| DecisionStreamEvent::AuditList { kind, items })
        .ok_or_else(|| DecodeError::malformed(event, "data must be an array"))
}

fn decode_decision_audit(payload: &Value) -> Option<DecisionAudit> {
    let object = unwrap_object(payload, "key_factors")?;
    let list = |key: &str| object.get(key).and_then(string_list).unwrap_or_default();

    Some(DecisionAudit {
        final_recommendation: object
            .get("final_recommendation")
            .or_else(|| object.get("recommendation"))
            .and_then(Value::as_str)
            .map(str::to_string),
        confidence: object
            .get("confidence")
            .and_then(number)
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(0.0, 1.0)),
        key_factors: list("key_factors"),
        assumptions: list("assumptions"),
        reversal_triggers: list("reversal_triggers"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(event: &str, payload: Value) -> Result<DecisionStreamEvent, DecodeError> {
        EventCodec::decode(event, &payload)
    }

    fn decode_option_event(payload: Value) -> DecisionOption {
        match decode("option", payload) {
            Ok(DecisionStreamEvent::OptionReceived(option)) => option,
            other => panic!("Expected OptionReceived, got {:?}", other),
        }
    }

    #[test]
    fn status_from_top_level_message() {
        assert_eq!(
            decode("status", json!({"message": "Analyzing"})),
            Ok(DecisionStreamEvent::StatusUpdate("Analyzing".to_string()))
        );
    }

    #[test]
    fn status_from_nested_data_message() {
        assert_eq!(
            decode("status", json!({"event": "status", "data": {"message": "Thinking"}})),
            Ok(DecisionStreamEvent::StatusUpdate("Thinking".to_string()))
        );
    }

    #[test]
    fn status_without_message_is_malformed() {
        assert!(matches!(
            decode("status", json!({"data": 4})),
            Err(DecodeError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn option_decodes_all_fields() {
        let option = decode_option_event(json!({
            "id": "opt-1",
            "title": "Take the offer",
            "description": "Move to the new company",
            "pros": ["pay", 3, "growth"],
            "cons": ["commute"],
            "risk": "Medium",
            "dimensions": {
                "UPSIDE": 0.9,
                "STABILITY": 0.4,
                "FLEXIBILITY": 0.6,
                "LEARNING_VALUE": 0.8,
                "EFFORT": 0.7,
                "EMOTIONAL_COST": 0.3
            }
        }));

        assert_eq!(option.id, "opt-1");
        assert_eq!(option.title, "Take the offer");
        assert_eq!(option.description, "Move to the new company");
        assert_eq!(option.pros, vec!["pay", "growth"]);
        assert_eq!(option.cons, vec!["commute"]);
        assert_eq!(option.risk_level(), 0.5);
        assert_eq!(option.dimension(AttributeDimension::Upside), Some(0.9));
        assert_eq!(option.dimension(AttributeDimension::EmotionalCost), Some(0.3));
        assert_eq!(option.computed_score(), None);
    }

    #[test]
    fn option_nested_under_data() {
        let option = decode_option_event(json!({
            "event": "option",
            "data": {"title": "Stay", "risk": "low"}
        }));
        assert_eq!(option.title, "Stay");
        assert_eq!(option.risk_level(), 0.2);
    }

    #[test]
    fn option_missing_dimensions_default_to_half() {
        let option = decode_option_event(json!({"title": "Stay"}));

        assert_eq!(option.id, "");
        assert_eq!(option.dimensions().len(), 6);
        for dimension in AttributeDimension::ALL {
            assert_eq!(option.dimension(dimension), Some(0.5));
        }
    }

    #[test]
    fn option_dimension_values_are_normalized() {
        let option = decode_option_event(json!({
            "title": "Edge",
            "dimensions": {
                "UPSIDE": "NaN",
                "STABILITY": -1,
                "FLEXIBILITY": 1.7,
                "learning_value": "0.25",
                "EFFORT": "lots",
                "EMOTIONAL_COST": null
            }
        }));

        assert_eq!(option.dimension(AttributeDimension::Upside), Some(0.5));
        assert_eq!(option.dimension(AttributeDimension::Stability), Some(0.0));
        assert_eq!(option.dimension(AttributeDimension::Flexibility), Some(1.0));
        assert_eq!(option.dimension(AttributeDimension::LearningValue), Some(0.25));
        assert_eq!(option.dimension(AttributeDimension::Effort), Some(0.5));
        assert_eq!(option.dimension(AttributeDimension::EmotionalCost), Some(0.5));
    }

    #[test]
    fn option_ignores_unknown_dimension_keys() {
        let option = decode_option_event(json!({
            "title": "Stay",
            "dimensions": {"REGRET": 0.9, "Effort": 0.1}
        }));

        assert_eq!(option.dimensions().len(), 6);
        assert_eq!(option.dimension(AttributeDimension::Effort), Some(0.1));
        assert_eq!(option.dimension(AttributeDimension::Upside), Some(0.5));
    }

    #[test]
    fn option_without_title_is_malformed() {
        assert!(decode("option", json!({"pros": ["x"]})).is_err());
        assert!(decode("option", json!("not an object")).is_err());
    }

    #[test]
    fn recommendation_accepts_string_data() {
        assert_eq!(
            decode("recommendation", json!({"data": "Lean towards staying"})),
            Ok(DecisionStreamEvent::RecommendationText("Lean towards staying".to_string()))
        );
    }

    #[test]
    fn recommendation_accepts_reasoning_object() {
        assert_eq!(
            decode(
                "recommendation",
                json!({"data": {"option_id": "a", "reasoning": "Lower risk"}})
            ),
            Ok(DecisionStreamEvent::RecommendationText("Lower risk".to_string()))
        );
    }

    #[test]
    fn recommendation_accepts_option_shape() {
        assert_eq!(
            decode("recommendation", json!({"title": "Stay", "risk": "low"})),
            Ok(DecisionStreamEvent::RecommendationText("Stay".to_string()))
        );
    }

    #[test]
    fn audit_lists_decode_by_kind() {
        let cases = [
            ("audit:key_factors", AuditListKind::KeyFactors),
            ("audit:assumptions", AuditListKind::Assumptions),
            ("audit:reversal_triggers", AuditListKind::ReversalTriggers),
        ];
        for (tag, kind) in cases {
            assert_eq!(
                decode(tag, json!({"data": ["a", "b"]})),
                Ok(DecisionStreamEvent::AuditList {
                    kind,
                    items: vec!["a".to_string(), "b".to_string()]
                })
            );
        }
    }

    #[test]
    fn audit_list_requires_array() {
        assert!(matches!(
            decode("audit:assumptions", json!({"data": "single"})),
            Err(DecodeError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn audit_recommendation_requires_string() {
        assert_eq!(
            decode("audit:recommendation", json!({"data": "Take it"})),
            Ok(DecisionStreamEvent::AuditRecommendation("Take it".to_string()))
        );
        assert!(decode("audit:recommendation", json!({"data": 1})).is_err());
    }

    #[test]
    fn audit_confidence_is_clamped() {
        assert_eq!(
            decode("audit:confidence", json!({"data": 0.82})),
            Ok(DecisionStreamEvent::AuditConfidence(0.82))
        );
        assert_eq!(
            decode("audit:confidence", json!({"data": 1.4})),
            Ok(DecisionStreamEvent::AuditConfidence(1.0))
        );
        assert_eq!(
            decode("audit:confidence", json!({"data": -3})),
            Ok(DecisionStreamEvent::AuditConfidence(0.0))
        );
        assert!(decode("audit:confidence", json!({"data": "high"})).is_err());
    }

    #[test]
    fn audit_events_accept_bare_payloads() {
        assert_eq!(
            decode("audit:key_factors", json!(["pay", "growth"])),
            Ok(DecisionStreamEvent::AuditList {
                kind: AuditListKind::KeyFactors,
                items: vec!["pay".to_string(), "growth".to_string()]
            })
        );
        assert_eq!(
            decode("audit:recommendation", json!("Take it")),
            Ok(DecisionStreamEvent::AuditRecommendation("Take it".to_string()))
        );
        assert_eq!(
            decode("audit:confidence", json!(0.82)),
            Ok(DecisionStreamEvent::AuditConfidence(0.82))
        );
        assert!(decode("audit:reversal_triggers", json!({"items": []})).is_err());
    }

    #[test]
    fn decision_audit_decodes_all_fields() {
        let decoded = decode(
            "decision_audit",
            json!({
                "final_recommendation": "Take it",
                "confidence": 0.82,
                "key_factors": ["pay"],
                "assumptions": [],
                "reversal_triggers": []
            }),
        );

        assert_eq!(
            decoded,
            Ok(DecisionStreamEvent::DecisionAudit(DecisionAudit {
                final_recommendation: Some("Take it".to_string()),
                confidence: Some(0.82),
                key_factors: vec!["pay".to_string()],
                assumptions: vec![],
                reversal_triggers: vec![],
            }))
        );
    }

    #[test]
    fn decision_audit_accepts_backend_field_names_and_wrapping() {
        let decoded = decode(
            "decision_audit",
            json!({"data": {"recommendation": "Wait", "confidence": 2}}),
        );

        match decoded {
            Ok(DecisionStreamEvent::DecisionAudit(audit)) => {
                assert_eq!(audit.final_recommendation.as_deref(), Some("Wait"));
                assert_eq!(audit.confidence, Some(1.0));
                assert!(audit.key_factors.is_empty());
            }
            other => panic!("Expected DecisionAudit, got {:?}", other),
        }
    }

    #[test]
    fn error_keeps_message_or_falls_back() {
        assert_eq!(
            decode("error", json!({"message": "backend unavailable"})),
            Ok(DecisionStreamEvent::StreamError("backend unavailable".to_string()))
        );
        assert_eq!(
            decode("error", Value::Null),
            Ok(DecisionStreamEvent::StreamError("unknown error".to_string()))
        );
    }

    #[test]
    fn done_accepts_any_payload() {
        for payload in [Value::Null, json!(true), json!({"data": {}}), json!("bye")] {
            assert_eq!(decode("done", payload), Ok(DecisionStreamEvent::StreamDone));
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(
            decode("message", json!({})),
            Err(DecodeError::UnknownEvent("message".to_string()))
        );
    }

    #[test]
    fn terminal_events() {
        assert!(DecisionStreamEvent::StreamDone.is_terminal());
        assert!(DecisionStreamEvent::StreamError("x".into()).is_terminal());
        assert!(!DecisionStreamEvent::StatusUpdate("x".into()).is_terminal());
    }
}
