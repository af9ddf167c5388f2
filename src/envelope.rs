//! Response envelopes shared by the HTTP routes and the client action.

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::value::RawValue;

/// Result of an analysis request: the engine's answer or an error message, never both.
///
/// Serialized as `{"analysis": ...}` or `{"error": "..."}`. The answer is kept as raw JSON so
/// key order and number precision survive every hop.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    /// Knowledge-base answer, passed through opaquely.
    Analysis {
        /// Raw engine response.
        analysis: Box<RawValue>,
    },
    /// Failure with a caller-facing message.
    Error {
        /// Caller-facing message.
        error: String,
    },
}

impl AnalysisResponse {
    /// Wrap an engine answer.
    pub fn analysis(value: Box<RawValue>) -> Self {
        Self::Analysis { analysis: value }
    }

    /// Build a failure envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Whether this envelope carries an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default, deserialize_with = "present")]
    analysis: Option<Box<RawValue>>,
    #[serde(default)]
    error: Option<String>,
}

// A JSON `null` answer is still an answer.
fn present<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for AnalysisResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireEnvelope::deserialize(deserializer)?;
        match (wire.analysis, wire.error) {
            (Some(analysis), None) => Ok(Self::Analysis { analysis }),
            (None, Some(error)) => Ok(Self::Error { error }),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "envelope carries both `analysis` and `error`",
            )),
            (None, None) => Err(D::Error::custom(
                "envelope carries neither `analysis` nor `error`",
            )),
        }
    }
}

/// Body of every failure response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Caller-facing message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(text: &str) -> Box<RawValue> {
        RawValue::from_string(text.to_string()).expect("raw json")
    }

    #[test]
    fn envelopes_serialize_with_a_single_field() {
        let success = AnalysisResponse::analysis(raw(r#"{"answer":"R-1 residential"}"#));
        assert_eq!(
            serde_json::to_value(&success).expect("json"),
            json!({ "analysis": { "answer": "R-1 residential" } })
        );

        let failure = AnalysisResponse::failure("boom");
        assert_eq!(
            serde_json::to_value(&failure).expect("json"),
            json!({ "error": "boom" })
        );
    }

    #[test]
    fn analysis_text_survives_a_round_trip() {
        let text = r#"{"analysis":{"z":1,"a":12345678901234567890123}}"#;
        let parsed: AnalysisResponse = serde_json::from_str(text).expect("envelope");
        assert_eq!(serde_json::to_string(&parsed).expect("json"), text);
    }

    #[test]
    fn error_payloads_parse_as_failures() {
        let parsed: AnalysisResponse =
            serde_json::from_str(r#"{"error":"Error processing your request"}"#)
                .expect("envelope");
        assert!(parsed.is_error());
    }

    #[test]
    fn null_answer_is_still_an_analysis() {
        let parsed: AnalysisResponse =
            serde_json::from_str(r#"{"analysis":null}"#).expect("envelope");
        assert!(!parsed.is_error());
    }

    #[test]
    fn payloads_with_neither_or_both_fields_are_rejected() {
        assert!(serde_json::from_str::<AnalysisResponse>(r#"{"answer":1}"#).is_err());
        assert!(
            serde_json::from_str::<AnalysisResponse>(r#"{"analysis":{},"error":"x"}"#).is_err()
        );
    }
}
