use serde::{Deserialize, Serialize};

use crate::settings::RedactionSettings;

/// Payload for the redaction service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRequest {
    pub text: String,
    pub settings: RedactionSettings,
}

impl RedactionRequest {
    pub fn build(text: impl Into<String>, settings: &RedactionSettings) -> Self {
        Self {
            text: text.into(),
            settings: *settings,
        }
    }
}

/// Successful redaction response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionOutcome {
    pub redacted: String,
    pub log: Vec<String>,
}

impl RedactionOutcome {
    /// Empty output means there was nothing to redact, and nothing to download
    pub fn is_downloadable(&self) -> bool {
        !self.redacted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PiiCategory;

    #[test]
    fn test_every_settings_combination_is_sent_unmodified() {
        for mask in 0u8..16 {
            let mut settings = RedactionSettings::none();
            for (bit, category) in PiiCategory::ALL.iter().enumerate() {
                settings.set(*category, mask & (1 << bit) != 0);
            }

            let request = RedactionRequest::build("text", &settings);
            let body = serde_json::to_value(&request).unwrap();
            let sent = body["settings"].as_object().unwrap();

            assert_eq!(sent.len(), 4);
            assert_eq!(sent["emails"], settings.emails);
            assert_eq!(sent["phones"], settings.phones);
            assert_eq!(sent["names"], settings.names);
            assert_eq!(sent["addresses"], settings.addresses);
            assert_eq!(body["text"], "text");
        }
    }

    #[test]
    fn test_outcome_parses_service_response() {
        let outcome: RedactionOutcome = serde_json::from_str(
            r#"{"redacted": "Contact me at [EMAIL]", "log": ["Redacted 1 email"]}"#,
        )
        .unwrap();
        assert_eq!(outcome.log, vec!["Redacted 1 email"]);
        assert!(outcome.is_downloadable());
    }

    #[test]
    fn test_outcome_missing_log_is_malformed() {
        let parsed = serde_json::from_str::<RedactionOutcome>(r#"{"redacted": "x"}"#);
        assert!(parsed.is_err());
    }
}
