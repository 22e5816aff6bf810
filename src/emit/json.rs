use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::KnowlensError;

/// Envelope printed by `--json` for every command
#[derive(Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub result: T,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(command: &str, result: T) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            command: command.to_string(),
            result,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorOutput {
    pub code: String,
    pub message: String,
    pub suggestion: String,
}

impl From<&KnowlensError> for ErrorOutput {
    fn from(err: &KnowlensError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

impl ErrorOutput {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&serde_json::json!({ "error": self }))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileAction, GeneratedFile};
    use serde_json::Value;

    #[test]
    fn test_envelope() {
        let out = JsonOutput::new(
            "update",
            vec![GeneratedFile::new("docs/ai-knowledge/_index.md", FileAction::Created)],
        );
        let value: Value = serde_json::from_str(&out.to_json()).unwrap();

        assert_eq!(value["command"], "update");
        assert_eq!(value["result"][0]["action"], "created");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_error_output() {
        let err = KnowlensError::ModuleDetection("boom".to_string());
        let value: Value = serde_json::from_str(&ErrorOutput::from(&err).to_json()).unwrap();

        assert_eq!(value["error"]["code"], "MODULE_DETECTION_ERROR");
        assert_eq!(value["error"]["message"], "module detection failed: boom");
    }
}
