//! Reflection collection
//!
//! After chatting with both selves the user answers a fixed, ordered set of
//! free-text questions. There is no validation and no required field:
//! partial completion is allowed. Finishing persists the answers locally and
//! mirrors them to the remote session document; the remote write is
//! fire-and-log and never affects the caller-visible outcome.

use crate::datafoundry::DataFoundryClient;
use crate::error::Result;
use crate::storage::ProfileStore;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// One reflection question
#[derive(Debug, Clone, Copy)]
pub struct Question {
    /// Stable key the answer is stored under
    pub key: &'static str,
    /// Question text shown to the user
    pub label: &'static str,
    /// Optional hint shown under the question
    pub hint: Option<&'static str>,
}

/// The fixed, ordered reflection question set
pub const QUESTIONS: &[Question] = &[
    Question {
        key: "difference",
        label: "How did the past self and future self differ in how they responded to you?",
        hint: Some("Consider tone, focus, assumptions, or what each self emphasized."),
    },
    Question {
        key: "surprise",
        label: "Was there anything that surprised you in either conversation?",
        hint: Some("This could be something you did not expect yourself to say or hear."),
    },
    Question {
        key: "alignment",
        label: "Which response felt more aligned with how you see yourself right now? Why?",
        hint: None,
    },
    Question {
        key: "insight",
        label: "Did these conversations change how you understand your situation or yourself?",
        hint: None,
    },
    Question {
        key: "nextStep",
        label: "After talking to both selves, what feels like a reasonable next step?",
        hint: Some("This does not have to be big or definitive."),
    },
];

/// The persisted reflection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionRecord {
    /// Session the answers belong to
    pub session_id: String,
    /// RFC3339 timestamp of when the record was written
    pub created_at: String,
    /// Answer text per question key; absent keys were left unanswered
    pub answers: BTreeMap<String, String>,
}

/// Collects reflection answers for one session
#[derive(Debug, Clone)]
pub struct ReflectionSession {
    session_id: String,
    answers: BTreeMap<String, String>,
}

impl ReflectionSession {
    /// Create a collection session for the given session id
    ///
    /// Callers without a loaded profile pass `"unknown"`, matching the
    /// stored-document contract.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            answers: BTreeMap::new(),
        }
    }

    /// The session id the answers will be recorded under
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The answers collected so far
    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    /// Set or replace the answer for a question key
    ///
    /// No validation: empty strings are kept, unknown keys are accepted.
    pub fn set_answer(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(key.into(), value.into());
    }

    /// Finish the reflection: persist locally, then mirror remotely
    ///
    /// The local record is always written first and returned regardless of
    /// the remote outcome. The remote upsert patches
    /// `{reflection: {answers, finishedAt}}` into the session document — a
    /// full replacement of any existing `reflection` key — and any failure
    /// is only logged.
    pub async fn finish(
        &self,
        store: &ProfileStore,
        df_client: &DataFoundryClient,
    ) -> Result<ReflectionRecord> {
        let record = ReflectionRecord {
            session_id: self.session_id.clone(),
            created_at: Utc::now().to_rfc3339(),
            answers: self.answers.clone(),
        };

        store.save_reflection(&record)?;

        let patch = json!({
            "reflection": {
                "answers": &self.answers,
                "finishedAt": Utc::now().to_rfc3339(),
            }
        });

        if let Err(e) = df_client
            .upsert_session(&self.session_id, None, patch)
            .await
        {
            // Prototype contract: the user still sees success
            tracing::error!(
                "Reflection upsert failed for session {}: {}",
                self.session_id,
                e
            );
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_set_is_fixed_and_ordered() {
        let keys: Vec<_> = QUESTIONS.iter().map(|q| q.key).collect();
        assert_eq!(
            keys,
            ["difference", "surprise", "alignment", "insight", "nextStep"]
        );
    }

    #[test]
    fn test_hints_present_where_expected() {
        assert!(QUESTIONS[0].hint.is_some());
        assert!(QUESTIONS[2].hint.is_none());
        assert!(QUESTIONS[3].hint.is_none());
    }

    #[test]
    fn test_set_answer_upserts() {
        let mut session = ReflectionSession::new("s-1");
        session.set_answer("difference", "tone");
        session.set_answer("difference", "focus");
        assert_eq!(session.answers()["difference"], "focus");
    }

    #[test]
    fn test_partial_and_empty_answers_allowed() {
        let mut session = ReflectionSession::new("s-1");
        session.set_answer("difference", "a lot");
        session.set_answer("surprise", "");
        assert_eq!(session.answers().len(), 2);
        assert_eq!(session.answers()["surprise"], "");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ReflectionRecord {
            session_id: "s-1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            answers: BTreeMap::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("answers").is_some());
    }
}
