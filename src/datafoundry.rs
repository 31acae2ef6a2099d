//! Data Foundry session upsert client
//!
//! This module implements the GET→merge→PUT read-modify-write against the
//! Data Foundry dataset entity endpoint. Session documents are arbitrary
//! JSON objects addressed by a `resource_id` header; this client only ever
//! reads the whole document and shallow-merges a patch into its top level.
//!
//! There is no retry, no idempotency key, and no conflict detection:
//! concurrent upserts for the same session race at the HTTP layer and the
//! last PUT wins. That weak contract is intentional and documented in
//! DESIGN.md.

use crate::config::DataFoundryConfig;
use crate::error::{Result, TemporalError};

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Shallow-merge a patch object into an existing document
///
/// Only top-level keys are compared: patch keys overwrite existing keys at
/// depth 1, and nested objects in the patch fully replace same-keyed nested
/// objects in the existing document. Non-object inputs degrade to empty
/// objects before merging.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use temporal_selves::datafoundry::shallow_merge;
///
/// let existing = json!({"a": 1, "nested": {"keep": true}});
/// let patch = json!({"b": 2});
/// let merged = shallow_merge(existing, patch);
/// assert_eq!(merged, json!({"a": 1, "b": 2, "nested": {"keep": true}}));
/// ```
pub fn shallow_merge(existing: Value, patch: Value) -> Value {
    let mut base = match existing {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    if let Value::Object(patch_map) = patch {
        for (key, value) in patch_map {
            base.insert(key, value);
        }
    }

    Value::Object(base)
}

/// HTTP client for Data Foundry session documents
///
/// # Examples
///
/// ```no_run
/// use temporal_selves::config::DataFoundryConfig;
/// use temporal_selves::datafoundry::DataFoundryClient;
/// use serde_json::json;
///
/// # async fn example() -> temporal_selves::error::Result<()> {
/// let config = DataFoundryConfig {
///     dataset_id: "ds-123".to_string(),
///     api_token: "secret".to_string(),
///     ..Default::default()
/// };
/// let client = DataFoundryClient::new(config)?;
/// let merged = client
///     .upsert_session("session-1", None, json!({"reflection": {"done": true}}))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct DataFoundryClient {
    client: Client,
    config: DataFoundryConfig,
}

impl DataFoundryClient {
    /// Create a new Data Foundry client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: DataFoundryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("temporal-selves/0.2.0")
            .build()
            .map_err(|e| TemporalError::Storage(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The dataset entity URL for this client's dataset
    fn entity_url(&self) -> String {
        format!(
            "{}/api/v1/datasets/entity/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.dataset_id
        )
    }

    /// Upsert a partial document into the session's remote record
    ///
    /// Performs a GET of the existing document, a shallow merge of the patch
    /// into it, and a PUT of the merged result. A failed or non-JSON GET is
    /// treated as an empty existing document and not surfaced; a failed PUT
    /// is an error carrying the upstream status and body.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Opaque session identifier, sent as `resource_id`
    /// * `token` - Optional `token` header value; defaults from config
    /// * `patch` - Partial JSON object to merge at the top level
    ///
    /// # Returns
    ///
    /// The PUT response body parsed as JSON when possible, else as a JSON
    /// string value.
    pub async fn upsert_session(
        &self,
        session_id: &str,
        token: Option<&str>,
        patch: Value,
    ) -> Result<Value> {
        let url = self.entity_url();
        let token = token.unwrap_or(&self.config.default_token);

        // GET existing (may fail if the document was never created)
        let existing = match self
            .client
            .get(&url)
            .header("api_token", &self.config.api_token)
            .header("resource_id", session_id)
            .header("token", token)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                response.json::<Value>().await.unwrap_or_else(|_| json!({}))
            }
            Ok(response) => {
                tracing::debug!(
                    "DF GET returned {} for session {}, starting from empty document",
                    response.status(),
                    session_id
                );
                json!({})
            }
            Err(e) => {
                tracing::error!("DF GET failed for session {}: {}", session_id, e);
                return Err(TemporalError::Http(e).into());
            }
        };

        let merged = shallow_merge(existing, patch);

        let put_response = self
            .client
            .put(&url)
            .header("api_token", &self.config.api_token)
            .header("resource_id", session_id)
            .header("token", token)
            .json(&merged)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("DF PUT failed for session {}: {}", session_id, e);
                TemporalError::Http(e)
            })?;

        let status = put_response.status();
        let text = put_response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!("DF PUT returned {} for session {}", status, session_id);
            return Err(TemporalError::Dataset {
                status: status.as_u16(),
                detail: text,
            }
            .into());
        }

        tracing::info!("Upserted session document for {}", session_id);

        // DF returns JSON or a bare string; try parse
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_merge_overrides_top_level_keys() {
        let existing = json!({"a": 1, "b": "old"});
        let patch = json!({"b": "new", "c": true});
        assert_eq!(
            shallow_merge(existing, patch),
            json!({"a": 1, "b": "new", "c": true})
        );
    }

    #[test]
    fn test_shallow_merge_replaces_nested_objects_wholesale() {
        let existing = json!({"reflection": {"answers": {"difference": "old"}, "finishedAt": "t0"}});
        let patch = json!({"reflection": {"answers": {"surprise": "new"}}});
        let merged = shallow_merge(existing, patch);
        // No deep merge: the old answers and finishedAt are gone
        assert_eq!(
            merged,
            json!({"reflection": {"answers": {"surprise": "new"}}})
        );
    }

    #[test]
    fn test_shallow_merge_preserves_untouched_nested_objects() {
        let existing = json!({"chat": {"past": ["hi"]}, "x": 1});
        let patch = json!({"x": 2});
        let merged = shallow_merge(existing, patch);
        assert_eq!(merged["chat"], json!({"past": ["hi"]}));
        assert_eq!(merged["x"], json!(2));
    }

    #[test]
    fn test_shallow_merge_degrades_non_objects() {
        assert_eq!(shallow_merge(json!("scalar"), json!({"a": 1})), json!({"a": 1}));
        assert_eq!(shallow_merge(json!({"a": 1}), json!(null)), json!({"a": 1}));
        assert_eq!(shallow_merge(json!(null), json!(null)), json!({}));
    }

    #[test]
    fn test_shallow_merge_empty_patch_is_identity() {
        let existing = json!({"a": 1, "nested": {"b": 2}});
        assert_eq!(shallow_merge(existing.clone(), json!({})), existing);
    }

    #[test]
    fn test_entity_url_trims_trailing_slash() {
        let client = DataFoundryClient::new(DataFoundryConfig {
            base_url: "https://df.example.com/".to_string(),
            dataset_id: "ds-1".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.entity_url(),
            "https://df.example.com/api/v1/datasets/entity/ds-1"
        );
    }
}
