//! Session domain types for Temporal Selves
//!
//! This module defines the persona, profile, and message types shared by the
//! chat orchestration, reflection flow, profile store, and HTTP handlers.
//! Field names serialize in camelCase because the stored documents and the
//! remote dataset records follow that contract.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Placeholder content shown while an assistant reply is in flight
///
/// Placeholder messages are transient: they are appended to the visible
/// transcript during a send and discarded when the real reply arrives, and
/// they are never included in outbound completion requests.
pub const PLACEHOLDER: &str = "…";

/// Role of a chat message sender
///
/// The chat surface only ever exchanges user and assistant messages; the
/// system prompt travels out of band and is injected by the completion
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the user
    User,
    /// Message produced by a persona
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a persona transcript
///
/// Messages are append-only: once added to a transcript they are never
/// mutated, and ordering is append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender
    pub role: Role,
    /// Message text
    pub content: String,
    /// Timestamp in epoch milliseconds
    pub ts: i64,
}

impl ChatMessage {
    /// Creates a new user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_selves::session::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Hello!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ts: Utc::now().timestamp_millis(),
        }
    }

    /// Creates a new assistant message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_selves::session::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::assistant("Hello, I'm your future self.");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            ts: Utc::now().timestamp_millis(),
        }
    }

    /// Creates the transient placeholder shown while a reply is in flight
    pub fn placeholder() -> Self {
        Self::assistant(PLACEHOLDER)
    }

    /// Returns true if this is the transient placeholder message
    pub fn is_placeholder(&self) -> bool {
        self.content == PLACEHOLDER
    }
}

/// One of the two simulated identities the user converses with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Display name of the persona
    pub name: String,
    /// One-line biography the persona must stay consistent with
    pub short_bio: String,
    /// Optional longer description from onboarding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Persona {
    /// Creates a persona from a name and short bio
    pub fn new(name: impl Into<String>, short_bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_bio: short_bio.into(),
            description: None,
        }
    }
}

/// Selects one persona together with its transcript and prompt
///
/// Each track is fully independent: messages from one track are never sent
/// to the completion backend on behalf of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaTrack {
    /// The past-self persona and its transcript
    Past,
    /// The future-self persona and its transcript
    Future,
}

impl fmt::Display for PersonaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Past => write!(f, "past"),
            Self::Future => write!(f, "future"),
        }
    }
}

impl PersonaTrack {
    /// Parse a persona track from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_selves::session::PersonaTrack;
    ///
    /// let track = PersonaTrack::parse_str("past").unwrap();
    /// assert_eq!(track, PersonaTrack::Past);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "past" => Ok(Self::Past),
            "future" => Ok(Self::Future),
            other => Err(format!("Unknown persona track: {}", other)),
        }
    }

    /// The other track
    pub fn other(&self) -> Self {
        match self {
            Self::Past => Self::Future,
            Self::Future => Self::Past,
        }
    }
}

/// Session profile written by the onboarding flow
///
/// The session id is an opaque, already-assigned string; no uniqueness check
/// is performed locally. The profile is read-only to the chat and reflection
/// flows except for the chat transcripts carried by [`ProfileWithChat`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    /// Opaque session identifier, used as the remote resource id
    pub session_id: String,
    /// RFC3339 creation timestamp
    pub created_at: String,
    /// The past-self persona
    pub past_self: Persona,
    /// The future-self persona
    pub future_self: Persona,
}

impl SessionProfile {
    /// Creates a fresh profile with a minted v4 session id
    pub fn new(past_self: Persona, future_self: Persona) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339(),
            past_self,
            future_self,
        }
    }

    /// The persona for the given track
    pub fn persona(&self, track: PersonaTrack) -> &Persona {
        match track {
            PersonaTrack::Past => &self.past_self,
            PersonaTrack::Future => &self.future_self,
        }
    }
}

/// The two independent persona transcripts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTranscripts {
    /// Past-self transcript, append order
    #[serde(default)]
    pub past: Vec<ChatMessage>,
    /// Future-self transcript, append order
    #[serde(default)]
    pub future: Vec<ChatMessage>,
}

impl ChatTranscripts {
    /// Transcript for the given track
    pub fn track(&self, track: PersonaTrack) -> &Vec<ChatMessage> {
        match track {
            PersonaTrack::Past => &self.past,
            PersonaTrack::Future => &self.future,
        }
    }

    /// Mutable transcript for the given track
    pub fn track_mut(&mut self, track: PersonaTrack) -> &mut Vec<ChatMessage> {
        match track {
            PersonaTrack::Past => &mut self.past,
            PersonaTrack::Future => &mut self.future,
        }
    }

    /// True if either track holds at least one message
    pub fn has_messages(&self) -> bool {
        !self.past.is_empty() || !self.future.is_empty()
    }
}

/// Session profile plus chat transcripts, as persisted by this system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileWithChat {
    /// The onboarding profile, carried through verbatim
    #[serde(flatten)]
    pub profile: SessionProfile,
    /// Both persona transcripts
    pub chat: ChatTranscripts,
    /// RFC3339 timestamp of the last persisted exchange
    pub updated_at: String,
}

impl ProfileWithChat {
    /// Wraps a profile with transcripts and stamps `updated_at` now
    pub fn new(profile: SessionProfile, chat: ChatTranscripts) -> Self {
        Self {
            profile,
            chat,
            updated_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = ChatMessage::user("hi");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "hi");
        assert!(user.ts > 0);

        let assistant = ChatMessage::assistant("hello");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(ChatMessage::placeholder().is_placeholder());
        assert!(!ChatMessage::assistant("real reply").is_placeholder());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_track_parse_str() {
        assert_eq!(PersonaTrack::parse_str("past").unwrap(), PersonaTrack::Past);
        assert_eq!(
            PersonaTrack::parse_str("FUTURE").unwrap(),
            PersonaTrack::Future
        );
        assert!(PersonaTrack::parse_str("present").is_err());
    }

    #[test]
    fn test_track_other() {
        assert_eq!(PersonaTrack::Past.other(), PersonaTrack::Future);
        assert_eq!(PersonaTrack::Future.other(), PersonaTrack::Past);
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = SessionProfile::new(
            Persona::new("Alex18", "anxious student"),
            Persona::new("Alex40", "calm mentor"),
        );
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["pastSelf"]["shortBio"], "anxious student");
        assert_eq!(json["futureSelf"]["name"], "Alex40");
    }

    #[test]
    fn test_profile_with_chat_flattens_profile() {
        let profile = SessionProfile::new(
            Persona::new("Alex18", "anxious student"),
            Persona::new("Alex40", "calm mentor"),
        );
        let session_id = profile.session_id.clone();
        let with_chat = ProfileWithChat::new(profile, ChatTranscripts::default());
        let json = serde_json::to_value(&with_chat).unwrap();
        assert_eq!(json["sessionId"], session_id.as_str());
        assert!(json.get("chat").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_transcripts_roundtrip_from_stored_document() {
        let raw = serde_json::json!({
            "past": [{"role": "assistant", "content": "hi", "ts": 1700000000000i64}],
            "future": []
        });
        let transcripts: ChatTranscripts = serde_json::from_value(raw).unwrap();
        assert_eq!(transcripts.past.len(), 1);
        assert!(transcripts.has_messages());
        assert_eq!(transcripts.track(PersonaTrack::Past)[0].role, Role::Assistant);
    }

    #[test]
    fn test_persona_description_omitted_when_none() {
        let persona = Persona::new("Alex18", "anxious student");
        let json = serde_json::to_value(&persona).unwrap();
        assert!(json.get("description").is_none());
    }
}
