//! Chat orchestration
//!
//! This module drives the two persona conversations. Each track moves
//! through `uninitialized → greeted → conversing`: a freshly loaded profile
//! with no saved chat gets exactly one synthesized greeting per track, while
//! a persisted transcript is restored verbatim and never re-greeted.
//!
//! Sends are serialized per track by an explicit send state
//! (`idle → sending → idle`, with the error path also returning to `idle`).
//! A send attempted while one is in flight is rejected with
//! [`TemporalError::SendInFlight`] instead of being silently dropped, and
//! produces no outbound request.

use crate::error::{Result, TemporalError};
use crate::prompts;
use crate::providers::{CompletionBackend, PromptMessage};
use crate::session::{
    ChatMessage, ChatTranscripts, PersonaTrack, ProfileWithChat, SessionProfile,
};
use crate::storage::ProfileStore;

/// Fallback reply shown when the completion backend fails
///
/// The user can retry by sending again; nothing else is surfaced.
pub const FALLBACK_REPLY: &str = "Sorry — I’m having trouble responding right now.";

/// Send state of one persona track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    /// No send in flight; new sends are accepted
    #[default]
    Idle,
    /// A send is in flight; new sends are rejected
    Sending,
}

/// An outbound completion request prepared by [`ChatSession::begin_send`]
///
/// Holds everything the completion backend needs: the per-persona system
/// prompt and the windowed history of the active track only, ending with the
/// new user message.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Track this request belongs to
    pub track: PersonaTrack,
    /// System prompt generated from the active persona
    pub system_prompt: String,
    /// Windowed history plus the new user message, oldest first
    pub messages: Vec<PromptMessage>,
}

/// One user's chat session across both persona tracks
pub struct ChatSession {
    profile: SessionProfile,
    transcripts: ChatTranscripts,
    past_state: SendState,
    future_state: SendState,
    history_window: usize,
}

impl ChatSession {
    /// Restore a session from storage, or greet both tracks
    ///
    /// If a persisted transcript with at least one message exists on either
    /// track, both tracks are restored verbatim. Otherwise each track is
    /// seeded with exactly one greeting message naming its persona.
    ///
    /// # Arguments
    ///
    /// * `profile` - The onboarding profile (read-only here)
    /// * `store` - Profile store to restore saved transcripts from
    /// * `history_window` - Maximum prior messages per completion request
    pub fn restore_or_greet(
        profile: SessionProfile,
        store: &ProfileStore,
        history_window: usize,
    ) -> Result<Self> {
        let saved = store.load_profile_with_chat()?;

        let transcripts = match saved {
            Some(saved) if saved.chat.has_messages() => {
                tracing::debug!(
                    "Restored transcripts: past={}, future={}",
                    saved.chat.past.len(),
                    saved.chat.future.len()
                );
                saved.chat
            }
            _ => {
                let mut transcripts = ChatTranscripts::default();
                for track in [PersonaTrack::Past, PersonaTrack::Future] {
                    let greeting =
                        prompts::build_greeting(track, profile.persona(track));
                    transcripts
                        .track_mut(track)
                        .push(ChatMessage::assistant(greeting));
                }
                transcripts
            }
        };

        Ok(Self {
            profile,
            transcripts,
            past_state: SendState::Idle,
            future_state: SendState::Idle,
            history_window,
        })
    }

    /// The session profile
    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    /// The transcript of one track, placeholder included while in flight
    pub fn transcript(&self, track: PersonaTrack) -> &[ChatMessage] {
        self.transcripts.track(track)
    }

    /// The send state of one track
    pub fn send_state(&self, track: PersonaTrack) -> SendState {
        match track {
            PersonaTrack::Past => self.past_state,
            PersonaTrack::Future => self.future_state,
        }
    }

    fn set_send_state(&mut self, track: PersonaTrack, state: SendState) {
        match track {
            PersonaTrack::Past => self.past_state = state,
            PersonaTrack::Future => self.future_state = state,
        }
    }

    /// The system prompt for one track, regenerated from the persona
    pub fn system_prompt(&self, track: PersonaTrack) -> String {
        prompts::build_system_prompt(track, self.profile.persona(track))
    }

    /// Begin a send: validate, guard reentrancy, and prepare the request
    ///
    /// On success the track moves to `Sending`, the user message and a
    /// transient placeholder are appended to the visible transcript, and the
    /// outbound request is returned. The request carries at most the last
    /// `history_window` non-placeholder messages of the active track plus
    /// the new user message; the other track contributes nothing.
    ///
    /// # Errors
    ///
    /// * [`TemporalError::Validation`] when the text trims to empty
    /// * [`TemporalError::SendInFlight`] when the track is not idle
    pub fn begin_send(&mut self, track: PersonaTrack, text: &str) -> Result<OutboundRequest> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TemporalError::Validation("Message cannot be empty".to_string()).into());
        }

        if self.send_state(track) != SendState::Idle {
            tracing::warn!("Rejected send on {} track: one already in flight", track);
            return Err(TemporalError::SendInFlight.into());
        }

        let prior: Vec<&ChatMessage> = self
            .transcripts
            .track(track)
            .iter()
            .filter(|m| !m.is_placeholder())
            .collect();
        let window_start = prior.len().saturating_sub(self.history_window);
        let mut messages: Vec<PromptMessage> = prior[window_start..]
            .iter()
            .map(|m| PromptMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        messages.push(PromptMessage::user(text));

        let request = OutboundRequest {
            track,
            system_prompt: self.system_prompt(track),
            messages,
        };

        self.set_send_state(track, SendState::Sending);
        let transcript = self.transcripts.track_mut(track);
        transcript.push(ChatMessage::user(text));
        transcript.push(ChatMessage::placeholder());

        Ok(request)
    }

    /// Complete a send: record the reply and persist both tracks
    ///
    /// The placeholder is discarded, not edited: the final transcript is
    /// `[...prior, user, assistant]`. A backend failure turns into the fixed
    /// fallback reply; either way the track returns to `Idle` and both
    /// tracks are persisted.
    pub fn complete_send(
        &mut self,
        track: PersonaTrack,
        outcome: Result<String>,
        store: &ProfileStore,
    ) -> Result<ChatMessage> {
        let reply = match outcome {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    crate::session::PLACEHOLDER.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(e) => {
                tracing::error!("Completion failed on {} track: {}", track, e);
                FALLBACK_REPLY.to_string()
            }
        };

        let assistant = ChatMessage::assistant(reply);

        let transcript = self.transcripts.track_mut(track);
        if transcript.last().is_some_and(|m| m.is_placeholder()) {
            transcript.pop();
        }
        transcript.push(assistant.clone());

        self.set_send_state(track, SendState::Idle);
        self.persist(store)?;

        Ok(assistant)
    }

    /// Send a message on one track and wait for the reply
    ///
    /// Convenience wrapper around [`Self::begin_send`] and
    /// [`Self::complete_send`].
    pub async fn send(
        &mut self,
        track: PersonaTrack,
        text: &str,
        backend: &dyn CompletionBackend,
        store: &ProfileStore,
    ) -> Result<ChatMessage> {
        let request = self.begin_send(track, text)?;
        let outcome = backend
            .complete(&request.system_prompt, &request.messages)
            .await;
        self.complete_send(track, outcome, store)
    }

    /// Persist both tracks (the updated one and the unchanged other)
    fn persist(&self, store: &ProfileStore) -> Result<()> {
        store.save_profile_with_chat(&ProfileWithChat::new(
            self.profile.clone(),
            self.transcripts.clone(),
        ))
    }
}
