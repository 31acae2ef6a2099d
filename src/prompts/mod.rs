//! Prompt templates for persona conversations
//!
//! This module provides the per-persona system prompt and the synthesized
//! greeting message. The system prompt is regenerated for every completion
//! request from the active persona's name and short bio; switching tracks
//! switches the prompt with no cross-contamination of history.

pub mod greeting;
pub mod persona_prompt;

use crate::session::{Persona, PersonaTrack};

/// Builds the system prompt for the active persona
///
/// # Arguments
///
/// * `track` - Which persona track is active
/// * `persona` - The persona to embody
///
/// # Examples
///
/// ```
/// use temporal_selves::prompts::build_system_prompt;
/// use temporal_selves::session::{Persona, PersonaTrack};
///
/// let persona = Persona::new("Alex18", "anxious student");
/// let prompt = build_system_prompt(PersonaTrack::Past, &persona);
/// assert!(prompt.contains("past self"));
/// assert!(prompt.contains("Alex18"));
/// assert!(prompt.contains("anxious student"));
/// ```
pub fn build_system_prompt(track: PersonaTrack, persona: &Persona) -> String {
    persona_prompt::generate_persona_prompt(track, persona)
}

/// Builds the synthesized greeting for a persona track
///
/// Used exactly once per track when a profile is loaded with no saved chat.
pub fn build_greeting(track: PersonaTrack, persona: &Persona) -> String {
    greeting::generate_greeting(track, persona)
}
