//! Persona system prompt template
//!
//! The short bio is written into the prompt verbatim and the rules bind the
//! persona to it, so replies stay consistent with the identity the user
//! defined during onboarding.

use crate::session::{Persona, PersonaTrack};

/// Generates the system prompt for one persona
///
/// # Arguments
///
/// * `track` - Which persona track is active ("past" or "future")
/// * `persona` - The persona identity to embody
pub fn generate_persona_prompt(track: PersonaTrack, persona: &Persona) -> String {
    format!(
        "\
You are the user's {track} self.

Identity you must embody:
- Name: {name}
- Short bio: {bio}

Rules:
- Speak in first person as {name}.
- Stay consistent with the short bio at all times.
- Be reflective and supportive, not clinical.
- Ask at most one gentle follow-up question.
- Keep responses concise (2–6 sentences).",
        track = track,
        name = persona.name,
        bio = persona.short_bio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_track() {
        let persona = Persona::new("Alex18", "anxious student");
        let past = generate_persona_prompt(PersonaTrack::Past, &persona);
        let future = generate_persona_prompt(PersonaTrack::Future, &persona);
        assert!(past.starts_with("You are the user's past self."));
        assert!(future.starts_with("You are the user's future self."));
    }

    #[test]
    fn test_prompt_binds_to_short_bio() {
        let persona = Persona::new("Alex40", "calm mentor");
        let prompt = generate_persona_prompt(PersonaTrack::Future, &persona);
        assert!(prompt.contains("Short bio: calm mentor"));
        assert!(prompt.contains("Speak in first person as Alex40."));
    }

    #[test]
    fn test_prompt_has_no_trailing_whitespace() {
        let persona = Persona::new("A", "b");
        let prompt = generate_persona_prompt(PersonaTrack::Past, &persona);
        assert_eq!(prompt, prompt.trim());
    }
}
