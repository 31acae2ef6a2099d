//! Synthesized greeting messages
//!
//! When a profile is loaded with no saved chat, each track is seeded with
//! exactly one assistant greeting. The wording (typographic quotes included)
//! is part of the persisted-transcript contract and must not drift.

use crate::session::{Persona, PersonaTrack};

/// Generates the greeting message for one persona track
pub fn generate_greeting(track: PersonaTrack, persona: &Persona) -> String {
    format!(
        "Hi — I’m your {track} self “{name}”. What’s bothering you right now?",
        track = track,
        name = persona.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_wording() {
        let persona = Persona::new("Alex18", "anxious student");
        let greeting = generate_greeting(PersonaTrack::Past, &persona);
        assert_eq!(
            greeting,
            "Hi — I’m your past self “Alex18”. What’s bothering you right now?"
        );
    }

    #[test]
    fn test_greeting_future_track() {
        let persona = Persona::new("Alex40", "calm mentor");
        let greeting = generate_greeting(PersonaTrack::Future, &persona);
        assert!(greeting.contains("future self"));
        assert!(greeting.contains("“Alex40”"));
    }
}
