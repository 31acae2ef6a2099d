//! Temporal Selves - guided-reflection web service library
//!
//! This library provides the core functionality for the Temporal Selves
//! service: persona chat orchestration, reflection collection, local profile
//! storage, and the HTTP proxy surface in front of the completion API and
//! the Data Foundry dataset store.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: per-track chat orchestration and send state machine
//! - `reflection`: fixed question set and the reflection finish flow
//! - `providers`: completion backend abstraction and OpenAI implementation
//! - `datafoundry`: shallow-merge upsert client for session documents
//! - `storage`: local profile store under the fixed document keys
//! - `prompts`: persona system prompt and greeting templates
//! - `server`: axum router and the two proxy endpoints
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use temporal_selves::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file("config.yaml")?;
//!     config.validate()?;
//!
//!     let state = temporal_selves::server::AppState::new(config)?;
//!     temporal_selves::server::serve(state).await
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod datafoundry;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod reflection;
pub mod server;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatSession, SendState};
pub use config::Config;
pub use error::{Result, TemporalError};
pub use reflection::{ReflectionSession, QUESTIONS};
pub use session::{ChatMessage, Persona, PersonaTrack, SessionProfile};
pub use storage::ProfileStore;

#[cfg(test)]
pub mod test_utils;
