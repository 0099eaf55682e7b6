//! Tably Core
//!
//! This crate provides the core pieces for chatting with tabular data
//! through a hosted generative-text API:
//!
//! - Tabular loading (CSV always, xlsx for the dictionary path)
//! - Per-session state: transcript, tables, analysis flag
//! - Prompt routing between data-analysis and general chat
//! - The `Gateway` boundary to the external model API
//! - Chat turn orchestration with degrade-don't-crash error handling
//!
//! # Example
//!
//! ```no_run
//! use tably_core::{ChatOrchestrator, GatewayState, SessionState};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Without a credential the orchestrator still runs, replying with a
//!     // fixed unavailable notice instead of calling the API.
//!     let orchestrator = ChatOrchestrator::new(GatewayState::disabled("no API key"));
//!     let mut session = SessionState::new();
//!     let reply = orchestrator.handle_utterance(&mut session, "hello").await;
//!     println!("{}", reply);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export commonly used types
pub use uuid::Uuid;

// Core modules
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod summary;
pub mod table;
pub mod templates;

// Re-export main types
pub use chat::ChatOrchestrator;
pub use config::{
    get_env_bool, get_env_or, get_required_env, load_env, API_KEY_VAR,
    DEFAULT_MODEL, MODEL_VAR,
};
pub use error::{Result, TablyError};
pub use gateway::{Gateway, GatewayState, GATEWAY_UNAVAILABLE_NOTICE};
pub use logging::init_logging;
pub use prompt::{build_prompt, PromptDecision, DISABLED_NOTICE, MISSING_TABLE_NOTICE};
pub use session::{ChatTurn, Role, SessionState};
pub use summary::{describe, render_describe, ColumnSummary};
pub use table::{Cell, Column, Table, TableFormat};
pub use templates::{TemplateEngine, ANALYSIS_PROMPT_TEMPLATE};
