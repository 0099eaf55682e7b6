//! Prompt routing
//!
//! [`build_prompt`] is the one business rule in the system: given the current
//! session state and a new user utterance, decide whether to construct a
//! data-analysis prompt, pass the utterance through, or short-circuit to a
//! fixed notice. Pure; no I/O and no rendering concerns beyond text.

use crate::session::SessionState;
use crate::summary::render_describe;
use crate::table::Table;
use crate::templates::{TemplateEngine, ANALYSIS_PROMPT_TEMPLATE};
use crate::Result;
use std::collections::HashMap;

/// Case-insensitive substrings that switch a chat turn into analysis mode
const ANALYSIS_TRIGGERS: &[&str] = &["analyze", "insight"];

/// Fixed assistant reply when analysis is disabled
pub const DISABLED_NOTICE: &str =
    "🔒 AI analysis is disabled. Please enable analysis to chat about your data.";

/// Fixed assistant reply when no table has been uploaded
pub const MISSING_TABLE_NOTICE: &str = "📁 Please upload a CSV file first.";

/// Enumerated outcome of routing one user utterance
#[derive(Debug, Clone, PartialEq)]
pub enum PromptDecision {
    /// Send a constructed data-analysis prompt to the gateway
    Analysis(String),
    /// Send the raw utterance to the gateway
    Passthrough(String),
    /// Reply with [`DISABLED_NOTICE`] without calling the gateway
    DisabledNotice,
    /// Reply with [`MISSING_TABLE_NOTICE`] without calling the gateway
    MissingTableNotice,
}

/// Route a user utterance against the current session state.
///
/// Precedence is deliberate and load-bearing: a disabled session yields
/// [`PromptDecision::DisabledNotice`] even when no table was uploaded. The
/// missing-table notice only fires with analysis enabled.
pub fn build_prompt(state: &SessionState, utterance: &str) -> Result<PromptDecision> {
    match state.table() {
        Some(table) if state.analysis_enabled() => {
            let lowered = utterance.to_lowercase();
            if ANALYSIS_TRIGGERS.iter().any(|t| lowered.contains(t)) {
                Ok(PromptDecision::Analysis(render_analysis_prompt(
                    table,
                    state.dictionary(),
                )?))
            } else {
                Ok(PromptDecision::Passthrough(utterance.to_string()))
            }
        }
        _ if !state.analysis_enabled() => Ok(PromptDecision::DisabledNotice),
        _ => Ok(PromptDecision::MissingTableNotice),
    }
}

/// Render the analysis prompt: numeric summary of the table, plus the full
/// dictionary contents when present. No truncation; whatever size the
/// sections render to is sent verbatim.
fn render_analysis_prompt(table: &Table, dictionary: Option<&Table>) -> Result<String> {
    let engine = TemplateEngine::new();
    let mut data: HashMap<String, serde_json::Value> = HashMap::new();
    data.insert(
        "DATA_SUMMARY".to_string(),
        serde_json::Value::String(render_describe(table)),
    );
    if let Some(dict) = dictionary {
        data.insert(
            "DATA_DICTIONARY".to_string(),
            serde_json::Value::String(dict.render()),
        );
    }
    engine.render(ANALYSIS_PROMPT_TEMPLATE, &data)
}
