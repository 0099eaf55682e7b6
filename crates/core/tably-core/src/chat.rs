//! Chat turn orchestration
//!
//! Ties the session store, prompt builder, and gateway together per incoming
//! utterance. Every branch ends with exactly one new assistant turn: the
//! transcript grows by exactly two turns per utterance, user first.

use crate::gateway::{GatewayState, GATEWAY_UNAVAILABLE_NOTICE};
use crate::prompt::{build_prompt, PromptDecision, DISABLED_NOTICE, MISSING_TABLE_NOTICE};
use crate::session::{Role, SessionState};
use crate::table::{Table, TableFormat};
use crate::{Result, TablyError};
use tracing::{debug, info, warn};

/// Orchestrates chat turns and uploads for any number of sessions
pub struct ChatOrchestrator {
    gateway: GatewayState,
}

impl ChatOrchestrator {
    /// Create an orchestrator over a configured (or disabled) gateway
    pub fn new(gateway: GatewayState) -> Self {
        Self { gateway }
    }

    /// Whether gateway-backed replies are possible
    pub fn gateway_ready(&self) -> bool {
        self.gateway.is_ready()
    }

    /// Process one user utterance and return the assistant reply text.
    ///
    /// The gateway call (when one happens) completes before the assistant
    /// turn is appended, so the transcript always reads user-then-assistant.
    pub async fn handle_utterance(&self, session: &mut SessionState, utterance: &str) -> String {
        session.append_turn(Role::User, utterance);

        let reply = match &self.gateway {
            GatewayState::Disabled { reason } => {
                debug!("[{}] gateway disabled: {}", session.id(), reason);
                GATEWAY_UNAVAILABLE_NOTICE.to_string()
            }
            GatewayState::Ready(gateway) => match build_prompt(session, utterance) {
                Ok(PromptDecision::Analysis(prompt)) => {
                    debug!("[{}] analysis prompt, {} chars", session.id(), prompt.len());
                    self.generate_reply(gateway.as_ref(), &prompt).await
                }
                Ok(PromptDecision::Passthrough(prompt)) => {
                    debug!("[{}] passthrough", session.id());
                    self.generate_reply(gateway.as_ref(), &prompt).await
                }
                Ok(PromptDecision::DisabledNotice) => DISABLED_NOTICE.to_string(),
                Ok(PromptDecision::MissingTableNotice) => MISSING_TABLE_NOTICE.to_string(),
                Err(e) => {
                    warn!("[{}] prompt construction failed: {}", session.id(), e);
                    error_notice(&e)
                }
            },
        };

        session.append_turn(Role::Assistant, reply.clone());
        reply
    }

    async fn generate_reply(&self, gateway: &dyn crate::Gateway, prompt: &str) -> String {
        match gateway.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("{} call failed: {}", gateway.name(), e);
                error_notice(&e)
            }
        }
    }

    /// Parse CSV bytes and replace the session's primary table wholesale.
    /// On parse failure the previous table (or its absence) is untouched.
    pub fn upload_table(&self, session: &mut SessionState, bytes: &[u8]) -> Result<()> {
        let table = Table::from_csv(bytes)?;
        info!(
            "[{}] table loaded: {} rows x {} cols",
            session.id(),
            table.n_rows(),
            table.n_cols()
        );
        session.set_table(table);
        Ok(())
    }

    /// Parse dictionary bytes in the given format and replace the session's
    /// dictionary wholesale. Independent of the primary table.
    pub fn upload_dictionary(
        &self,
        session: &mut SessionState,
        bytes: &[u8],
        format: TableFormat,
    ) -> Result<()> {
        let dictionary = Table::load(bytes, format)?;
        info!(
            "[{}] dictionary loaded: {} rows x {} cols",
            session.id(),
            dictionary.n_rows(),
            dictionary.n_cols()
        );
        session.set_dictionary(dictionary);
        Ok(())
    }
}

/// Assistant-authored error text; embeds the upstream message verbatim
fn error_notice(e: &TablyError) -> String {
    let message = match e {
        TablyError::Gateway(msg) => msg.clone(),
        other => other.to_string(),
    };
    format!("❌ Error: {}", message)
}
