//! The generative-text API boundary

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Fixed assistant reply when the gateway was never configured
pub const GATEWAY_UNAVAILABLE_NOTICE: &str =
    "⚠️ The model gateway is not configured. Chat is unavailable until a valid API key is provided.";

/// Opaque boundary to a hosted generative-text API.
///
/// Implementations collapse network, authentication, rate-limit, and quota
/// failures into [`TablyError::Gateway`](crate::TablyError::Gateway) carrying
/// the upstream message. No retries, no backoff; the caller decides.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Provider name for log lines
    fn name(&self) -> &str;

    /// Send a text prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Whether a usable gateway exists for this process.
///
/// Configuration failure is reported once at startup; a `Disabled` gateway
/// never attempts a call and the orchestrator short-circuits to
/// [`GATEWAY_UNAVAILABLE_NOTICE`].
#[derive(Clone)]
pub enum GatewayState {
    /// Configured and usable
    Ready(Arc<dyn Gateway>),
    /// Configuration failed; no calls will be attempted
    Disabled {
        /// The configuration error, kept for log lines
        reason: String,
    },
}

impl GatewayState {
    /// Wrap a configured gateway
    pub fn ready(gateway: impl Gateway + 'static) -> Self {
        GatewayState::Ready(Arc::new(gateway))
    }

    /// Mark the gateway unavailable for the lifetime of the process
    pub fn disabled(reason: impl Into<String>) -> Self {
        GatewayState::Disabled {
            reason: reason.into(),
        }
    }

    /// True when calls may be attempted
    pub fn is_ready(&self) -> bool {
        matches!(self, GatewayState::Ready(_))
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayState::Ready(g) => f.debug_tuple("Ready").field(&g.name()).finish(),
            GatewayState::Disabled { reason } => {
                f.debug_struct("Disabled").field("reason", reason).finish()
            }
        }
    }
}
