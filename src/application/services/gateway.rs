use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::GatewaySession;

/// Single outbound message as the gateway expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundMessage<'a> {
    /// Bare address with chat/group suffixes already stripped.
    pub phone: &'a str,
    pub is_group: bool,
    pub body: &'a str,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("timeout")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("gateway rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

/// Messaging capability the dispatch engine delivers through. One call is
/// one delivery attempt; implementations must not retry internally.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send(
        &self,
        session: &GatewaySession,
        message: OutboundMessage<'_>,
    ) -> Result<(), GatewayError>;
}
