use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    application::services::gateway::{MessageGateway, OutboundMessage},
    domain::models::{DeliveryOutcome, GatewaySession, Recipient},
};

/// Issues exactly one gateway call per recipient and folds every error into a
/// `Failure` outcome. Never retries.
#[derive(Clone)]
pub struct DeliveryExecutor {
    gateway: Arc<dyn MessageGateway>,
}

impl DeliveryExecutor {
    pub fn new(gateway: Arc<dyn MessageGateway>) -> Self {
        Self { gateway }
    }

    pub async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
        session: &GatewaySession,
    ) -> DeliveryOutcome {
        let outbound = OutboundMessage {
            phone: recipient.normalized_address(),
            is_group: recipient.is_group,
            body: message,
        };
        let attempted_at = Utc::now();

        match self.gateway.send(session, outbound).await {
            Ok(()) => {
                debug!(recipient = %recipient.address, "message delivered");
                DeliveryOutcome::success(recipient.address.clone(), attempted_at)
            }
            Err(err) => {
                warn!(recipient = %recipient.address, error = %err, "message delivery failed");
                DeliveryOutcome::failure(recipient.address.clone(), attempted_at, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::{application::services::gateway::GatewayError, domain::models::DeliveryStatus};

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<(String, bool, String)>>,
        fail_with: Option<GatewayError>,
    }

    #[async_trait]
    impl MessageGateway for RecordingGateway {
        async fn send(
            &self,
            _session: &GatewaySession,
            message: OutboundMessage<'_>,
        ) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push((
                message.phone.to_string(),
                message.is_group,
                message.body.to_string(),
            ));
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn session() -> GatewaySession {
        GatewaySession {
            user_id: Uuid::new_v4(),
            session_name: "main".to_string(),
            token: "secret".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sends_normalized_address_with_explicit_group_flag() {
        let gateway = Arc::new(RecordingGateway::default());
        let executor = DeliveryExecutor::new(gateway.clone());

        let outcome = executor
            .deliver(&Recipient::new("120363@g.us", true), "hello", &session())
            .await;

        assert_eq!(outcome.status, DeliveryStatus::Success);
        assert_eq!(outcome.recipient, "120363@g.us");
        assert_eq!(outcome.error, None);
        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec![("120363".to_string(), true, "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn gateway_error_becomes_failure_outcome_after_one_call() {
        let gateway = Arc::new(RecordingGateway {
            fail_with: Some(GatewayError::Timeout),
            ..Default::default()
        });
        let executor = DeliveryExecutor::new(gateway.clone());

        let outcome = executor
            .deliver(&Recipient::new("111@c.us", false), "hello", &session())
            .await;

        assert_eq!(outcome.status, DeliveryStatus::Failure);
        assert_eq!(outcome.error.as_deref(), Some("timeout"));
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }
}
