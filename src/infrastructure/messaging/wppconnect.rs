use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    application::services::gateway::{GatewayError, MessageGateway, OutboundMessage},
    domain::models::GatewaySession,
};

#[derive(Clone)]
pub struct WppConnectConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Client for a WPPConnect-compatible server.
pub struct WppConnectGateway {
    http: Client,
    base_url: String,
}

impl WppConnectGateway {
    pub fn new(config: &WppConnectConfig) -> anyhow::Result<Arc<Self>> {
        let http = Client::builder()
            .user_agent("campaigns/wppconnect")
            .timeout(config.timeout)
            .build()
            .context("failed to build gateway http client")?;

        Ok(Arc::new(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }))
    }

    fn build_url(&self, session: &GatewaySession, method: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, session.session_name, method)
    }

    fn classify(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Malformed(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl MessageGateway for WppConnectGateway {
    async fn send(
        &self,
        session: &GatewaySession,
        message: OutboundMessage<'_>,
    ) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.build_url(session, "send-message"))
            .bearer_auth(&session.token)
            .json(&SendMessageBody {
                phone: message.phone,
                is_group: message.is_group,
                is_newsletter: false,
                is_lid: false,
                message: message.body,
            })
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::classify)?;

        if !status.is_success() {
            let message = serde_json::from_str::<SendMessageReply>(&body)
                .ok()
                .and_then(|reply| reply.message)
                .unwrap_or_else(|| truncate(&body, 200));
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let reply: SendMessageReply = serde_json::from_str(&body)
            .map_err(|err| GatewayError::Malformed(err.to_string()))?;
        match reply.status.as_deref() {
            None | Some("success") => Ok(()),
            Some(other) => Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: reply.message.unwrap_or_else(|| other.to_string()),
            }),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    phone: &'a str,
    is_group: bool,
    is_newsletter: bool,
    is_lid: bool,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageReply {
    status: Option<String>,
    message: Option<String>,
}
