use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credentials for the user's session on the messaging gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySession {
    pub user_id: Uuid,
    pub session_name: String,
    pub token: String,
    pub updated_at: DateTime<Utc>,
}
