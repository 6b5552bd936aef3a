use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, types::Json};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Campaign, CampaignRun, CampaignStatus, DeliveryOutcome, GatewaySession, Recipient},
    repositories::{CampaignRepository, SessionRepository},
};

pub type PgPool = Pool<Postgres>;

const CAMPAIGN_COLUMNS: &str = "id, user_id, name, message, recipients, status, delay_ms, \
     scheduled_at, results, total_recipients, success_count, failure_count, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresCampaignRepository {
    pool: PgPool,
}

impl PostgresCampaignRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, user_id, name, message, recipients, status, delay_ms, scheduled_at,
                results, total_recipients, success_count, failure_count, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
            "#,
        )
        .bind(campaign.id)
        .bind(campaign.user_id)
        .bind(&campaign.name)
        .bind(&campaign.message)
        .bind(Json(&campaign.recipients))
        .bind(campaign.status.as_str())
        .bind(i64::try_from(campaign.delay_ms)?)
        .bind(campaign.scheduled_at)
        .bind(Json(&campaign.results))
        .bind(campaign.total_recipients as i32)
        .bind(campaign.success_count as i32)
        .bind(campaign.failure_count as i32)
        .bind(campaign.created_at)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Campaign>> {
        let record = sqlx::query_as::<_, CampaignRecord>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        record.map(Campaign::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRecord>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Campaign::try_from).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: CampaignStatus,
        status: CampaignStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET status = $3,
                scheduled_at = COALESCE($4, scheduled_at),
                updated_at = $5
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(status.as_str())
        .bind(scheduled_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM campaigns WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Err(match current.as_deref().and_then(CampaignStatus::from_str) {
                Some(current) => DomainError::WrongStatus(current),
                None => DomainError::NotFound(format!("campaign {id}")),
            }
            .into());
        }
        Ok(())
    }

    async fn save_run(&self, run: &CampaignRun) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET status = $2,
                results = $3,
                total_recipients = $4,
                success_count = $5,
                failure_count = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(run.campaign_id())
        .bind(run.status().as_str())
        .bind(Json(run.ledger()))
        .bind(run.total_recipients() as i32)
        .bind(run.success_count() as i32)
        .bind(run.failure_count() as i32)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("campaign {}", run.campaign_id())).into());
        }
        Ok(())
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRecord>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns \
             WHERE status = 'scheduled' AND scheduled_at <= $1 \
             ORDER BY scheduled_at"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Campaign::try_from).collect()
    }
}

#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn upsert(&self, session: GatewaySession) -> anyhow::Result<GatewaySession> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            INSERT INTO gateway_sessions (user_id, session_name, token, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET session_name = EXCLUDED.session_name,
                token = EXCLUDED.token,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, session_name, token, updated_at
            "#,
        )
        .bind(session.user_id)
        .bind(&session.session_name)
        .bind(&session.token)
        .bind(session.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(record.into())
    }

    async fn find_by_user(&self, user_id: &Uuid) -> anyhow::Result<Option<GatewaySession>> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT user_id, session_name, token, updated_at
            FROM gateway_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(GatewaySession::from))
    }
}

#[derive(FromRow)]
struct CampaignRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    message: String,
    recipients: Json<Vec<Recipient>>,
    status: String,
    delay_ms: i64,
    scheduled_at: Option<DateTime<Utc>>,
    results: Json<Vec<DeliveryOutcome>>,
    total_recipients: i32,
    success_count: i32,
    failure_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = anyhow::Error;

    fn try_from(value: CampaignRecord) -> Result<Self, Self::Error> {
        let status = CampaignStatus::from_str(&value.status)
            .ok_or_else(|| anyhow::anyhow!("unknown campaign status {}", value.status))?;
        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            message: value.message,
            recipients: value.recipients.0,
            status,
            delay_ms: value.delay_ms.max(0) as u64,
            scheduled_at: value.scheduled_at,
            results: value.results.0,
            total_recipients: value.total_recipients as u32,
            success_count: value.success_count as u32,
            failure_count: value.failure_count as u32,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(FromRow)]
struct SessionRecord {
    user_id: Uuid,
    session_name: String,
    token: String,
    updated_at: DateTime<Utc>,
}

impl From<SessionRecord> for GatewaySession {
    fn from(value: SessionRecord) -> Self {
        Self {
            user_id: value.user_id,
            session_name: value.session_name,
            token: value.token,
            updated_at: value.updated_at,
        }
    }
}
