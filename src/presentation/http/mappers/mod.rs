use crate::{
    domain::models::{Campaign, CampaignRun, DeliveryOutcome, GatewaySession, Recipient},
    presentation::http::{
        requests::RecipientDto,
        responses::{
            CampaignDto, CampaignRunDto, DeliveryResultDto, GatewaySessionDto,
            RecipientResponseDto,
        },
    },
};

pub fn map_recipient_request(dto: &RecipientDto) -> Recipient {
    Recipient {
        address: dto.phone.trim().to_string(),
        display_name: dto.name.clone(),
        is_group: dto.is_group,
    }
}

pub fn map_outcome(outcome: &DeliveryOutcome) -> DeliveryResultDto {
    DeliveryResultDto {
        recipient: outcome.recipient.clone(),
        status: outcome.status.into(),
        sent_at: outcome.sent_at.to_rfc3339(),
        error: outcome.error.clone(),
    }
}

pub fn map_campaign(campaign: &Campaign) -> CampaignDto {
    CampaignDto {
        id: campaign.id,
        name: campaign.name.clone(),
        message: campaign.message.clone(),
        recipients: campaign
            .recipients
            .iter()
            .map(|r| RecipientResponseDto {
                phone: r.address.clone(),
                name: r.display_name.clone(),
                is_group: r.is_group,
            })
            .collect(),
        status: campaign.status.into(),
        delay: campaign.delay_ms,
        scheduled_at: campaign.scheduled_at.map(|at| at.to_rfc3339()),
        total_recipients: campaign.total_recipients,
        success_count: campaign.success_count,
        failure_count: campaign.failure_count,
        results: campaign.results.iter().map(map_outcome).collect(),
        created_at: campaign.created_at.to_rfc3339(),
        updated_at: campaign.updated_at.to_rfc3339(),
    }
}

pub fn map_run(run: &CampaignRun, persisted: bool) -> CampaignRunDto {
    CampaignRunDto {
        campaign_id: run.campaign_id(),
        status: run.status().into(),
        total_recipients: run.total_recipients(),
        success_count: run.success_count(),
        failure_count: run.failure_count(),
        results: run.ledger().iter().map(map_outcome).collect(),
        started_at: run.started_at().map(|at| at.to_rfc3339()),
        finished_at: run.finished_at().map(|at| at.to_rfc3339()),
        fault: run.fault().map(str::to_string),
        persisted,
    }
}

pub fn map_session(session: &GatewaySession) -> GatewaySessionDto {
    GatewaySessionDto {
        session_name: session.session_name.clone(),
        updated_at: session.updated_at.to_rfc3339(),
    }
}
