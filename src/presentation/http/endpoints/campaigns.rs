use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};
use uuid::Uuid;

use crate::{
    application::usecases::{
        cancel_campaign::CancelCampaignRequest, create_campaign::CreateCampaignRequest,
        dispatch_campaign::DispatchCampaignRequest, schedule_campaign::ScheduleCampaignRequest,
    },
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::{dispatch_error, dispatch_result, domain_error},
        mappers::{map_campaign, map_recipient_request},
        requests::{CreateCampaignRequestDto, ScheduleCampaignRequestDto},
        responses::{CampaignDto, CampaignRunDto},
        security::JwtAuth,
    },
};

#[derive(Clone)]
pub struct CampaignsEndpoints {
    state: Arc<ApiState>,
}

impl CampaignsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl CampaignsEndpoints {
    #[oai(
        path = "/campaigns",
        method = "post",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn create_campaign(
        &self,
        auth: JwtAuth,
        request: Json<CreateCampaignRequestDto>,
    ) -> poem::Result<Json<CampaignDto>> {
        let user = auth.into_user(&self.state.jwt)?;
        let payload = CreateCampaignRequest {
            user_id: user.user_id,
            name: request.name.clone(),
            message: request.message.clone(),
            recipients: request.recipients.iter().map(map_recipient_request).collect(),
            delay_ms: request.delay,
        };

        let campaign = self
            .state
            .create_campaign_usecase
            .execute(payload)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_campaign(&campaign)))
    }

    #[oai(
        path = "/campaigns",
        method = "get",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn list_campaigns(&self, auth: JwtAuth) -> poem::Result<Json<Vec<CampaignDto>>> {
        let user = auth.into_user(&self.state.jwt)?;

        let campaigns = self
            .state
            .list_campaigns_usecase
            .execute(user.user_id)
            .await
            .map_err(domain_error)?;

        Ok(Json(campaigns.iter().map(map_campaign).collect()))
    }

    #[oai(
        path = "/campaigns/:campaign_id",
        method = "get",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn get_campaign(
        &self,
        auth: JwtAuth,
        campaign_id: Path<Uuid>,
    ) -> poem::Result<Json<CampaignDto>> {
        let user = auth.into_user(&self.state.jwt)?;

        let campaign = self
            .state
            .get_campaign_usecase
            .execute(campaign_id.0, user.user_id)
            .await
            .map_err(domain_error)?;

        Ok(Json(map_campaign(&campaign)))
    }

    #[oai(
        path = "/campaigns/:campaign_id/schedule",
        method = "post",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn schedule_campaign(
        &self,
        auth: JwtAuth,
        campaign_id: Path<Uuid>,
        request: Json<ScheduleCampaignRequestDto>,
    ) -> poem::Result<Json<CampaignDto>> {
        let user = auth.into_user(&self.state.jwt)?;

        let campaign = self
            .state
            .schedule_campaign_usecase
            .execute(ScheduleCampaignRequest {
                user_id: user.user_id,
                campaign_id: campaign_id.0,
                scheduled_at: request.scheduled_at,
            })
            .await
            .map_err(domain_error)?;

        Ok(Json(map_campaign(&campaign)))
    }

    /// Sends the campaign now. Responds once every recipient was processed.
    #[oai(
        path = "/campaigns/:campaign_id/dispatch",
        method = "post",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn dispatch_campaign(
        &self,
        auth: JwtAuth,
        campaign_id: Path<Uuid>,
    ) -> poem::Result<Json<CampaignRunDto>> {
        let user = auth.into_user(&self.state.jwt)?;

        let result = self
            .state
            .dispatch_campaign_usecase
            .execute(DispatchCampaignRequest {
                user_id: user.user_id,
                campaign_id: campaign_id.0,
            })
            .await;

        dispatch_result(result)
    }

    #[oai(
        path = "/campaigns/:campaign_id/cancel",
        method = "post",
        tag = EndpointsTags::Campaigns,
    )]
    pub async fn cancel_campaign(&self, auth: JwtAuth, campaign_id: Path<Uuid>) -> poem::Result<()> {
        let user = auth.into_user(&self.state.jwt)?;

        self.state
            .cancel_campaign_usecase
            .execute(CancelCampaignRequest {
                user_id: user.user_id,
                campaign_id: campaign_id.0,
            })
            .await
            .map_err(dispatch_error)?;

        Ok(())
    }
}
