use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::services::jwt::JwtService;
use crate::application::usecases::{
    cancel_campaign::CancelCampaignUseCase, create_campaign::CreateCampaignUseCase,
    dispatch_campaign::DispatchCampaignUseCase, get_campaign::GetCampaignUseCase,
    list_campaigns::ListCampaignsUseCase, register_session::RegisterSessionUseCase,
    schedule_campaign::ScheduleCampaignUseCase,
};

use super::{campaigns::CampaignsEndpoints, gateway::GatewayEndpoints, health::HealthEndpoints};

pub struct ApiState {
    pub create_campaign_usecase: Arc<CreateCampaignUseCase>,
    pub list_campaigns_usecase: Arc<ListCampaignsUseCase>,
    pub get_campaign_usecase: Arc<GetCampaignUseCase>,
    pub schedule_campaign_usecase: Arc<ScheduleCampaignUseCase>,
    pub dispatch_campaign_usecase: Arc<DispatchCampaignUseCase>,
    pub cancel_campaign_usecase: Arc<CancelCampaignUseCase>,
    pub register_session_usecase: Arc<RegisterSessionUseCase>,
    pub jwt: JwtService,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Campaigns,
    Gateway,
}

pub type Endpoints = (HealthEndpoints, CampaignsEndpoints, GatewayEndpoints);

pub fn endpoints(state: Arc<ApiState>) -> Endpoints {
    (
        HealthEndpoints,
        CampaignsEndpoints::new(state.clone()),
        GatewayEndpoints::new(state),
    )
}
