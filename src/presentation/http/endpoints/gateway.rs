use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::register_session::RegisterSessionRequest,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        errors::domain_error,
        mappers::map_session,
        requests::RegisterSessionRequestDto,
        responses::GatewaySessionDto,
        security::JwtAuth,
    },
};

#[derive(Clone)]
pub struct GatewayEndpoints {
    state: Arc<ApiState>,
}

impl GatewayEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl GatewayEndpoints {
    #[oai(path = "/gateway/session", method = "put", tag = EndpointsTags::Gateway)]
    pub async fn register_session(
        &self,
        auth: JwtAuth,
        request: Json<RegisterSessionRequestDto>,
    ) -> poem::Result<Json<GatewaySessionDto>> {
        let user = auth.into_user(&self.state.jwt)?;

        let session = self
            .state
            .register_session_usecase
            .execute(RegisterSessionRequest {
                user_id: user.user_id,
                session_name: request.session_name.clone(),
                token: request.token.clone(),
            })
            .await
            .map_err(domain_error)?;

        Ok(Json(map_session(&session)))
    }
}
