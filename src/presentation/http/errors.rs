use poem::http::StatusCode;
use poem_openapi::payload::Json;

use crate::{
    application::dispatch::DispatchError,
    domain::{errors::DomainError, models::CampaignRun},
    presentation::http::{mappers::map_run, responses::CampaignRunDto},
};

pub fn domain_error(err: anyhow::Error) -> poem::Error {
    let status = match err.downcast_ref::<DomainError>() {
        Some(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(DomainError::AlreadyExists(_) | DomainError::WrongStatus(_)) => StatusCode::CONFLICT,
        Some(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
        Some(DomainError::Forbidden(_)) => StatusCode::FORBIDDEN,
        Some(DomainError::Other(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
    };
    poem::Error::from_string(format!("{err:#}"), status)
}

pub fn dispatch_error(err: DispatchError) -> poem::Error {
    let status = match &err {
        DispatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DispatchError::InvalidState { .. } => StatusCode::CONFLICT,
        DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::Forbidden(_) => StatusCode::FORBIDDEN,
        DispatchError::RunFault(_) | DispatchError::Unpersisted { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    poem::Error::from_string(err.to_string(), status)
}

/// A finished run is always answered with its ledger, flagged when the store
/// did not take the final write.
pub fn dispatch_result(
    result: Result<CampaignRun, DispatchError>,
) -> poem::Result<Json<CampaignRunDto>> {
    match result {
        Ok(run) => Ok(Json(map_run(&run, true))),
        Err(DispatchError::Unpersisted { run, .. }) => Ok(Json(map_run(&run, false))),
        Err(err) => Err(dispatch_error(err)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{
        application::dispatch::{
            RecipientQueue, ResultAccumulator,
            lifecycle::{self, RunEnd},
        },
        domain::models::{Campaign, CampaignStatus, DeliveryOutcome, Recipient},
    };

    fn finished_run() -> CampaignRun {
        let recipients = vec![Recipient::new("111@c.us", false)];
        let campaign = Campaign::draft(
            Uuid::new_v4(),
            "launch".to_string(),
            "hello".to_string(),
            recipients.clone(),
            0,
        );
        let run = lifecycle::begin(&campaign, RecipientQueue::build(recipients).unwrap()).unwrap();
        let mut accumulator = ResultAccumulator::new(run);
        accumulator.record(DeliveryOutcome::success("111@c.us", Utc::now()));
        accumulator.finish(RunEnd::Drained).unwrap()
    }

    #[test]
    fn ownership_violations_are_forbidden() {
        let err = domain_error(DomainError::Forbidden("campaign".to_string()).into());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err = dispatch_error(DispatchError::Forbidden(Uuid::new_v4()));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn status_conflicts_map_to_409() {
        let err = domain_error(DomainError::WrongStatus(CampaignStatus::Running).into());
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = dispatch_error(DispatchError::InvalidState {
            campaign_id: Uuid::new_v4(),
            status: CampaignStatus::Running,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unpersisted_run_is_answered_with_its_ledger() {
        let run = finished_run();
        let result = Err(DispatchError::Unpersisted {
            status: run.status(),
            run: Box::new(run),
            cause: anyhow::anyhow!("connection reset"),
        });

        let Json(dto) = dispatch_result(result).unwrap();

        assert!(!dto.persisted);
        assert_eq!(dto.results.len(), 1);
        assert_eq!(dto.success_count, 1);
    }

    #[test]
    fn persisted_run_is_flagged() {
        let Json(dto) = dispatch_result(Ok(finished_run())).unwrap();
        assert!(dto.persisted);
    }
}
