use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError, models::GatewaySession, repositories::SessionRepository,
};

/// Session names become a path segment of every gateway call.
fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub struct RegisterSessionUseCase {
    repo: Arc<dyn SessionRepository>,
}

pub struct RegisterSessionRequest {
    pub user_id: Uuid,
    pub session_name: String,
    pub token: String,
}

impl RegisterSessionUseCase {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Replaces whatever session the user had before.
    pub async fn execute(&self, request: RegisterSessionRequest) -> anyhow::Result<GatewaySession> {
        let session_name = request.session_name.trim();
        if !is_valid_session_name(session_name) {
            return Err(DomainError::Validation(format!(
                "invalid session name '{}'",
                request.session_name
            ))
            .into());
        }

        self.repo
            .upsert(GatewaySession {
                user_id: request.user_id,
                session_name: session_name.to_string(),
                token: request.token,
                updated_at: Utc::now(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemorySessionRepository;

    fn request(session_name: &str) -> RegisterSessionRequest {
        RegisterSessionRequest {
            user_id: Uuid::new_v4(),
            session_name: session_name.to_string(),
            token: "tok".to_string(),
        }
    }

    #[tokio::test]
    async fn stores_trimmed_session_name() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let usecase = RegisterSessionUseCase::new(repo.clone());

        let session = usecase.execute(request(" acme-main_1 ")).await.unwrap();

        assert_eq!(session.session_name, "acme-main_1");
        let stored = repo.find_by_user(&session.user_id).await.unwrap().unwrap();
        assert_eq!(stored.session_name, "acme-main_1");
    }

    #[tokio::test]
    async fn rejects_names_that_escape_the_path_segment() {
        let usecase = RegisterSessionUseCase::new(Arc::new(InMemorySessionRepository::new()));

        for name in ["", "a/b", "..", "../admin", "a?b=1", "a#frag", "two words", "%2e%2e"] {
            let err = usecase.execute(request(name)).await.unwrap_err();
            assert!(
                matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))),
                "{name:?}"
            );
        }
    }
}
