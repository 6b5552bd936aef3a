use chrono::{DateTime, Utc};
use poem_openapi::Object;

#[derive(Object, Debug)]
pub struct RecipientDto {
    #[oai(validator(min_length = 1))]
    pub phone: String,
    pub name: Option<String>,
    #[oai(default)]
    pub is_group: bool,
}

#[derive(Object, Debug)]
pub struct CreateCampaignRequestDto {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,
    #[oai(validator(max_length = 4096))]
    pub message: String,
    #[oai(default)]
    pub recipients: Vec<RecipientDto>,
    /// Pause between two messages, in milliseconds.
    pub delay: Option<u64>,
}

#[derive(Object, Debug)]
pub struct ScheduleCampaignRequestDto {
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Object, Debug)]
pub struct RegisterSessionRequestDto {
    #[oai(validator(min_length = 1))]
    pub session_name: String,
    #[oai(validator(min_length = 1))]
    pub token: String,
}
