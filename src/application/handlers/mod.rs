pub mod campaign_dispatcher;
pub mod scheduled_dispatch;
