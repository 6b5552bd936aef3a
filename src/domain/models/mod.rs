pub mod campaign;
pub mod outcome;
pub mod recipient;
pub mod run;
pub mod session;

pub use campaign::{Campaign, CampaignStatus};
pub use outcome::{DeliveryOutcome, DeliveryStatus};
pub use recipient::Recipient;
pub use run::CampaignRun;
pub use session::GatewaySession;
