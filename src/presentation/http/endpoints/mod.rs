pub mod campaigns;
pub mod gateway;
pub mod health;
pub mod root;
