pub mod gateway;
pub mod jwt;
