use anyhow::Context;
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone)]
pub struct JwtServiceConfig {
    pub secret: String,
}

/// Verifies bearer tokens minted by the account service. Both sides share
/// the HS256 secret.
#[derive(Clone)]
pub struct JwtService {
    decoding: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

impl JwtService {
    pub fn new(config: JwtServiceConfig) -> Self {
        Self {
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .context("failed to verify JWT")
    }
}
