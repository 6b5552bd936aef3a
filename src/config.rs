use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub jwt_secret: String,
    pub gateway_url: String,
    pub gateway_timeout: Duration,
    pub database_url: Option<String>,
    pub default_delay_ms: u64,
    pub persist_progress: bool,
    pub scheduler_interval: Duration,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        Ok(Config {
            port: var("PORT")
                .map_err(|_| "An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            scheme: var("SCHEME").map_err(|_| "An error occured while getting SCHEME env param")?,
            host: var("HOST").map_err(|_| "An error occured while getting HOST env param")?,
            jwt_secret: var("JWT_SECRET")
                .map_err(|_| "An error occured while getting JWT_SECRET env param")?,
            gateway_url: var("GATEWAY_URL")
                .map_err(|_| "An error occured while getting GATEWAY_URL env param")?,
            gateway_timeout: Duration::from_secs(parse_or(
                "GATEWAY_TIMEOUT_SECS",
                30,
                "An error occured while parsing GATEWAY_TIMEOUT_SECS env param",
            )?),
            database_url: var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            default_delay_ms: parse_or(
                "DEFAULT_DELAY_MS",
                3000,
                "An error occured while parsing DEFAULT_DELAY_MS env param",
            )?,
            persist_progress: parse_or(
                "PERSIST_PROGRESS",
                true,
                "An error occured while parsing PERSIST_PROGRESS env param",
            )?,
            scheduler_interval: Duration::from_secs(parse_or(
                "SCHEDULER_INTERVAL_SECS",
                30,
                "An error occured while parsing SCHEDULER_INTERVAL_SECS env param",
            )?)
            .max(Duration::from_secs(1)),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    default: T,
    error: &'static str,
) -> Result<T, &'static str> {
    match var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| error),
        Err(_) => Ok(default),
    }
}
