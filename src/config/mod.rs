use std::env;
use std::time::Duration;

use crate::storage::UrlStyle;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Runtime configuration, read once at startup. Required variables panic
/// with a clear message; optional ones fall back to defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub s3_bucket: String,
    pub url_style: UrlStyle,
    pub signed_url_ttl: Duration,
    pub call_timeout: Duration,
    pub max_photo_bytes: usize,
}

impl Config {
    pub fn from_env() -> Config {
        let url_style = match env::var("PHOTO_URL_STYLE") {
            Ok(value) => UrlStyle::parse(&value)
                .unwrap_or_else(|| panic!("PHOTO_URL_STYLE must be `public` or `signed`, got `{}`", value)),
            Err(_) => UrlStyle::Public,
        };

        Config {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            s3_bucket: env::var("AWS_S3_BUCKET").expect("AWS_S3_BUCKET must be set"),
            url_style,
            signed_url_ttl: Duration::from_secs(env_u64("SIGNED_URL_TTL_SECS", DEFAULT_SIGNED_URL_TTL_SECS)),
            call_timeout: Duration::from_secs(env_u64("EXTERNAL_CALL_TIMEOUT_SECS", DEFAULT_CALL_TIMEOUT_SECS)),
            max_photo_bytes: env_u64("MAX_PHOTO_BYTES", DEFAULT_MAX_PHOTO_BYTES as u64) as usize,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a positive integer, got `{}`", name, value)),
        Err(_) => default,
    }
}
