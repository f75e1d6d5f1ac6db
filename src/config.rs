// src/config.rs

use std::{env, net::SocketAddr, time::Duration};
use dotenvy::dotenv;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_FETCH_CONCURRENCY: usize = 8;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the upstream exam API.
    pub api_base_url: Url,
    pub jwt_secret: String,
    /// Per-request timeout for upstream calls.
    pub fetch_timeout: Duration,
    /// Upper bound on simultaneous per-exam attempt fetches.
    pub fetch_concurrency: usize,
    pub listen_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = parse_base_url(&api_base_url)
            .unwrap_or_else(|e| panic!("API_BASE_URL is invalid: {}", e));

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let fetch_timeout_ms = env::var("FETCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);

        let fetch_concurrency = env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_CONCURRENCY);

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .expect("LISTEN_ADDR must be a socket address, e.g. 0.0.0.0:3000");

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            api_base_url,
            jwt_secret,
            fetch_timeout: Duration::from_millis(fetch_timeout_ms.max(1)),
            fetch_concurrency: fetch_concurrency.max(1),
            listen_addr,
            cors_origins,
            rust_log,
        }
    }
}

/// Accepts only absolute http(s) URLs.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
