use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite:lesson-recommender.db?mode=rwc";
const DEFAULT_TRACK: &str = "WEB";
const DEFAULT_WEEKLY_HOURS: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    /// Curriculum track served to learners.
    pub track: String,
    pub default_weekly_hours: u32,
    /// Curriculum JSON upserted at startup, if set.
    pub curriculum_seed: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let database_url = non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let track = non_empty_var("CURRICULUM_TRACK")
            .map(|t| t.to_uppercase())
            .unwrap_or_else(|| DEFAULT_TRACK.to_string());

        let default_weekly_hours = std::env::var("DEFAULT_WEEKLY_HOURS")
            .ok()
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_WEEKLY_HOURS);

        let curriculum_seed = non_empty_var("CURRICULUM_SEED").map(PathBuf::from);

        Self {
            host,
            port,
            log_level,
            database_url,
            track,
            default_weekly_hours,
            curriculum_seed,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
