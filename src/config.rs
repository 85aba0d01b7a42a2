use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TASK_MINUTES: u32 = 5;
pub const DEFAULT_STUDY_MINUTES: u32 = 25;

/// Tick period of running countdowns and how long a finished task keeps
/// showing its completion banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub tick: Duration,
    pub completion_window: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            completion_window: Duration::from_secs(4),
        }
    }
}

impl Timing {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick: env_millis("WELLNESS_TICK_MS").unwrap_or(defaults.tick),
            completion_window: env_millis("WELLNESS_COMPLETION_WINDOW_MS")
                .unwrap_or(defaults.completion_window),
        }
    }
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_server_url() -> String {
    env::var("WELLNESS_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

pub fn resolve_data_path() -> PathBuf {
    env::var("APP_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/profile.json"))
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name).ok().as_deref().and_then(parse_millis)
}

/// Zero and anything that is not a whole number of milliseconds is rejected.
fn parse_millis(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}
