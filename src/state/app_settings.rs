use log::LevelFilter;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);
/// Anything faster would burn through a free provider quota in minutes.
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Refetch interval for match queries while something is live.
    pub poll_interval: Duration,
    /// Start with goal alerts switched on.
    pub notifications: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            notifications: false,
        }
    }
}

impl AppSettings {
    /// Read `KICKOFF_LOG`, `KICKOFF_POLL_INTERVAL` and `KICKOFF_NOTIFY`.
    pub fn load() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            full_screen: false,
            log_level: parse_log_level(var("KICKOFF_LOG").as_deref()),
            poll_interval: parse_poll_interval(var("KICKOFF_POLL_INTERVAL").as_deref()),
            notifications: parse_flag(var("KICKOFF_NOTIFY").as_deref()),
        }
    }
}

fn parse_log_level(value: Option<&str>) -> Option<LevelFilter> {
    value?.trim().parse().ok()
}

/// Milliseconds. Missing, malformed or zero values fall back to the default.
fn parse_poll_interval(value: Option<&str>) -> Duration {
    match value.and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(ms) if ms > 0 => Duration::from_millis(ms).max(MIN_POLL_INTERVAL),
        _ => DEFAULT_POLL_INTERVAL,
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
