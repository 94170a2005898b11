use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub state: StateConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Care service connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request, when present.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "d_15000")]
    pub timeout_ms: u64,
    #[serde(default = "d_1")]
    pub user_id: i64,
    /// Page size for history loads.
    #[serde(default = "d_100")]
    pub history_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            auth_token: None,
            timeout_ms: 15_000,
            user_id: 1,
            history_limit: 100,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Progress pacing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Floor dwell times for the simulated progress phases.  The fan-out call
/// can return faster than a human can perceive "analysis", so each phase
/// holds for at least this long regardless of actual latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "d_800")]
    pub analyzing_ms: u64,
    #[serde(default = "d_600")]
    pub routing_ms: u64,
    /// Delay between successive agent reveals while responding.
    #[serde(default = "d_400")]
    pub reveal_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            analyzing_ms: 800,
            routing_ms: 600,
            reveal_ms: 400,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Engagement
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    /// Idle minutes since the last completed send before a proactive
    /// question may be surfaced.
    #[serde(default = "d_30")]
    pub idle_minutes: u32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self { idle_minutes: 30 }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client-side state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding the durable activity timestamps.
    #[serde(default = "d_state_path")]
    pub state_path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_path: d_state_path(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Default value helpers (serde)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn d_base_url() -> String {
    "http://localhost:8000".into()
}
fn d_15000() -> u64 {
    15_000
}
fn d_1() -> i64 {
    1
}
fn d_100() -> u32 {
    100
}
fn d_800() -> u64 {
    800
}
fn d_600() -> u64 {
    600
}
fn d_400() -> u64 {
    400
}
fn d_30() -> u32 {
    30
}
fn d_state_path() -> PathBuf {
    PathBuf::from("./data/state")
}
