//! Specialist agents: fan-out results and the display catalog.

use serde::{Deserialize, Serialize};

use crate::message::Evidence;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fan-out results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One specialist's answer inside a fan-out response.  Ephemeral: it lives
/// as a pending result until written back as an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Evidence>,
    #[serde(default)]
    pub duration_ms: u64,
}

/// The full fan-out response for one user question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentFanout {
    /// Aggregate answer; the service currently leaves this empty and
    /// provides per-agent results only.
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub results: Vec<AgentResult>,
}

impl AgentFanout {
    /// Agent ids in first-seen result order, deduplicated.
    pub fn agent_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for r in &self.results {
            if !ids.iter().any(|a| a == &r.agent) {
                ids.push(r.agent.clone());
            }
        }
        ids
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Display catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Presentation metadata for a specialist agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentProfile {
    pub display_name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

const CATALOG: &[(&str, AgentProfile)] = &[
    (
        "veterinarian",
        AgentProfile {
            display_name: "Veterinary specialist",
            icon: "🩺",
            description: "Health and disease expertise",
        },
    ),
    (
        "behavior",
        AgentProfile {
            display_name: "Behavior specialist",
            icon: "🐕",
            description: "Behavior patterns and training",
        },
    ),
    (
        "nutrition",
        AgentProfile {
            display_name: "Nutrition specialist",
            icon: "🍖",
            description: "Diet and nutrition management",
        },
    ),
    (
        "report",
        AgentProfile {
            display_name: "Report specialist",
            icon: "📊",
            description: "Health data summaries and reports",
        },
    ),
    (
        "general",
        AgentProfile {
            display_name: "General advisor",
            icon: "💬",
            description: "General pet-care consultation",
        },
    ),
];

/// Look up the profile for an agent id; unknown ids fall back to `general`.
pub fn agent_profile(agent: Option<&str>) -> AgentProfile {
    let id = agent.unwrap_or("general");
    CATALOG
        .iter()
        .find(|(k, _)| *k == id)
        .or_else(|| CATALOG.iter().find(|(k, _)| *k == "general"))
        .map(|(_, p)| *p)
        .expect("catalog contains general")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_agent_falls_back_to_general() {
        let p = agent_profile(Some("astrologer"));
        assert_eq!(p.display_name, "General advisor");
    }

    #[test]
    fn agent_ids_preserve_first_seen_order() {
        let fanout = AgentFanout {
            answer: String::new(),
            results: vec![
                AgentResult {
                    agent: "nutrition".into(),
                    answer: "a".into(),
                    sources: vec![],
                    duration_ms: 10,
                },
                AgentResult {
                    agent: "veterinarian".into(),
                    answer: "b".into(),
                    sources: vec![],
                    duration_ms: 12,
                },
                AgentResult {
                    agent: "nutrition".into(),
                    answer: "c".into(),
                    sources: vec![],
                    duration_ms: 9,
                },
            ],
        };
        assert_eq!(fanout.agent_ids(), vec!["nutrition", "veterinarian"]);
    }
}
