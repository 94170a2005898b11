//! Pacing policy for the simulated progress reveal.
//!
//! The fan-out call may return faster than a human can perceive
//! "analysis", so each phase holds for a floor dwell time.  The policy is
//! injected into the orchestrator; tests substitute [`PacingPolicy::zero`]
//! without touching orchestration logic.

use std::time::Duration;

use pt_domain::config::PacingConfig;

use crate::state::Phase;

#[derive(Debug, Clone, Copy)]
pub struct PacingPolicy {
    pub analyzing: Duration,
    pub routing: Duration,
    /// Delay between successive agent reveals while responding.
    pub reveal: Duration,
}

impl PacingPolicy {
    pub fn from_config(cfg: &PacingConfig) -> Self {
        Self {
            analyzing: Duration::from_millis(cfg.analyzing_ms),
            routing: Duration::from_millis(cfg.routing_ms),
            reveal: Duration::from_millis(cfg.reveal_ms),
        }
    }

    /// No delays at all, for tests.
    pub fn zero() -> Self {
        Self {
            analyzing: Duration::ZERO,
            routing: Duration::ZERO,
            reveal: Duration::ZERO,
        }
    }

    /// Dwell floor for a phase.  `None` and `Responding` have no phase-wide
    /// dwell; responding is paced per reveal instead.
    pub fn dwell(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Analyzing => self.analyzing,
            Phase::Routing => self.routing,
            Phase::Responding | Phase::None => Duration::ZERO,
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dwell_table_follows_config() {
        let policy = PacingPolicy::from_config(&PacingConfig::default());
        assert_eq!(policy.dwell(Phase::Analyzing), Duration::from_millis(800));
        assert_eq!(policy.dwell(Phase::Routing), Duration::from_millis(600));
        assert_eq!(policy.dwell(Phase::None), Duration::ZERO);
        assert_eq!(policy.reveal, Duration::from_millis(400));
    }
}
