//! The conversation core: state container, send orchestrator, pacing
//! policy, and the two background side effects (profile auto-fill and
//! inactivity-triggered prompting).
//!
//! Everything here assumes single-threaded cooperative scheduling: remote
//! calls and pacing delays are the only suspension points, and state
//! mutations happen synchronously between them.

pub mod activity;
pub mod autofill;
pub mod engagement;
pub mod orchestrator;
pub mod pacing;
pub mod state;

pub use activity::ActivityStore;
pub use autofill::AutoFillTrigger;
pub use engagement::EngagementScheduler;
pub use orchestrator::{SendOrchestrator, SendOutcome};
pub use pacing::PacingPolicy;
pub use state::{ConversationState, Phase};
