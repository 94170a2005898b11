//! Profile facts: auto-fill batches, proactive questions, reports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoCategory {
    Diet,
    Behavior,
}

impl std::fmt::Display for InfoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diet => write!(f, "diet"),
            Self::Behavior => write!(f, "behavior"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Boolean,
}

/// One profile fact the service extracted from conversation history.
/// A batch of these is displayed once and replaced by the next non-empty
/// batch, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFillUpdate {
    pub category: InfoCategory,
    pub key: String,
    pub question: String,
    #[serde(rename = "answer_text", default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A system-initiated question surfaced after conversational inactivity.
/// At most one is outstanding per dog at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProactiveQuestion {
    pub category: InfoCategory,
    pub key: String,
    pub question: String,
    pub question_type: QuestionType,
}

/// Metadata for a generated health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    pub filename: String,
    #[serde(default)]
    pub url_md: Option<String>,
    #[serde(default)]
    pub url_pdf: Option<String>,
}
