use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The dog a conversation is scoped to.  Immutable while a conversation is
/// active; switching the active dog resets all conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub neutered: bool,
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
