use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Job category.
///
/// Informational only: it labels tasks in snapshots, logs and metrics,
/// and lets an engine router pick a backend. It never changes lifecycle behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    /// Solve a given cryptarithm.
    Solve,
    /// Generate cryptarithms from a word source.
    Generate,
}

impl JobKind {
    /// Short symbolic identifier, used as a log field and metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Solve => "SOLVE",
            JobKind::Generate => "GENERATE",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solve" => Ok(JobKind::Solve),
            "generate" => Ok(JobKind::Generate),
            _ => Err(ModelError::UnknownValue {
                field: "kind",
                value: s.to_string(),
            }),
        }
    }
}
