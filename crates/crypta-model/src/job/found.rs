use serde::{Deserialize, Serialize};

/// One result reported by an engine: the candidate and its solution.
///
/// For a solve job `node` is the evaluated cryptarithm; for a generate job
/// it is the generated cryptarithm itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Found {
    pub node: String,
    pub solution: String,
    /// Outcome of the engine's own solution check, when one was requested.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Found {
    pub fn new(node: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            solution: solution.into(),
            valid: true,
        }
    }
}
