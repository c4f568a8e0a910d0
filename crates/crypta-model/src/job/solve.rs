use serde::{Deserialize, Serialize};

use crate::ModelError;

const DEFAULT_SOLVER: &str = "SCALAR";
const DEFAULT_BASE: u32 = 10;

/// Parameters of a solve job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolveSpec {
    /// Cryptarithm in the engine's textual syntax, e.g. `send+more=money`.
    pub cryptarithm: String,
    /// Engine-specific solver selector.
    pub solver_type: String,
    /// Maximum number of solutions; `0` means unlimited.
    pub solution_limit: u32,
    /// Search time limit in seconds, enforced by the engine; `0` means none.
    #[serde(alias = "timeLimit")]
    pub time_limit_secs: u32,
    pub arithmetic_base: u32,
    pub check_solution: bool,
    pub allow_leading_zeros: bool,
    pub horner_scheme: bool,
}

impl SolveSpec {
    pub fn new(cryptarithm: impl Into<String>) -> Self {
        Self {
            cryptarithm: cryptarithm.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.cryptarithm.trim().is_empty() {
            return Err(ModelError::EmptyCryptarithm);
        }
        if !(2..=36).contains(&self.arithmetic_base) {
            return Err(ModelError::InvalidBase(self.arithmetic_base));
        }
        Ok(())
    }
}

impl Default for SolveSpec {
    fn default() -> Self {
        Self {
            cryptarithm: String::new(),
            solver_type: DEFAULT_SOLVER.to_string(),
            solution_limit: 0,
            time_limit_secs: 0,
            arithmetic_base: DEFAULT_BASE,
            check_solution: false,
            allow_leading_zeros: false,
            horner_scheme: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let spec: SolveSpec = serde_json::from_str(r#"{"cryptarithm":"a+b=c"}"#).unwrap();
        assert_eq!(spec.solver_type, "SCALAR");
        assert_eq!(spec.arithmetic_base, 10);
        assert_eq!(spec.solution_limit, 0);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn time_limit_accepts_legacy_name() {
        let spec: SolveSpec =
            serde_json::from_str(r#"{"cryptarithm":"a+b=c","timeLimit":30}"#).unwrap();
        assert_eq!(spec.time_limit_secs, 30);
    }

    #[test]
    fn blank_cryptarithm_is_rejected() {
        assert_eq!(
            SolveSpec::new("   ").validate(),
            Err(ModelError::EmptyCryptarithm)
        );
    }

    #[test]
    fn base_out_of_range_is_rejected() {
        let spec = SolveSpec {
            arithmetic_base: 1,
            ..SolveSpec::new("a+b=c")
        };
        assert_eq!(spec.validate(), Err(ModelError::InvalidBase(1)));
    }
}
