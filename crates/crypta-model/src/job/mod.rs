mod solve;
pub use solve::SolveSpec;

mod generate;
pub use generate::{GenerateOp, GenerateSpec, RightMemberType};

mod found;
pub use found::Found;

mod report;
pub use report::{JobOutcome, JobReport};

use serde::{Deserialize, Serialize};

use crate::{JobKind, ModelError};

/// Problem description handed to an engine.
///
/// Opaque to the lifecycle layer apart from `kind()` and `result_limit()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobSpec {
    Solve(SolveSpec),
    Generate(GenerateSpec),
}

impl JobSpec {
    pub fn kind(&self) -> JobKind {
        match self {
            JobSpec::Solve(_) => JobKind::Solve,
            JobSpec::Generate(_) => JobKind::Generate,
        }
    }

    /// Maximum number of results the caller wants back. `None` means unlimited.
    pub fn result_limit(&self) -> Option<usize> {
        let limit = match self {
            JobSpec::Solve(s) => s.solution_limit,
            JobSpec::Generate(g) => g.solution_limit,
        };
        (limit > 0).then_some(limit as usize)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            JobSpec::Solve(s) => s.validate(),
            JobSpec::Generate(g) => g.validate(),
        }
    }
}

impl From<SolveSpec> for JobSpec {
    fn from(spec: SolveSpec) -> Self {
        JobSpec::Solve(spec)
    }
}

impl From<GenerateSpec> for JobSpec {
    fn from(spec: GenerateSpec) -> Self {
        JobSpec::Generate(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_means_unlimited() {
        let spec = JobSpec::from(SolveSpec::new("send+more=money"));
        assert_eq!(spec.result_limit(), None);

        let spec = JobSpec::from(SolveSpec {
            solution_limit: 3,
            ..SolveSpec::new("a+b=c")
        });
        assert_eq!(spec.result_limit(), Some(3));
    }

    #[test]
    fn wire_format_is_adjacently_tagged() {
        let spec = JobSpec::from(SolveSpec::new("send+more=money"));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "SOLVE");
        assert_eq!(json["params"]["cryptarithm"], "send+more=money");
        assert_eq!(json["params"]["arithmeticBase"], 10);
    }
}
