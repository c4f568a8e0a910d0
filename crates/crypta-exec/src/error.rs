use thiserror::Error;

use crypta_core::EngineError;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("missing program")]
    MissingProgram,
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("non-zero exit code: {code}{}", tail(.stderr))]
    NonZeroExit { code: i32, stderr: String },
    #[error("killed by signal{}", tail(.stderr))]
    KilledBySignal { stderr: String },
}

fn tail(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl From<std::io::Error> for ExecError {
    fn from(e: std::io::Error) -> Self {
        ExecError::Io(e.to_string())
    }
}

impl From<ExecError> for EngineError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::NonZeroExit { .. } | ExecError::KilledBySignal { .. } => {
                EngineError::Solver(e.to_string())
            }
            other => EngineError::Backend(other.to_string()),
        }
    }
}
