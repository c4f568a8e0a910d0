use tokio::sync::Semaphore;

use crate::error::CoreError;

/// Default admission capacity.
pub const DEFAULT_MAX_CONCURRENT: usize = 100;

/// Job runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Maximum number of jobs admitted at the same time.
    pub max_concurrent: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl RunnerConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_concurrent == 0 {
            return Err(CoreError::InvalidConfig(
                "max_concurrent must be at least 1".into(),
            ));
        }
        if self.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(CoreError::InvalidConfig(format!(
                "max_concurrent must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_one_hundred() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.max_concurrent, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let cfg = RunnerConfig::default().with_max_concurrent(0);
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
    }
}
