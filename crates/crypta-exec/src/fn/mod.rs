use crypta_core::{Engine, EngineError, EngineSummary, ResultSink};
use crypta_model::{JobKind, JobSpec};

type EngineFn =
    dyn Fn(&JobSpec, &mut dyn ResultSink) -> Result<EngineSummary, EngineError> + Send + Sync;

/// Engine backed by an in-process function.
///
/// Useful for embedding a search library directly, and for tests.
pub struct FnEngine {
    name: &'static str,
    kinds: Vec<JobKind>,
    func: Box<EngineFn>,
}

impl FnEngine {
    /// Engine that handles every job kind.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&JobSpec, &mut dyn ResultSink) -> Result<EngineSummary, EngineError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: "fn",
            kinds: vec![JobKind::Solve, JobKind::Generate],
            func: Box::new(func),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn with_kinds(mut self, kinds: impl Into<Vec<JobKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }
}

impl Engine for FnEngine {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, kind: JobKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn run(&self, spec: &JobSpec, sink: &mut dyn ResultSink) -> Result<EngineSummary, EngineError> {
        (self.func)(spec, sink)
    }
}
