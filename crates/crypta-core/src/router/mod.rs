use std::sync::Arc;

use tracing::{instrument, trace};

use crypta_model::{JobKind, JobSpec};

use crate::engine::{Engine, EngineError, EngineSummary, ResultSink};

/// Engine that dispatches each job to the first registered engine supporting its kind.
#[derive(Default)]
pub struct EngineRouter {
    engines: Vec<Arc<dyn Engine>>,
}

impl EngineRouter {
    #[inline]
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    #[inline]
    pub fn register(&mut self, engine: Arc<dyn Engine>) {
        self.engines.push(engine);
    }

    #[inline]
    pub fn with_engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.register(engine);
        self
    }

    pub fn pick(&self, kind: JobKind) -> Option<&Arc<dyn Engine>> {
        self.engines.iter().find(|e| e.supports(kind))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Engine for EngineRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    fn supports(&self, kind: JobKind) -> bool {
        self.pick(kind).is_some()
    }

    #[instrument(level = "trace", skip(self, spec, sink), fields(kind = %spec.kind()))]
    fn run(&self, spec: &JobSpec, sink: &mut dyn ResultSink) -> Result<EngineSummary, EngineError> {
        let engine = self
            .pick(spec.kind())
            .ok_or(EngineError::Unsupported(spec.kind()))?;

        trace!(engine = engine.name(), "engine picked");
        engine.run(spec, sink)
    }
}
