use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use crypta_core::MetricsBackend;
use crypta_model::JobKind;

/// Search jobs range from milliseconds to minutes.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.025, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0,
];

/// Prometheus-backed [`MetricsBackend`] with its own [`Registry`].
///
/// Cheap to clone; clones update the same metrics.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    admitted: IntCounterVec,
    rejected: IntCounterVec,
    finished: IntCounterVec,
    duration: HistogramVec,
    registered: IntGauge,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register the metrics into an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let admitted = IntCounterVec::new(
            Opts::new("crypta_jobs_admitted_total", "Jobs that got an admission slot"),
            &["kind"],
        )?;
        let rejected = IntCounterVec::new(
            Opts::new(
                "crypta_jobs_rejected_total",
                "Jobs rejected because all admission slots were taken",
            ),
            &["kind"],
        )?;
        let finished = IntCounterVec::new(
            Opts::new("crypta_jobs_finished_total", "Admitted jobs by terminal outcome"),
            &["kind", "outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new("crypta_job_duration_seconds", "Job run time")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["kind"],
        )?;
        let registered = IntGauge::new("crypta_tasks_registered", "Currently registered tasks")?;

        registry.register(Box::new(admitted.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(finished.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(registered.clone()))?;

        Ok(Self {
            registry,
            admitted,
            rejected,
            finished,
            duration,
            registered,
        })
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn job_admitted(&self, kind: JobKind) {
        self.admitted.with_label_values(&[kind.as_str()]).inc();
    }

    fn job_rejected(&self, kind: JobKind) {
        self.rejected.with_label_values(&[kind.as_str()]).inc();
    }

    fn job_finished(&self, kind: JobKind, outcome: &'static str, elapsed: Duration) {
        self.finished
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
        self.duration
            .with_label_values(&[kind.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    fn tasks_registered(&self, count: usize) {
        self.registered.set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crypta_core::{
        Engine, EngineError, EngineSummary, JobRunner, ResultSink, RunnerConfig, SubmitRequest,
    };
    use crypta_model::{Found, JobSpec, SolveSpec};

    use super::*;

    struct Two;

    impl Engine for Two {
        fn name(&self) -> &'static str {
            "two"
        }

        fn supports(&self, _kind: JobKind) -> bool {
            true
        }

        fn run(
            &self,
            _spec: &JobSpec,
            sink: &mut dyn ResultSink,
        ) -> Result<EngineSummary, EngineError> {
            sink.accept(Found::new("a", "1"))?;
            sink.accept(Found::new("b", "2"))?;
            Ok(EngineSummary::exhausted())
        }
    }

    #[test]
    fn runner_events_are_counted() {
        let metrics = PrometheusMetrics::new().unwrap();
        let runner = JobRunner::new(Arc::new(Two), RunnerConfig::default())
            .unwrap()
            .with_metrics(Arc::new(metrics.clone()));

        runner.submit(SubmitRequest::new(SolveSpec::new("a+b=c")));
        runner.submit(SubmitRequest::new(SolveSpec::new("  ")));

        let text = metrics.encode_text().unwrap();
        assert!(text.contains(r#"crypta_jobs_admitted_total{kind="SOLVE"} 2"#));
        assert!(text.contains(r#"crypta_jobs_finished_total{kind="SOLVE",outcome="success"} 1"#));
        assert!(text.contains(r#"crypta_jobs_finished_total{kind="SOLVE",outcome="failed"} 1"#));
        assert!(text.contains(r#"crypta_job_duration_seconds_count{kind="SOLVE"} 2"#));
        assert!(text.contains("crypta_tasks_registered 0"));
    }

    #[test]
    fn rejections_use_the_kind_label() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.job_rejected(JobKind::Generate);
        metrics.job_rejected(JobKind::Generate);

        let text = metrics.encode_text().unwrap();
        assert!(text.contains(r#"crypta_jobs_rejected_total{kind="GENERATE"} 2"#));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}
