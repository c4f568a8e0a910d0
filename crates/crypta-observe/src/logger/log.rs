use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    Layer, Registry,
    fmt::{self, MakeWriter, format::FmtSpan, time::OffsetTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the output layer for `cfg.format` and install it globally behind the level filter.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if !cfg.format.is_available() {
        return Err(LoggerError::JournaldUnavailable);
    }
    let filter = cfg.level.filter()?;
    let output = match cfg.format {
        LoggerFormat::Text => text_layer(cfg, std::io::stdout),
        LoggerFormat::Json => json_layer(cfg, std::io::stdout),
        LoggerFormat::Journald => journald_layer()?,
    };

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .try_init()
        .map_err(install_error)
}

fn text_layer<W>(cfg: &LoggerConfig, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(cfg.use_color)
        .with_target(cfg.with_targets)
        .with_span_events(span_events(cfg))
        .with_timer(local_rfc3339())
        .boxed()
}

/// Event fields and the enclosing span's fields (`task_id`, `kind` inside a job)
/// land at the top level of each line, so log shippers can index them directly.
fn json_layer<W>(cfg: &LoggerConfig, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_span_events(span_events(cfg))
        .with_timer(local_rfc3339())
        .boxed()
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    tracing_journald::layer()
        .map(Layer::boxed)
        .map_err(|e| LoggerError::Setup(format!("journald: {e}")))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}

fn span_events(cfg: &LoggerConfig) -> FmtSpan {
    if cfg.span_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

// Both the dispatcher and the `log` bridge report a second install as "already ...".
fn install_error(e: TryInitError) -> LoggerError {
    let msg = e.to_string();
    if msg.contains("already") {
        LoggerError::AlreadyInstalled
    } else {
        LoggerError::Setup(msg)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use serde_json::Value;
    use tracing::{info, info_span};

    use super::*;
    use crate::logger::logger_init;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(layer: BoxedLayer, emit: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, emit);
    }

    #[test]
    fn json_lines_inline_the_job_span() {
        let out = Captured::default();
        let writer = out.clone();
        capture(json_layer(&LoggerConfig::default(), move || writer.clone()), || {
            let span = info_span!("job", task_id = "t-1", kind = "SOLVE");
            let _enter = span.enter();
            info!(results = 3, "job finished");
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let line: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(line["message"], "job finished");
        assert_eq!(line["results"], 3);
        assert_eq!(line["span"]["name"], "job");
        assert_eq!(line["span"]["task_id"], "t-1");
        assert_eq!(line["span"]["kind"], "SOLVE");
        assert!(line.get("spans").is_none());
    }

    #[test]
    fn span_timings_report_closed_jobs() {
        let out = Captured::default();
        let writer = out.clone();
        let cfg = LoggerConfig {
            use_color: false,
            ..LoggerConfig::default()
        }
        .with_span_timings(true);

        capture(text_layer(&cfg, move || writer.clone()), || {
            info_span!("job", task_id = "t-2").in_scope(|| {});
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("job{task_id=\"t-2\"}"));
        assert!(lines[0].contains("close"));
        assert!(lines[0].contains("time.busy"));
    }

    #[test]
    fn second_init_reports_already_installed() {
        let cfg = LoggerConfig::default().with_format(LoggerFormat::Json);
        // Another test in this binary may have installed the subscriber first.
        let _ = logger_init(&cfg);
        assert!(matches!(
            logger_init(&cfg),
            Err(LoggerError::AlreadyInstalled)
        ));
    }
}
