use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use clap::Parser;
use tracing::{info, warn};

use crypta_api::{HttpApi, RunnerApiAdapter};
use crypta_core::{EngineRouter, JobRunner, RunnerConfig, arch, init_uptime, platform};
use crypta_exec::{ProcConfig, ProcessEngine};
use crypta_model::JobKind;
use crypta_observe::{LoggerConfig, logger_init};
use crypta_prometheus::PrometheusMetrics;

mod config;
use config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_uptime();

    // 1) Logger
    let cfg = LoggerConfig::default()
        .with_level(cli.log_level.clone())
        .with_format(cli.log_format)
        .with_span_timings(cli.log_span_timings);
    logger_init(&cfg)?;
    info!(platform = platform(), arch = arch(), "logger initialized");

    // 2) Engines
    let engines = engines(&cli);
    if engines.is_empty() {
        warn!("no engine configured; every job will fail (set CRYPTA_SOLVE_ENGINE / CRYPTA_GENERATE_ENGINE)");
    }

    // 3) Runner + metrics
    let metrics = PrometheusMetrics::new()?;
    let runner = JobRunner::new(
        Arc::new(engines),
        RunnerConfig::default().with_max_concurrent(cli.max_concurrent),
    )?
    .with_metrics(Arc::new(metrics.clone()));
    info!(capacity = cli.max_concurrent, "job runner ready");

    // 4) HTTP
    let api = HttpApi::new(Arc::new(RunnerApiAdapter::new(runner))).router();
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(api);

    let addr = cli.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "http api listening");
    info!("press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down...");
        })
        .await?;

    Ok(())
}

fn engines(cli: &Cli) -> EngineRouter {
    let mut router = EngineRouter::new();
    if let Some(program) = &cli.solve_engine {
        let cfg = ProcConfig::new(program)
            .with_args(cli.solve_args.iter().cloned())
            .with_kinds([JobKind::Solve]);
        router.register(Arc::new(ProcessEngine::new(cfg).with_name("solve-proc")));
        info!(%program, "solve engine registered");
    }
    if let Some(program) = &cli.generate_engine {
        let cfg = ProcConfig::new(program)
            .with_args(cli.generate_args.iter().cloned())
            .with_kinds([JobKind::Generate]);
        router.register(Arc::new(ProcessEngine::new(cfg).with_name("generate-proc")));
        info!(%program, "generate engine registered");
    }
    router
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    match metrics.encode_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}
