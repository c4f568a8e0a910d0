//! Command line and environment configuration.
//!
//! ```bash
//! CRYPTA_PORT=8080 CRYPTA_SOLVE_ENGINE=/opt/cryptator/solve ./http-server
//! ```
use clap::Parser;

use crypta_core::config::DEFAULT_MAX_CONCURRENT;
use crypta_observe::{LoggerFormat, LoggerLevel};

#[derive(Debug, Clone, Parser)]
#[command(name = "http-server")]
#[command(about = "HTTP front end for cryptarithm solve and generate jobs")]
#[command(version)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0", env = "CRYPTA_HOST")]
    pub host: String,

    #[arg(short, long, default_value_t = 8080, env = "CRYPTA_PORT")]
    pub port: u16,

    /// Maximum number of jobs running at once; further submissions get 429.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT, env = "CRYPTA_MAX_CONCURRENT")]
    pub max_concurrent: usize,

    /// Log filter, e.g. `info` or `crypta_core=debug,info`.
    #[arg(long, default_value = "info", env = "CRYPTA_LOG_LEVEL")]
    pub log_level: LoggerLevel,

    /// text | json | journald
    #[arg(long, default_value = "text", env = "CRYPTA_LOG_FORMAT")]
    pub log_format: LoggerFormat,

    /// Log busy/idle time for every finished job.
    #[arg(long, env = "CRYPTA_LOG_SPAN_TIMINGS")]
    pub log_span_timings: bool,

    /// Program that runs solve jobs.
    #[arg(long, env = "CRYPTA_SOLVE_ENGINE")]
    pub solve_engine: Option<String>,

    /// Extra argument for the solve program (repeatable).
    #[arg(long = "solve-arg", allow_hyphen_values = true)]
    pub solve_args: Vec<String>,

    /// Program that runs generate jobs.
    #[arg(long, env = "CRYPTA_GENERATE_ENGINE")]
    pub generate_engine: Option<String>,

    /// Extra argument for the generate program (repeatable).
    #[arg(long = "generate-arg", allow_hyphen_values = true)]
    pub generate_args: Vec<String>,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
