//! External engine driven as a child process.
//!
//! ## Protocol
//! - The job's [`JobSpec`] is written to the child's stdin as JSON, then stdin is closed.
//! - The child prints one JSON object per stdout line:
//!   `{"type":"result","node":..,"solution":..,"valid":..}` for every result, or
//!   `{"type":"error","kind":"parse|model|solver","message":..}` to fail the job.
//! - Exit status 0 means the search space was exhausted.
//!
//! On cancellation or a reached result limit the child is killed and reaped.
use std::{
    io::{BufRead, BufReader},
    path::PathBuf,
    process::{Child, Stdio},
};

use serde::Deserialize;
use tracing::{debug, trace};

use crypta_core::{Engine, EngineError, EngineSummary, Flow, ResultSink};
use crypta_model::{Found, JobKind, JobSpec};

use crate::{
    error::ExecError,
    util::{cmd_program, drain_tail, feed_stdin, finish_writer, kill_and_reap},
};

/// Process configuration, fixed per engine instance.
#[derive(Clone, Debug)]
pub struct ProcConfig {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// Job kinds this program handles.
    pub kinds: Vec<JobKind>,
}

impl Default for ProcConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            kinds: vec![JobKind::Solve, JobKind::Generate],
        }
    }
}

impl ProcConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kinds(mut self, kinds: impl Into<Vec<JobKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Message {
    Result(Found),
    Error { kind: FailureKind, message: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum FailureKind {
    Parse,
    Model,
    Solver,
}

enum Ended {
    Eof,
    Stopped,
}

/// Engine backed by an external program.
pub struct ProcessEngine {
    name: &'static str,
    cfg: ProcConfig,
}

impl ProcessEngine {
    pub fn new(cfg: ProcConfig) -> Self {
        Self { name: "proc", cfg }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn config(&self) -> &ProcConfig {
        &self.cfg
    }

    fn spawn(&self) -> Result<Child, ExecError> {
        if self.cfg.program.trim().is_empty() {
            return Err(ExecError::MissingProgram);
        }

        let mut cmd = cmd_program(&self.cfg.program, &self.cfg.args);
        if let Some(cwd) = &self.cfg.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &self.cfg.env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        trace!(program = %self.cfg.program, args = ?self.cfg.args, "spawn");
        cmd.spawn()
            .map_err(|e| ExecError::Spawn(format!("{}: {e}", self.cfg.program)))
    }

    fn pump(
        reader: impl BufRead,
        sink: &mut dyn ResultSink,
    ) -> Result<Ended, EngineError> {
        for line in reader.lines() {
            let line = line.map_err(ExecError::from)?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let message: Message = serde_json::from_str(line)
                .map_err(|e| ExecError::Protocol(format!("{e}: {line}")))?;
            match message {
                Message::Result(found) => {
                    if sink.accept(found)? == Flow::Stop {
                        return Ok(Ended::Stopped);
                    }
                }
                Message::Error { kind, message } => {
                    return Err(match kind {
                        FailureKind::Parse => EngineError::Parse(message),
                        FailureKind::Model => EngineError::Model(message),
                        FailureKind::Solver => EngineError::Solver(message),
                    });
                }
            }
        }
        Ok(Ended::Eof)
    }
}

impl Engine for ProcessEngine {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, kind: JobKind) -> bool {
        self.cfg.kinds.contains(&kind)
    }

    fn run(&self, spec: &JobSpec, sink: &mut dyn ResultSink) -> Result<EngineSummary, EngineError> {
        let request = serde_json::to_vec(spec).map_err(|e| ExecError::Protocol(e.to_string()))?;
        let mut child = self.spawn()?;

        // Stderr and stdin run on their own threads while stdout is pumped here.
        let stderr = child.stderr.take().map(drain_tail);
        let writer = child.stdin.take().map(|stdin| feed_stdin(stdin, request));
        let Some(stdout) = child.stdout.take() else {
            kill_and_reap(&mut child);
            let _ = finish_writer(writer);
            return Err(ExecError::Io("child stdout not captured".into()).into());
        };

        match Self::pump(BufReader::new(stdout), sink) {
            Ok(Ended::Eof) => {}
            Ok(Ended::Stopped) => {
                debug!(engine = self.name, "result limit reached; stopping child");
                kill_and_reap(&mut child);
                let _ = finish_writer(writer);
                return Ok(EngineSummary::stopped());
            }
            Err(e) => {
                if e == EngineError::Cancelled {
                    debug!(engine = self.name, "cancelled; killing child");
                }
                kill_and_reap(&mut child);
                let _ = finish_writer(writer);
                return Err(e);
            }
        }

        let status = child.wait().map_err(ExecError::from)?;
        let written = finish_writer(writer);
        let stderr = stderr
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default();

        if status.success() {
            written?;
            debug!(engine = self.name, "search exhausted");
            return Ok(EngineSummary::exhausted());
        }
        Err(match status.code() {
            Some(code) => ExecError::NonZeroExit { code, stderr },
            None => ExecError::KilledBySignal { stderr },
        }
        .into())
    }
}
