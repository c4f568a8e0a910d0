use std::{
    io::{self, ErrorKind, Read, Write},
    process::{Child, Command},
    thread::{self, JoinHandle},
};

use tracing::trace;

use crate::error::ExecError;

/// Bytes of stderr kept for error reports.
const STDERR_TAIL: usize = 4096;

pub fn cmd_program(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

/// Kill the child if it is still alive and reap it.
pub fn kill_and_reap(child: &mut Child) {
    match child.kill() {
        Ok(()) => trace!(pid = child.id(), "child killed"),
        // Already exited.
        Err(e) if e.kind() == ErrorKind::InvalidInput => {}
        Err(e) => trace!(pid = child.id(), error = %e, "kill failed"),
    }
    let _ = child.wait();
}

/// Drain a pipe on its own thread, keeping only the last bytes.
pub fn drain_tail<R>(mut pipe: R) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.len() > STDERR_TAIL {
                        buf.drain(..buf.len() - STDERR_TAIL);
                    }
                }
            }
        }
        String::from_utf8_lossy(&buf).trim().to_string()
    })
}

/// Write `input` to a pipe on its own thread, closing the pipe when done.
///
/// A child that exits without reading its input is not an error.
pub fn feed_stdin<W>(mut pipe: W, input: Vec<u8>) -> JoinHandle<io::Result<()>>
where
    W: Write + Send + 'static,
{
    thread::spawn(move || match pipe.write_all(&input) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

/// Join the stdin writer started by [`feed_stdin`].
pub fn finish_writer(writer: Option<JoinHandle<io::Result<()>>>) -> Result<(), ExecError> {
    match writer.map(JoinHandle::join) {
        None | Some(Ok(Ok(()))) => Ok(()),
        Some(Ok(Err(e))) => Err(e.into()),
        Some(Err(_)) => Err(ExecError::Io("stdin writer panicked".into())),
    }
}
