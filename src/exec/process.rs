//! Executable backed by a real child process

use crate::error::{PipInstallError, PipInstallResult};
use crate::exec::{Executable, Execution};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

/// Runs a program found on `PATH` (or at an explicit path)
#[derive(Debug, Clone)]
pub struct ProcessExecutable {
    program: String,
}

impl ProcessExecutable {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Read one line, decoding invalid UTF-8 lossily.
///
/// Returns `None` at end of stream or on a read error.
async fn next_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf).await {
        Ok(0) => None,
        Ok(_) => {
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            Some(String::from_utf8_lossy(&buf).into_owned())
        }
        Err(e) => {
            debug!("Stopped reading child output: {}", e);
            None
        }
    }
}

/// Read stdout and stderr of `child` line by line until both close.
///
/// Each line is passed to `on_output` as it arrives; all lines are returned
/// in arrival order.
async fn stream_child_output(
    child: &mut Child,
    on_output: &(dyn Fn(&str) + Send + Sync),
) -> Vec<String> {
    let mut stdout_reader = child.stdout.take().map(BufReader::new);
    let mut stderr_reader = child.stderr.take().map(BufReader::new);

    let mut all_output = Vec::new();
    let mut stdout_done = stdout_reader.is_none();
    let mut stderr_done = stderr_reader.is_none();

    while !stdout_done || !stderr_done {
        tokio::select! {
            line = async { next_line(stdout_reader.as_mut()?).await }, if !stdout_done => {
                match line {
                    Some(line) => {
                        on_output(&line);
                        all_output.push(line);
                    }
                    None => stdout_done = true,
                }
            }
            line = async { next_line(stderr_reader.as_mut()?).await }, if !stderr_done => {
                match line {
                    Some(line) => {
                        on_output(&line);
                        all_output.push(line);
                    }
                    None => stderr_done = true,
                }
            }
        }
    }

    all_output
}

#[async_trait]
impl Executable for ProcessExecutable {
    async fn execute(&self, execution: Execution) -> PipInstallResult<String> {
        let command_line = format!("{} {}", self.program, execution.args.join(" "));
        debug!("Executing: {}", command_line);

        let mut command = Command::new(&self.program);
        command
            .args(&execution.args)
            .env_clear()
            .envs(execution.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &execution.dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| PipInstallError::command_failed(command_line.clone(), e))?;

        let stream = execution.stream.clone();
        let forward = move |line: &str| {
            if let Some(emitter) = &stream {
                emitter.detail(line);
            }
        };
        let lines = stream_child_output(&mut child, &forward).await;

        let status = child
            .wait()
            .await
            .map_err(|e| PipInstallError::command_failed(command_line.clone(), e))?;
        let output = lines.join("\n");

        if status.success() {
            Ok(output)
        } else {
            Err(PipInstallError::CommandExit {
                command: command_line,
                code: status.code(),
                output,
            })
        }
    }
}
