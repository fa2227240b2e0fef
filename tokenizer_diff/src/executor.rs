//! Reference program execution with an allow-list, timeout and output cap

use std::collections::HashSet;
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const FALLBACK_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Runs allow-listed programs and captures their output
#[derive(Debug, Clone)]
pub struct ReferenceExecutor {
    default_timeout: Duration,
    max_output_bytes: usize,
    allowed_programs: HashSet<String>,
}

impl ReferenceExecutor {
    /// Executor with an empty allow-list; programs must be allowed before use
    pub fn new(default_timeout: Duration, max_output_bytes: usize) -> Self {
        Self {
            default_timeout,
            max_output_bytes,
            allowed_programs: HashSet::new(),
        }
    }

    pub fn allow_program(&mut self, program: impl Into<String>) {
        self.allowed_programs.insert(program.into());
    }

    pub fn allow_programs(&mut self, programs: &[&str]) {
        for program in programs {
            self.allowed_programs.insert(program.to_string());
        }
    }

    pub fn is_allowed(&self, program: &str) -> bool {
        self.allowed_programs.contains(program)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub fn max_output_bytes(&self) -> usize {
        self.max_output_bytes
    }

    /// Run `program` to completion, or kill it once the timeout elapses
    pub fn execute(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, CommandError> {
        if !self.is_allowed(program) {
            return Err(CommandError::SecurityViolation {
                reason: format!("Program '{}' not in allow-list", program),
            });
        }

        let timeout_duration = timeout.unwrap_or(self.default_timeout);
        let start = Instant::now();

        let path = std::env::var("PATH").unwrap_or_else(|_| FALLBACK_PATH.to_string());
        let mut cmd = Command::new(program);
        cmd.args(args)
            .env_clear()
            .env("PATH", path)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CommandError::ProgramNotFound {
                program: program.to_string(),
            },
            io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                program: program.to_string(),
            },
            _ => CommandError::ExecutionFailed {
                program: program.to_string(),
                reason: e.to_string(),
            },
        })?;

        let (stdout, stderr) = self.drain_pipes(&mut child, program)?;

        let status = wait_timeout::ChildExt::wait_timeout(&mut child, timeout_duration).map_err(
            |e| CommandError::ExecutionFailed {
                program: program.to_string(),
                reason: e.to_string(),
            },
        )?;

        let Some(status) = status else {
            let _ = child.kill();
            let _ = child.wait();
            // Killing the child closes the pipes, so the drains finish
            let _ = join_drain(stdout, program);
            let _ = join_drain(stderr, program);
            return Err(CommandError::Timeout {
                timeout_ms: timeout_duration.as_millis() as u64,
            });
        };

        let stdout = join_drain(stdout, program)?;
        let stderr = join_drain(stderr, program)?;

        if stdout.overflowed {
            return Err(CommandError::OutputTooLarge {
                program: program.to_string(),
                limit: self.max_output_bytes,
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout.bytes).to_string(),
            stderr: String::from_utf8_lossy(&stderr.bytes).to_string(),
            exit_code: status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    fn drain_pipes(
        &self,
        child: &mut Child,
        program: &str,
    ) -> Result<(JoinHandle<io::Result<Drained>>, JoinHandle<io::Result<Drained>>), CommandError>
    {
        let missing = || CommandError::ExecutionFailed {
            program: program.to_string(),
            reason: "child pipes were not captured".to_string(),
        };
        let stdout = child.stdout.take().ok_or_else(missing)?;
        let stderr = child.stderr.take().ok_or_else(missing)?;
        Ok((
            spawn_drain(stdout, self.max_output_bytes),
            spawn_drain(stderr, self.max_output_bytes),
        ))
    }
}

struct Drained {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Read a pipe to EOF, keeping at most `cap` bytes
fn spawn_drain<R: Read + Send + 'static>(
    mut reader: R,
    cap: usize,
) -> JoinHandle<io::Result<Drained>> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let mut overflowed = false;
        let mut buffer = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let room = cap.saturating_sub(bytes.len());
            if n > room {
                overflowed = true;
            }
            bytes.extend_from_slice(&buffer[..n.min(room)]);
        }
        Ok(Drained { bytes, overflowed })
    })
}

fn join_drain(
    handle: JoinHandle<io::Result<Drained>>,
    program: &str,
) -> Result<Drained, CommandError> {
    match handle.join() {
        Ok(Ok(drained)) => Ok(drained),
        Ok(Err(e)) => Err(CommandError::ExecutionFailed {
            program: program.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(CommandError::ExecutionFailed {
            program: program.to_string(),
            reason: "output reader panicked".to_string(),
        }),
    }
}

/// Captured output of a finished program
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Program execution errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Execution failed for '{program}': {reason}")]
    ExecutionFailed { program: String, reason: String },

    #[error("Command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Permission denied: {program}")]
    PermissionDenied { program: String },

    #[error("Security violation: {reason}")]
    SecurityViolation { reason: String },

    #[error("Output of '{program}' exceeds {limit} bytes")]
    OutputTooLarge { program: String, limit: usize },
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn executor() -> ReferenceExecutor {
        let mut executor = ReferenceExecutor::new(Duration::from_secs(10), 1024);
        executor.allow_program("sh");
        executor
    }

    #[test]
    fn test_allow_list_management() {
        let mut executor = ReferenceExecutor::new(Duration::from_secs(1), 16);
        assert!(!executor.is_allowed("python3"));

        executor.allow_program("python3");
        executor.allow_programs(&["sh", "python"]);
        assert!(executor.is_allowed("python3"));
        assert!(executor.is_allowed("python"));
        assert!(!executor.is_allowed("rm"));
    }

    #[test]
    fn test_security_violation() {
        let executor = ReferenceExecutor::new(Duration::from_secs(1), 16);
        assert_matches!(
            executor.execute("rm", &["-rf", "/"], None),
            Err(CommandError::SecurityViolation { .. })
        );
    }

    #[test]
    fn test_captures_stdout_stderr_and_exit_code() {
        let output = executor()
            .execute("sh", &["-c", "printf 'out'; printf 'err' >&2; exit 3"], None)
            .unwrap();

        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[test]
    fn test_timeout_kills_program() {
        let result = executor().execute("sh", &["-c", "sleep 5"], Some(Duration::from_millis(100)));
        assert_matches!(result, Err(CommandError::Timeout { timeout_ms: 100 }));
    }

    #[test]
    fn test_output_cap() {
        let result = executor().execute(
            "sh",
            &["-c", "i=0; while [ $i -lt 200 ]; do echo 0123456789; i=$((i+1)); done"],
            None,
        );
        assert_matches!(result, Err(CommandError::OutputTooLarge { limit: 1024, .. }));
    }

    #[test]
    fn test_missing_program() {
        let mut executor = executor();
        executor.allow_program("definitely-not-a-real-program-7f3a");
        assert_matches!(
            executor.execute("definitely-not-a-real-program-7f3a", &[], None),
            Err(CommandError::ProgramNotFound { .. })
        );
    }
}
