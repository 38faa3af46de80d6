//! Bounded execution of external decoder programs

use crate::DecodeError;
use std::ffi::OsStr;
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// How often a running tool is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `program` with `args` and return its standard output
///
/// Stdin is closed and stderr discarded. The process is killed once
/// `timeout` elapses. A non-zero exit status is not an error: whatever the
/// tool printed is returned and the caller decides whether it is usable.
pub fn run_tool<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    timeout: Duration,
) -> Result<String, DecodeError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                DecodeError::ToolUnavailable(program.to_string())
            }
            _ => DecodeError::Io(e),
        })?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("tool stdout was not captured"))?;

    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    let status = match wait_until(&mut child, Instant::now() + timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            kill_and_reap(&mut child);
            return Err(DecodeError::ToolTimedOut {
                tool: program.to_string(),
                timeout,
            });
        }
        Err(e) => {
            kill_and_reap(&mut child);
            return Err(DecodeError::Io(e));
        }
    };

    let output = reader
        .join()
        .map_err(|_| io::Error::other("tool output reader panicked"))??;

    if !status.success() {
        debug!(tool = program, status = %status, bytes = output.len(), "Tool exited unsuccessfully");
    }

    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Poll `child` until it exits; `None` once `deadline` passes
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill `child` and collect its exit status
///
/// Closing the child's stdout lets the reader thread finish on its own.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = run_tool("sh", &["-c", "printf 'hello world'"], Duration::from_secs(5)).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_failed_exit_still_returns_output() {
        let out = run_tool("sh", &["-c", "echo partial; exit 3"], Duration::from_secs(5)).unwrap();
        assert_eq!(out, "partial\n");
    }

    #[test]
    fn test_missing_program() {
        let err = run_tool("spamgate-no-such-tool", &["x"], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, DecodeError::ToolUnavailable(ref tool) if tool == "spamgate-no-such-tool"));
    }

    #[test]
    fn test_timeout_kills_process() {
        let started = Instant::now();
        let err = run_tool("sleep", &["10"], Duration::from_millis(200)).unwrap_err();

        assert!(matches!(err, DecodeError::ToolTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_wait_until_deadline_leaves_child_running() {
        let mut child = Command::new("sleep").arg("10").spawn().unwrap();

        let status = wait_until(&mut child, Instant::now() + Duration::from_millis(50)).unwrap();
        assert!(status.is_none());
        assert!(child.try_wait().unwrap().is_none());

        kill_and_reap(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_wait_until_reports_exit() {
        let mut child = Command::new("sh").args(["-c", "exit 0"]).spawn().unwrap();

        let status = wait_until(&mut child, Instant::now() + Duration::from_secs(5)).unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }
}
