//! Captured subprocess invocation.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::tool::{ToolLog, ToolResult};

/// Runs `cmd` in `workdir` with stdout and stderr redirected to `log_path`.
///
/// Returns `Ok(true)` on a zero exit status. Under `chat`, the captured
/// transcript is echoed to stderr after the process exits, so interleaving
/// with the fuzzer's own output stays readable.
pub fn run_logged(mut cmd: Command, workdir: &Path, log_path: &Path, chat: bool) -> io::Result<bool> {
    let log = File::create(log_path)?;
    let log_err = log.try_clone()?;

    let status = cmd
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .status()?;

    if chat {
        if let Ok(text) = fs::read_to_string(log_path) {
            eprint!("{text}");
        }
    }

    Ok(status.success())
}

/// Runs one step of a backend flow, mapping a non-zero exit to a failure
/// pointing at the transcript and a spawn error to an inline diagnostic.
///
/// Backends chain these with `?` inside an inner function and surface the
/// `Err` arm as their `ToolResult`.
pub(crate) fn run_step(
    cmd: Command,
    workdir: &Path,
    log_path: &Path,
    chat: bool,
) -> Result<(), ToolResult> {
    match run_logged(cmd, workdir, log_path, chat) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ToolResult::failure(ToolLog::Path(log_path.to_path_buf()))),
        Err(e) => Err(ToolResult::failure(ToolLog::Text(format!(
            "failed to spawn {}: {e}",
            log_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("subprocess")
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("echo.log");
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo RES=00000011"]);
        assert!(run_logged(cmd, dir.path(), &log, false).unwrap());
        assert!(fs::read_to_string(&log).unwrap().contains("RES=00000011"));
    }

    #[test]
    fn captures_stderr_too() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("err.log");
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo oops 1>&2"]);
        assert!(run_logged(cmd, dir.path(), &log, false).unwrap());
        assert!(fs::read_to_string(&log).unwrap().contains("oops"));
    }

    #[test]
    fn nonzero_exit_reported() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("fail.log");
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 3"]);
        assert!(!run_logged(cmd, dir.path(), &log, false).unwrap());
    }

    #[test]
    fn missing_binary_is_io_error() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("none.log");
        let cmd = Command::new("/nonexistent/verifuzz-no-such-binary");
        assert!(run_logged(cmd, dir.path(), &log, false).is_err());
    }

    #[test]
    fn runs_in_workdir() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("pwd.log");
        let mut cmd = Command::new("pwd");
        cmd.env_remove("PWD");
        assert!(run_logged(cmd, dir.path(), &log, false).unwrap());
        let text = fs::read_to_string(&log).unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        assert!(text.trim().ends_with(canonical.to_str().unwrap()));
    }
}
