//! Wall-clock bounding of tool invocations.
//!
//! Each `Tool::run` executes on a worker thread while the controller waits
//! on a channel with a timeout. On expiry the worker is abandoned — it may
//! drain in the background and its eventual result is discarded. The
//! subprocess tree is deliberately not signalled; iteration workdirs are
//! disjoint, so a straggler cannot corrupt later iterations.

use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::tool::{SharedTool, ToolLog, ToolResult};

/// Default per-tool wall-clock limit.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs `tool` against the design with a wall-clock limit.
///
/// Returns `None` on timeout. A worker that dies without reporting (a
/// panic inside the backend) is folded into an ordinary failure result.
pub fn run_with_timeout(
    tool: SharedTool,
    rtl: &Path,
    top: &str,
    workdir: &Path,
    timeout: Duration,
) -> Option<ToolResult> {
    let (tx, rx) = mpsc::channel();
    let rtl = rtl.to_path_buf();
    let top = top.to_string();
    let workdir = workdir.to_path_buf();

    thread::spawn(move || {
        let result = tool.run(&rtl, &top, &workdir);
        // The controller may have given up; a dead receiver is fine.
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(ToolResult::failure(ToolLog::Text(
            "tool worker terminated without a result".to_string(),
        ))),
    }
}
