//! Outcome classification and run-level counters.

use serde::Serialize;

/// How one tool invocation ended, after oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool succeeded and its value passed the applicable check.
    Pass {
        /// The tool's 32-bit result.
        value: u32,
    },
    /// The tool succeeded but disagreed with the oracle.
    Mismatch {
        /// The tool's 32-bit result.
        value: u32,
        /// The oracle's expected value.
        expected: u32,
    },
    /// The tool failed: non-zero exit, missing transcript, or parse error.
    Crash {
        /// Transcript path or inline diagnostic from the tool.
        log: String,
    },
    /// The watchdog expired before the tool reported.
    Timeout,
}

/// Counters accumulated across a whole run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    /// Iterations completed.
    pub iterations: usize,
    /// Iterations in which every tool passed its check.
    pub passes: usize,
    /// Tool results that disagreed with the oracle (or with each other).
    pub mismatches: usize,
    /// Tool invocations that failed outright.
    pub crashes: usize,
    /// Tool invocations killed by the watchdog.
    pub timeouts: usize,
}

impl RunSummary {
    /// Folds one iteration's tool outcome into the counters.
    pub fn record(&mut self, outcome: &ToolOutcome) {
        self.iterations += 1;
        match outcome {
            ToolOutcome::Pass { .. } => self.passes += 1,
            ToolOutcome::Mismatch { .. } => self.mismatches += 1,
            ToolOutcome::Crash { .. } => self.crashes += 1,
            ToolOutcome::Timeout => self.timeouts += 1,
        }
    }

    /// Process exit code. Crash dominates timeout dominates mismatch.
    pub fn exit_code(&self) -> i32 {
        if self.crashes > 0 {
            3
        } else if self.timeouts > 0 {
            2
        } else if self.mismatches > 0 {
            1
        } else {
            0
        }
    }

    /// Human-readable terminal summary.
    pub fn render_text(&self) -> String {
        format!(
            "   Result: {} passed, {} mismatched, {} crashed, {} timed out over {} iteration(s)",
            self.passes, self.mismatches, self.crashes, self.timeouts, self.iterations
        )
    }

    /// Machine-readable summary.
    pub fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("summary serialization cannot fail")
    }
}
