//! Cross-simulator comparison backend.
//!
//! Runs two child simulators and requires their 32-bit results to agree.
//! The orchestrator recognizes this backend by its name and skips the
//! external-oracle comparison for it: CompareSim is a pure
//! simulator-vs-simulator check.

use std::path::Path;

use crate::tool::{SharedTool, Tool, ToolLog, ToolResult};

/// Composes two simulator backends and compares their outputs.
pub struct CompareSim {
    first: SharedTool,
    second: SharedTool,
}

impl CompareSim {
    /// Builds the comparison over two child backends, run in order.
    pub fn new(first: SharedTool, second: SharedTool) -> Self {
        Self { first, second }
    }
}

impl Tool for CompareSim {
    fn name(&self) -> &str {
        "CompareSim"
    }

    fn run(&self, rtl: &Path, top: &str, workdir: &Path) -> ToolResult {
        let first_result = self
            .first
            .run(rtl, top, &workdir.join(self.first.name()));
        if !first_result.success {
            return ToolResult::failure(ToolLog::Text(format!(
                "{} failed: {}",
                self.first.name(),
                first_result.log.display()
            )));
        }

        let second_result = self
            .second
            .run(rtl, top, &workdir.join(self.second.name()));
        if !second_result.success {
            return ToolResult::failure(ToolLog::Text(format!(
                "{} failed: {}",
                self.second.name(),
                second_result.log.display()
            )));
        }

        if first_result.value != second_result.value {
            return ToolResult::failure(ToolLog::Text(format!(
                "{} and {} disagree: {:08x} != {:08x}",
                self.first.name(),
                self.second.name(),
                first_result.value,
                second_result.value
            )));
        }

        ToolResult::ok(
            first_result.value,
            ToolLog::Text(format!(
                "{} and {} agree",
                self.first.name(),
                self.second.name()
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedTool {
        name: &'static str,
        result: ToolResult,
        calls: AtomicUsize,
    }

    impl FixedTool {
        fn ok(name: &'static str, value: u32) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: ToolResult::ok(value, ToolLog::None),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: ToolResult::failure(ToolLog::Text("boom".into())),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Tool for FixedTool {
        fn name(&self) -> &str {
            self.name
        }
        fn run(&self, _rtl: &Path, _top: &str, _workdir: &Path) -> ToolResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn paths() -> (PathBuf, PathBuf) {
        (PathBuf::from("design.v"), PathBuf::from("work"))
    }

    #[test]
    fn agreement_succeeds_with_common_value() {
        let (rtl, wd) = paths();
        let cmp = CompareSim::new(FixedTool::ok("A", 0x42), FixedTool::ok("B", 0x42));
        let result = cmp.run(&rtl, "top", &wd);
        assert!(result.success);
        assert_eq!(result.value, 0x42);
    }

    #[test]
    fn disagreement_fails() {
        let (rtl, wd) = paths();
        let cmp = CompareSim::new(FixedTool::ok("A", 1), FixedTool::ok("B", 2));
        let result = cmp.run(&rtl, "top", &wd);
        assert!(!result.success);
        assert!(result.log.display().contains("disagree"));
    }

    #[test]
    fn first_child_failure_short_circuits() {
        let (rtl, wd) = paths();
        let second = FixedTool::ok("B", 3);
        let cmp = CompareSim::new(FixedTool::failing("A"), second.clone());
        let result = cmp.run(&rtl, "top", &wd);
        assert!(!result.success);
        assert!(result.log.display().contains("A failed"));
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_child_failure_fails() {
        let (rtl, wd) = paths();
        let cmp = CompareSim::new(FixedTool::ok("A", 3), FixedTool::failing("B"));
        let result = cmp.run(&rtl, "top", &wd);
        assert!(!result.success);
        assert!(result.log.display().contains("B failed"));
    }

    #[test]
    fn name_is_the_oracle_skip_key() {
        let cmp = CompareSim::new(FixedTool::ok("A", 0), FixedTool::ok("B", 0));
        assert_eq!(cmp.name(), "CompareSim");
    }
}
