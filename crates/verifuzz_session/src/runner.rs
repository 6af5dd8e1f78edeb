//! The sequential fuzzing driver and the emit-only mode.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use verifuzz_gen::{
    GenError, GeneratedDesign, HierConfig, HierGenerator, LoopConfig, LoopGenerator,
};
use verifuzz_tools::{run_with_timeout, SharedTool};

use crate::error::SessionError;
use crate::outcome::{RunSummary, ToolOutcome};
use crate::session::Session;

/// Either design generator behind one `generate` entry point.
///
/// Generators are stateful: their RNG streams advance across iterations,
/// which is what makes a run's file sequence a pure function of the seed.
pub enum DesignGenerator {
    /// Nested `for`-generate designs.
    Loop(LoopGenerator),
    /// Hierarchical-name module trees.
    Hier(HierGenerator),
}

impl DesignGenerator {
    /// A loop generator over the given knobs.
    pub fn from_loop(cfg: &LoopConfig) -> Self {
        DesignGenerator::Loop(LoopGenerator::new(cfg))
    }

    /// A hierarchy generator over the given knobs.
    pub fn from_hier(cfg: &HierConfig) -> Self {
        DesignGenerator::Hier(HierGenerator::new(cfg))
    }

    /// Produces the next design in the stream.
    pub fn generate(&mut self) -> Result<GeneratedDesign, GenError> {
        match self {
            DesignGenerator::Loop(g) => g.generate(),
            DesignGenerator::Hier(g) => g.generate(),
        }
    }
}

/// Runs the differential fuzzing loop and returns the accumulated counters.
///
/// Each iteration gets its own directory under a fresh timestamped session;
/// the tool gets a dedicated subdirectory of that. Tool failures and
/// timeouts are counted and the loop continues; only generator and session
/// I/O failures abort.
pub fn run_fuzz(
    generator: &mut DesignGenerator,
    tool: SharedTool,
    iterations: u32,
    timeout: Duration,
    base: &Path,
) -> Result<RunSummary, SessionError> {
    let session = Session::create(base)?;
    eprintln!("   Session {}", session.root().display());

    let mut summary = RunSummary::default();
    for idx in 0..iterations {
        let design = generator.generate()?;
        let iter_dir = session.iter_dir(idx)?;
        let rtl = iter_dir.join(format!("gen_{idx}.v"));
        fs::write(&rtl, &design.text)?;
        // Tools run subprocesses from their own workdirs; hand them an
        // absolute path to the design.
        let rtl = fs::canonicalize(&rtl)?;

        let workdir = iter_dir.join(tool.name());
        let outcome = classify(
            run_with_timeout(tool.clone(), &rtl, &design.top, &workdir, timeout),
            tool.name(),
            &design,
        );
        log_outcome(idx, tool.name(), &outcome);
        summary.record(&outcome);
    }

    Ok(summary)
}

/// Maps a watchdogged tool result onto the iteration outcome.
///
/// CompareSim results skip the oracle comparison: that backend already
/// checked its two simulators against each other.
fn classify(
    result: Option<verifuzz_tools::ToolResult>,
    tool_name: &str,
    design: &GeneratedDesign,
) -> ToolOutcome {
    match result {
        None => ToolOutcome::Timeout,
        Some(result) if !result.success => ToolOutcome::Crash {
            log: result.log.display(),
        },
        Some(result) => {
            if tool_name == "CompareSim" || result.value == design.oracle {
                ToolOutcome::Pass {
                    value: result.value,
                }
            } else {
                ToolOutcome::Mismatch {
                    value: result.value,
                    expected: design.oracle,
                }
            }
        }
    }
}

fn log_outcome(idx: u32, tool_name: &str, outcome: &ToolOutcome) {
    match outcome {
        ToolOutcome::Pass { value } => {
            eprintln!("   PASS      {idx:05} {tool_name} (value {value:08x})");
        }
        ToolOutcome::Mismatch { value, expected } => {
            eprintln!(
                "   MISMATCH  {idx:05} {tool_name}: got {value:08x}, expected {expected:08x}"
            );
        }
        ToolOutcome::Crash { log } => {
            eprintln!("   CRASH     {idx:05} {tool_name} ({log})");
        }
        ToolOutcome::Timeout => {
            eprintln!("   TIMEOUT   {idx:05} {tool_name}");
        }
    }
}

/// Emit-only mode: generates designs and writes them to `target`, numbered
/// `<stem>_NN<ext>` when more than one iteration was requested. No tools
/// run and no session directory is created.
pub fn run_emit(
    generator: &mut DesignGenerator,
    iterations: u32,
    target: &Path,
) -> Result<(), SessionError> {
    for idx in 0..iterations {
        let design = generator.generate()?;
        let path = if iterations > 1 {
            numbered_path(target, idx)
        } else {
            target.to_path_buf()
        };
        fs::write(&path, &design.text)?;
        eprintln!(
            "   Emitted {} (oracle {:08x})",
            path.display(),
            design.oracle
        );
    }
    Ok(())
}

/// `out.v` → `out_03.v` for iteration 3.
fn numbered_path(target: &Path, idx: u32) -> PathBuf {
    let stem = target
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gen");
    let name = match target.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}_{idx:02}.{ext}"),
        None => format!("{stem}_{idx:02}"),
    };
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;
    use verifuzz_tools::{Tool, ToolLog, ToolResult};

    fn loop_cfg(seed: u64) -> LoopConfig {
        LoopConfig {
            seed,
            depth: 1,
            min_iter: 2,
            max_iter: 2,
            ..LoopConfig::default()
        }
    }

    /// A tool that always reports the same value.
    struct FixedValueTool {
        name: &'static str,
        value: u32,
    }

    impl Tool for FixedValueTool {
        fn name(&self) -> &str {
            self.name
        }
        fn run(&self, _rtl: &Path, _top: &str, _workdir: &Path) -> ToolResult {
            ToolResult::ok(self.value, ToolLog::None)
        }
    }

    struct FailingTool;

    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "Failing"
        }
        fn run(&self, _rtl: &Path, _top: &str, _workdir: &Path) -> ToolResult {
            ToolResult::failure(ToolLog::Text("synthetic failure".into()))
        }
    }

    struct SleepyTool;

    impl Tool for SleepyTool {
        fn name(&self) -> &str {
            "Sleepy"
        }
        fn run(&self, _rtl: &Path, _top: &str, _workdir: &Path) -> ToolResult {
            thread::sleep(Duration::from_millis(500));
            ToolResult::ok(0, ToolLog::None)
        }
    }

    /// The oracle for iteration 0 of a config, learned from a twin
    /// generator instance (reproducibility makes this exact).
    fn first_oracle(cfg: &LoopConfig) -> u32 {
        LoopGenerator::new(cfg).generate().unwrap().oracle
    }

    #[test]
    fn agreeing_tool_passes() {
        let base = TempDir::new().unwrap();
        let cfg = loop_cfg(1);
        let oracle = first_oracle(&cfg);
        let mut gen = DesignGenerator::from_loop(&cfg);
        let tool = Arc::new(FixedValueTool {
            name: "Fixed",
            value: oracle,
        });
        let summary =
            run_fuzz(&mut gen, tool, 1, Duration::from_secs(5), base.path()).unwrap();
        assert_eq!(summary.passes, 1);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn disagreeing_tool_mismatches() {
        let base = TempDir::new().unwrap();
        let cfg = loop_cfg(2);
        let oracle = first_oracle(&cfg);
        let mut gen = DesignGenerator::from_loop(&cfg);
        let tool = Arc::new(FixedValueTool {
            name: "Fixed",
            value: oracle ^ 1,
        });
        let summary =
            run_fuzz(&mut gen, tool, 1, Duration::from_secs(5), base.path()).unwrap();
        assert_eq!(summary.mismatches, 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn compare_sim_skips_oracle() {
        let base = TempDir::new().unwrap();
        let cfg = loop_cfg(3);
        let oracle = first_oracle(&cfg);
        let mut gen = DesignGenerator::from_loop(&cfg);
        // Disagrees with the oracle, but CompareSim outcomes are taken on
        // the backend's own authority.
        let tool = Arc::new(FixedValueTool {
            name: "CompareSim",
            value: oracle ^ 0xffff,
        });
        let summary =
            run_fuzz(&mut gen, tool, 1, Duration::from_secs(5), base.path()).unwrap();
        assert_eq!(summary.passes, 1);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn failing_tool_crashes_and_run_continues() {
        let base = TempDir::new().unwrap();
        let mut gen = DesignGenerator::from_loop(&loop_cfg(4));
        let summary = run_fuzz(
            &mut gen,
            Arc::new(FailingTool),
            2,
            Duration::from_secs(5),
            base.path(),
        )
        .unwrap();
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.crashes, 2);
        assert_eq!(summary.exit_code(), 3);
    }

    #[test]
    fn slow_tool_times_out_and_run_continues() {
        let base = TempDir::new().unwrap();
        let mut gen = DesignGenerator::from_loop(&loop_cfg(5));
        let summary = run_fuzz(
            &mut gen,
            Arc::new(SleepyTool),
            2,
            Duration::from_millis(50),
            base.path(),
        )
        .unwrap();
        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.timeouts, 2);
        assert_eq!(summary.exit_code(), 2);
    }

    #[test]
    fn session_holds_design_and_tool_dirs() {
        let base = TempDir::new().unwrap();
        let cfg = loop_cfg(6);
        let oracle = first_oracle(&cfg);
        let mut gen = DesignGenerator::from_loop(&cfg);
        let tool = Arc::new(FixedValueTool {
            name: "Fixed",
            value: oracle,
        });
        run_fuzz(&mut gen, tool, 1, Duration::from_secs(5), base.path()).unwrap();

        let session_root = fs::read_dir(base.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        let iter_dir = session_root.join("00000");
        assert!(iter_dir.join("gen_0.v").is_file());
    }

    #[test]
    fn hier_generator_drives_the_same_loop() {
        let base = TempDir::new().unwrap();
        let cfg = HierConfig {
            seed: 7,
            depth: 1,
            min_child: 2,
            max_child: 2,
            ..HierConfig::default()
        };
        let oracle = HierGenerator::new(&cfg).generate().unwrap().oracle;
        let mut gen = DesignGenerator::from_hier(&cfg);
        let tool = Arc::new(FixedValueTool {
            name: "Fixed",
            value: oracle,
        });
        let summary =
            run_fuzz(&mut gen, tool, 1, Duration::from_secs(5), base.path()).unwrap();
        assert_eq!(summary.passes, 1);
    }

    #[test]
    fn emit_single_uses_exact_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.v");
        let mut gen = DesignGenerator::from_loop(&loop_cfg(8));
        run_emit(&mut gen, 1, &target).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn emit_many_numbers_files() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.v");
        let mut gen = DesignGenerator::from_loop(&loop_cfg(9));
        run_emit(&mut gen, 3, &target).unwrap();
        assert!(!target.exists());
        assert!(dir.path().join("out_00.v").is_file());
        assert!(dir.path().join("out_01.v").is_file());
        assert!(dir.path().join("out_02.v").is_file());
    }

    #[test]
    fn emit_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.v");
        let b = dir.path().join("b.v");
        run_emit(&mut DesignGenerator::from_loop(&loop_cfg(10)), 1, &a).unwrap();
        run_emit(&mut DesignGenerator::from_loop(&loop_cfg(10)), 1, &b).unwrap();
        assert_eq!(
            fs::read_to_string(&a).unwrap(),
            fs::read_to_string(&b).unwrap()
        );
    }

    #[test]
    fn numbered_path_without_extension() {
        assert_eq!(
            numbered_path(Path::new("dump"), 4),
            PathBuf::from("dump_04")
        );
    }
}
