//! EDA tool backends and the orchestration plumbing around them.
//!
//! The [`Tool`] trait is the seam between the fuzzer and external EDA
//! flows: each backend owns a per-iteration working directory, drives
//! vendor executables as subprocesses with captured transcripts, and
//! recovers the design's 32-bit result from a `RES=` line. The watchdog
//! bounds every invocation with a wall-clock limit.

#![warn(missing_docs)]

pub mod compare;
pub mod icarus;
pub mod modelsim;
pub mod parse;
pub mod process;
pub mod quartus;
pub mod testbench;
pub mod tool;
pub mod vivado;
pub mod watchdog;

use std::sync::Arc;

pub use compare::CompareSim;
pub use icarus::IcarusTool;
pub use modelsim::ModelSimTool;
pub use quartus::QuartusTool;
pub use tool::{SharedTool, Tool, ToolLog, ToolResult};
pub use vivado::VivadoTool;
pub use watchdog::{run_with_timeout, DEFAULT_TOOL_TIMEOUT};

/// Backend selector, mirroring the CLI's `--tool` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Intel Quartus standard edition: synthesis to a gate-level netlist,
    /// then netlist simulation against vendor libraries.
    Quartus,
    /// Intel Quartus Pro edition, same shape as [`ToolKind::Quartus`].
    QuartusPro,
    /// AMD Vivado: out-of-context synthesis, then `xsim` on the netlist.
    Vivado,
    /// Icarus Verilog: compile and execute at RTL level.
    Icarus,
    /// ModelSim RTL simulation, no synthesis.
    ModelSim,
    /// Cross-simulator comparison of Icarus and ModelSim; no external
    /// oracle is consulted for this backend.
    CompareSim,
}

/// Instantiates the backend for a selector.
pub fn create_tool(kind: ToolKind, chat: bool) -> SharedTool {
    match kind {
        ToolKind::Quartus => Arc::new(QuartusTool::standard(chat)),
        ToolKind::QuartusPro => Arc::new(QuartusTool::pro(chat)),
        ToolKind::Vivado => Arc::new(VivadoTool::new(chat)),
        ToolKind::Icarus => Arc::new(IcarusTool::new(chat)),
        ToolKind::ModelSim => Arc::new(ModelSimTool::new(chat)),
        ToolKind::CompareSim => Arc::new(CompareSim::new(
            Arc::new(IcarusTool::new(chat)),
            Arc::new(ModelSimTool::new(chat)),
        )),
    }
}
