//! Icarus Verilog backend: open-source RTL compile and execute.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::parse::scan_result;
use crate::process::run_step;
use crate::testbench::write_testbench;
use crate::tool::{Tool, ToolLog, ToolResult};

/// The `iverilog` + `vvp` flow.
pub struct IcarusTool {
    chat: bool,
}

impl IcarusTool {
    /// Creates the backend; `chat` echoes subprocess transcripts to stderr.
    pub fn new(chat: bool) -> Self {
        Self { chat }
    }

    fn flow(&self, rtl: &Path, top: &str, workdir: &Path) -> Result<ToolResult, ToolResult> {
        fs::create_dir_all(workdir).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot create workdir: {e}")))
        })?;

        let tb = workdir.join("tb.v");
        write_testbench(&tb, top).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write testbench: {e}")))
        })?;

        let mut compile = Command::new("iverilog");
        compile
            .arg("-g2005")
            .arg("-o")
            .arg("sim.vvp")
            .arg(&tb)
            .arg(rtl);
        run_step(compile, workdir, &workdir.join("iverilog.log"), self.chat)?;

        let sim_log = workdir.join("vvp.log");
        let mut sim = Command::new("vvp");
        sim.arg("sim.vvp");
        run_step(sim, workdir, &sim_log, self.chat)?;

        match scan_result(&sim_log) {
            Some(value) => Ok(ToolResult::ok(value, ToolLog::Path(sim_log))),
            None => Err(ToolResult::failure(ToolLog::Path(sim_log))),
        }
    }
}

impl Tool for IcarusTool {
    fn name(&self) -> &str {
        "Icarus"
    }

    fn run(&self, rtl: &Path, top: &str, workdir: &Path) -> ToolResult {
        self.flow(rtl, top, workdir).unwrap_or_else(|failure| failure)
    }
}
