//! ModelSim/Questa backend: RTL-level simulation, no synthesis.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::parse::scan_result;
use crate::process::run_step;
use crate::testbench::write_testbench;
use crate::tool::{Tool, ToolLog, ToolResult};

/// Install root of the ModelSim-compatible simulator shipped with Quartus.
pub const MODELSIM_BIN_DIR: &str = "/opt/intelFPGA/23.1std/questa_fse/bin";

/// The `vlib` + `vlog` + `vsim -c` flow at RTL level.
pub struct ModelSimTool {
    chat: bool,
}

impl ModelSimTool {
    /// Creates the backend; `chat` echoes subprocess transcripts to stderr.
    pub fn new(chat: bool) -> Self {
        Self { chat }
    }

    fn bin(&self, exe: &str) -> PathBuf {
        Path::new(MODELSIM_BIN_DIR).join(exe)
    }

    fn flow(&self, rtl: &Path, top: &str, workdir: &Path) -> Result<ToolResult, ToolResult> {
        fs::create_dir_all(workdir).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot create workdir: {e}")))
        })?;

        let tb = workdir.join("tb.v");
        write_testbench(&tb, top).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write testbench: {e}")))
        })?;

        let mut vlib = Command::new(self.bin("vlib"));
        vlib.arg("work");
        run_step(vlib, workdir, &workdir.join("vlib.log"), self.chat)?;

        let mut vlog = Command::new(self.bin("vlog"));
        vlog.arg(&tb).arg(rtl);
        run_step(vlog, workdir, &workdir.join("vlog.log"), self.chat)?;

        let sim_log = workdir.join("vsim.log");
        let mut vsim = Command::new(self.bin("vsim"));
        vsim.arg("-c")
            .arg("tb")
            .arg("-do")
            .arg("run -all; quit -f");
        run_step(vsim, workdir, &sim_log, self.chat)?;

        match scan_result(&sim_log) {
            Some(value) => Ok(ToolResult::ok(value, ToolLog::Path(sim_log))),
            None => Err(ToolResult::failure(ToolLog::Path(sim_log))),
        }
    }
}

impl Tool for ModelSimTool {
    fn name(&self) -> &str {
        "ModelSim"
    }

    fn run(&self, rtl: &Path, top: &str, workdir: &Path) -> ToolResult {
        self.flow(rtl, top, workdir).unwrap_or_else(|failure| failure)
    }
}
