//! AMD Vivado backend: out-of-context synthesis, then `xsim` on the
//! post-synthesis netlist.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::parse::scan_result;
use crate::process::run_step;
use crate::testbench::write_testbench;
use crate::tool::{Tool, ToolLog, ToolResult};

/// Fallback Vivado executable when `VIVADO_BIN` is not set.
pub const DEFAULT_VIVADO_BIN: &str = "/opt/Xilinx/Vivado/2024.1/bin/vivado";

/// Resolves the Vivado executable, honoring the `VIVADO_BIN` override.
pub fn vivado_bin() -> PathBuf {
    env::var_os("VIVADO_BIN")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VIVADO_BIN))
}

/// The `vivado -mode batch` + `xvlog`/`xelab`/`xsim` flow.
pub struct VivadoTool {
    chat: bool,
}

impl VivadoTool {
    /// Creates the backend; `chat` echoes subprocess transcripts to stderr.
    pub fn new(chat: bool) -> Self {
        Self { chat }
    }

    /// Sibling executable in the same `bin/` directory as Vivado itself.
    fn sibling(&self, exe: &str) -> PathBuf {
        match vivado_bin().parent() {
            Some(dir) => dir.join(exe),
            None => PathBuf::from(exe),
        }
    }

    fn flow(&self, rtl: &Path, top: &str, workdir: &Path) -> Result<ToolResult, ToolResult> {
        fs::create_dir_all(workdir).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot create workdir: {e}")))
        })?;

        let tcl = workdir.join("synth.tcl");
        let script = format!(
            "read_verilog {{{rtl}}}\n\
             synth_design -top {top} -mode out_of_context\n\
             write_verilog -force -mode funcsim netlist.v\n",
            rtl = rtl.display(),
        );
        fs::write(&tcl, script).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write synth.tcl: {e}")))
        })?;

        let mut synth = Command::new(vivado_bin());
        synth
            .arg("-mode")
            .arg("batch")
            .arg("-nojournal")
            .arg("-nolog")
            .arg("-source")
            .arg("synth.tcl");
        run_step(synth, workdir, &workdir.join("vivado.log"), self.chat)?;

        let tb = workdir.join("tb.v");
        write_testbench(&tb, top).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write testbench: {e}")))
        })?;

        let mut xvlog = Command::new(self.sibling("xvlog"));
        xvlog.arg("netlist.v").arg("tb.v");
        run_step(xvlog, workdir, &workdir.join("xvlog.log"), self.chat)?;

        let mut xelab = Command::new(self.sibling("xelab"));
        xelab
            .arg("tb")
            .arg("-L")
            .arg("unisims_ver")
            .arg("-s")
            .arg("tb_sim");
        run_step(xelab, workdir, &workdir.join("xelab.log"), self.chat)?;

        let sim_log = workdir.join("xsim.log");
        let mut xsim = Command::new(self.sibling("xsim"));
        xsim.arg("tb_sim").arg("--runall");
        run_step(xsim, workdir, &sim_log, self.chat)?;

        match scan_result(&sim_log) {
            Some(value) => Ok(ToolResult::ok(value, ToolLog::Path(sim_log))),
            None => Err(ToolResult::failure(ToolLog::Path(sim_log))),
        }
    }
}

impl Tool for VivadoTool {
    fn name(&self) -> &str {
        "Vivado"
    }

    fn run(&self, rtl: &Path, top: &str, workdir: &Path) -> ToolResult {
        self.flow(rtl, top, workdir).unwrap_or_else(|failure| failure)
    }
}
