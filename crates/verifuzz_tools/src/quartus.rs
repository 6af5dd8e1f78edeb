//! Intel Quartus backends: synthesis to a gate-level netlist, then netlist
//! simulation with the bundled ModelSim-compatible simulator against the
//! vendor primitive libraries.
//!
//! The standard and Pro editions share one flow shape; they differ in the
//! install root, the synthesis executable, and the device family written
//! into the project file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::modelsim::MODELSIM_BIN_DIR;
use crate::parse::scan_result;
use crate::process::run_step;
use crate::testbench::write_testbench;
use crate::tool::{Tool, ToolLog, ToolResult};

/// Install root of the Quartus standard edition.
pub const QUARTUS_ROOTDIR: &str = "/opt/intelFPGA/23.1std/quartus";
/// Install root of the Quartus Pro edition.
pub const QUARTUS_PRO_ROOTDIR: &str = "/opt/intelFPGA_pro/24.1/quartus";

/// Project revision name used for every per-iteration Quartus project.
const PROJECT: &str = "fuzz";

/// A Quartus synthesis + gate-level simulation flow.
pub struct QuartusTool {
    pro: bool,
    chat: bool,
}

impl QuartusTool {
    /// The standard-edition flow.
    pub fn standard(chat: bool) -> Self {
        Self { pro: false, chat }
    }

    /// The Pro-edition flow.
    pub fn pro(chat: bool) -> Self {
        Self { pro: true, chat }
    }

    fn rootdir(&self) -> &'static str {
        if self.pro {
            QUARTUS_PRO_ROOTDIR
        } else {
            QUARTUS_ROOTDIR
        }
    }

    fn quartus_bin(&self, exe: &str) -> PathBuf {
        Path::new(self.rootdir()).join("bin").join(exe)
    }

    fn modelsim_bin(&self, exe: &str) -> PathBuf {
        Path::new(MODELSIM_BIN_DIR).join(exe)
    }

    /// Vendor primitive sources the gate-level netlist elaborates against.
    fn sim_libs(&self) -> Vec<PathBuf> {
        let lib_dir = Path::new(self.rootdir()).join("eda").join("sim_lib");
        let atoms = if self.pro {
            "cyclone10gx_atoms.v"
        } else {
            "cyclonev_atoms.v"
        };
        vec![lib_dir.join("altera_primitives.v"), lib_dir.join(atoms)]
    }

    fn family(&self) -> &'static str {
        if self.pro {
            "Cyclone 10 GX"
        } else {
            "Cyclone V"
        }
    }

    fn write_project(&self, rtl: &Path, top: &str, workdir: &Path) -> std::io::Result<()> {
        fs::write(
            workdir.join(format!("{PROJECT}.qpf")),
            format!("PROJECT_REVISION = \"{PROJECT}\"\n"),
        )?;
        let qsf = format!(
            "set_global_assignment -name FAMILY \"{family}\"\n\
             set_global_assignment -name DEVICE AUTO\n\
             set_global_assignment -name TOP_LEVEL_ENTITY {top}\n\
             set_global_assignment -name VERILOG_FILE {rtl}\n\
             set_global_assignment -name EDA_SIMULATION_TOOL \"ModelSim (Verilog)\"\n\
             set_global_assignment -name EDA_OUTPUT_DATA_FORMAT \"VERILOG HDL\" -section_id eda_simulation\n\
             set_global_assignment -name EDA_NETLIST_WRITER_OUTPUT_DIR simulation/modelsim -section_id eda_simulation\n",
            family = self.family(),
            rtl = rtl.display(),
        );
        fs::write(workdir.join(format!("{PROJECT}.qsf")), qsf)
    }

    fn flow(&self, rtl: &Path, top: &str, workdir: &Path) -> Result<ToolResult, ToolResult> {
        fs::create_dir_all(workdir).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot create workdir: {e}")))
        })?;

        self.write_project(rtl, top, workdir).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write project files: {e}")))
        })?;

        // Analysis & synthesis. Pro renamed the executable.
        let synth_exe = if self.pro { "quartus_syn" } else { "quartus_map" };
        let mut synth = Command::new(self.quartus_bin(synth_exe));
        synth.arg(PROJECT);
        run_step(
            synth,
            workdir,
            &workdir.join(format!("{synth_exe}.log")),
            self.chat,
        )?;

        // Netlist writer: simulation/modelsim/fuzz.vo.
        let mut eda = Command::new(self.quartus_bin("quartus_eda"));
        eda.arg(PROJECT)
            .arg("--simulation")
            .arg("--tool=modelsim")
            .arg("--format=verilog");
        run_step(eda, workdir, &workdir.join("quartus_eda.log"), self.chat)?;

        let tb = workdir.join("tb.v");
        write_testbench(&tb, top).map_err(|e| {
            ToolResult::failure(ToolLog::Text(format!("cannot write testbench: {e}")))
        })?;

        let mut vlib = Command::new(self.modelsim_bin("vlib"));
        vlib.arg("work");
        run_step(vlib, workdir, &workdir.join("vlib.log"), self.chat)?;

        let mut vlog = Command::new(self.modelsim_bin("vlog"));
        vlog.arg("tb.v").arg(format!("simulation/modelsim/{PROJECT}.vo"));
        for lib in self.sim_libs() {
            vlog.arg(lib);
        }
        run_step(vlog, workdir, &workdir.join("vlog.log"), self.chat)?;

        let sim_log = workdir.join("vsim.log");
        let mut vsim = Command::new(self.modelsim_bin("vsim"));
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

impl Tool for QuartusTool {
    fn name(&self) -> &str {
        if self.pro {
            "QuartusPro"
        } else {
            "Quartus"
        }
    }

    fn run(&self, rtl: &Path, top: &str, workdir: &Path) -> ToolResult {
        self.flow(rtl, top, workdir).unwrap_or_else(|failure| failure)
    }
}
