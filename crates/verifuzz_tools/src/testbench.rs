//! Minimal testbench emission shared by the simulation backends.

use std::fs;
use std::io;
use std::path::Path;

/// Writes the standard testbench next to the tool's other artifacts.
///
/// The DUT is instantiated under the instance name `top`, giving it the
/// hierarchical name `tb.top` — `$root.tb.top.…` references in generated
/// designs depend on exactly this shape. At time #1 the testbench prints
/// the result line and finishes.
pub fn write_testbench(path: &Path, top: &str) -> io::Result<()> {
    let text = format!(
        r#"module tb;
  wire [31:0] result;
  {top} top(.result(result));
  initial begin
    #1;
    $display("RES=%08h", result);
    $finish;
  end
endmodule
"#
    );
    fs::write(path, text)
}
