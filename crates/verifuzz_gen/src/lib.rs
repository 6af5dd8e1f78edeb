//! Randomized Verilog design generators with built-in oracles.
//!
//! Two generators live here. The loop generator emits nested `for`-generate
//! designs over a pool of random constants; the hierarchy generator emits a
//! module tree observed from the root through hierarchical names. Both keep
//! an in-memory representation from which the expected 32-bit result is
//! computed by pure evaluation, so every produced file comes paired with its
//! oracle value.
//!
//! Generators never touch the filesystem: they return [`GeneratedDesign`]
//! records and the session layer decides where the Verilog lands.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hier;
pub mod loops;

pub use config::{HierConfig, LoopConfig};
pub use error::GenError;
pub use hier::HierGenerator;
pub use loops::LoopGenerator;

/// One generated design: its full Verilog text, the top module name the
/// testbench must instantiate, and the oracle's expected result.
#[derive(Debug, Clone)]
pub struct GeneratedDesign {
    /// Complete, self-contained Verilog source.
    pub text: String,
    /// Name of the module the testbench instantiates (always `top`).
    pub top: String,
    /// Expected 32-bit value on the `result` port.
    pub oracle: u32,
}
