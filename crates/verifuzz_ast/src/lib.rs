//! Verilog AST nodes for the Verifuzz design generators.
//!
//! The node family is deliberately closed and small: expressions, statements,
//! and modules, each supporting textual emission. Expressions additionally
//! support pure evaluation, which is what makes differential fuzzing work —
//! the same tree that is printed into the design is folded into the expected
//! 32-bit value, so the oracle cannot drift from the RTL.

#![warn(missing_docs)]

pub mod expr;
pub mod module;
pub mod stmt;

pub use expr::{BinOp, Expr};
pub use module::Module;
pub use stmt::{CustomText, Stmt};
