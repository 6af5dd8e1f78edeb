//! Expression nodes with dual emission/evaluation.
//!
//! Semantic width is 32 bits everywhere and arithmetic wraps modulo 2^32,
//! matching how the generated designs declare their nets.

use verifuzz_common::{FuzzResult, InternalError};

/// A binary operator usable in generated reduction expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
}

impl BinOp {
    /// The Verilog token for this operator.
    pub fn token(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
        }
    }

    /// Applies the operator to two 32-bit operands with wraparound.
    pub fn apply(self, lhs: u32, rhs: u32) -> u32 {
        match self {
            BinOp::Add => lhs.wrapping_add(rhs),
            BinOp::Sub => lhs.wrapping_sub(rhs),
            BinOp::And => lhs & rhs,
            BinOp::Or => lhs | rhs,
            BinOp::Xor => lhs ^ rhs,
        }
    }
}

/// An expression node.
///
/// Expressions are immutable after construction and are consumed twice: once
/// by Verilog emission and once by oracle evaluation.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A 32-bit literal. When `symbol` is set, emission prints the symbol
    /// (e.g. a parameter name) instead of the numeric form, while evaluation
    /// still uses `value`.
    Literal {
        /// The literal's value.
        value: u32,
        /// Optional source-level alias emitted in place of the number.
        symbol: Option<String>,
    },
    /// A named wire reference. `index` points into the evaluation
    /// environment; a reference without an index can be emitted but not
    /// evaluated.
    Wire {
        /// The net name as it appears in the design, possibly hierarchical.
        name: String,
        /// Slot in the evaluation environment holding this wire's value.
        index: Option<usize>,
    },
    /// A left-associative chain `(a op b op c …)` with at least one operand.
    Reduction {
        /// The single operator applied between all operands.
        op: BinOp,
        /// Ordered operands.
        operands: Vec<Expr>,
    },
}

impl Expr {
    /// A plain numeric literal.
    pub fn literal(value: u32) -> Self {
        Expr::Literal {
            value,
            symbol: None,
        }
    }

    /// A literal emitted under a symbolic alias.
    pub fn symbol(value: u32, symbol: impl Into<String>) -> Self {
        Expr::Literal {
            value,
            symbol: Some(symbol.into()),
        }
    }

    /// A wire reference that only participates in emission.
    pub fn wire(name: impl Into<String>) -> Self {
        Expr::Wire {
            name: name.into(),
            index: None,
        }
    }

    /// A wire reference bound to slot `index` of the evaluation environment.
    pub fn wire_indexed(name: impl Into<String>, index: usize) -> Self {
        Expr::Wire {
            name: name.into(),
            index: Some(index),
        }
    }

    /// A reduction over `operands` under `op`.
    pub fn reduction(op: BinOp, operands: Vec<Expr>) -> Self {
        Expr::Reduction { op, operands }
    }

    /// Renders the expression as Verilog source text.
    pub fn emit(&self) -> String {
        match self {
            Expr::Literal { value, symbol } => match symbol {
                Some(sym) => sym.clone(),
                None => format!("32'd{value}"),
            },
            Expr::Wire { name, .. } => name.clone(),
            Expr::Reduction { op, operands } => {
                let parts: Vec<String> = operands.iter().map(Expr::emit).collect();
                format!("({})", parts.join(&format!(" {} ", op.token())))
            }
        }
    }

    /// Evaluates the expression against `env`, the vector of wire values the
    /// current reduction reads from.
    ///
    /// Failure here means the generator built an expression the oracle cannot
    /// account for, which is a bug in Verifuzz, so the error is fatal.
    pub fn eval(&self, env: &[u32]) -> FuzzResult<u32> {
        match self {
            Expr::Literal { value, .. } => Ok(*value),
            Expr::Wire { name, index } => {
                let idx = index.ok_or_else(|| {
                    InternalError::new(format!("wire '{name}' has no evaluation slot"))
                })?;
                env.get(idx).copied().ok_or_else(|| {
                    InternalError::new(format!(
                        "wire '{name}' slot {idx} out of range (env has {})",
                        env.len()
                    ))
                })
            }
            Expr::Reduction { op, operands } => {
                let mut iter = operands.iter();
                let first = iter.next().ok_or_else(|| {
                    InternalError::new("reduction expression with no operands")
                })?;
                let mut acc = first.eval(env)?;
                for operand in iter {
                    acc = op.apply(acc, operand.eval(env)?);
                }
                Ok(acc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_emit_and_eval() {
        let e = Expr::literal(42);
        assert_eq!(e.emit(), "32'd42");
        assert_eq!(e.eval(&[]).unwrap(), 42);
    }

    #[test]
    fn symbolic_literal_emits_alias() {
        let e = Expr::symbol(0xdead_beef, "VALUE");
        assert_eq!(e.emit(), "VALUE");
        assert_eq!(e.eval(&[]).unwrap(), 0xdead_beef);
    }

    #[test]
    fn wire_reads_environment() {
        let e = Expr::wire_indexed("t0[1]", 1);
        assert_eq!(e.emit(), "t0[1]");
        assert_eq!(e.eval(&[10, 20, 30]).unwrap(), 20);
    }

    #[test]
    fn wire_without_slot_fails_eval() {
        let e = Expr::wire("result");
        assert!(e.eval(&[1]).is_err());
    }

    #[test]
    fn wire_out_of_range_fails_eval() {
        let e = Expr::wire_indexed("t0[5]", 5);
        assert!(e.eval(&[1, 2]).is_err());
    }

    #[test]
    fn reduction_left_associative_sub() {
        // (10 - 3 - 4) must fold left: (10 - 3) - 4 = 3.
        let e = Expr::reduction(
            BinOp::Sub,
            vec![Expr::literal(10), Expr::literal(3), Expr::literal(4)],
        );
        assert_eq!(e.emit(), "(32'd10 - 32'd3 - 32'd4)");
        assert_eq!(e.eval(&[]).unwrap(), 3);
    }

    #[test]
    fn reduction_single_operand() {
        let e = Expr::reduction(BinOp::Xor, vec![Expr::literal(9)]);
        assert_eq!(e.emit(), "(32'd9)");
        assert_eq!(e.eval(&[]).unwrap(), 9);
    }

    #[test]
    fn reduction_wraps_add() {
        let e = Expr::reduction(
            BinOp::Add,
            vec![Expr::literal(u32::MAX), Expr::literal(2)],
        );
        assert_eq!(e.eval(&[]).unwrap(), 1);
    }

    #[test]
    fn reduction_wraps_sub() {
        let e = Expr::reduction(BinOp::Sub, vec![Expr::literal(0), Expr::literal(1)]);
        assert_eq!(e.eval(&[]).unwrap(), u32::MAX);
    }

    #[test]
    fn reduction_bitwise_ops() {
        let env = [0b1100, 0b1010];
        let and = Expr::reduction(
            BinOp::And,
            vec![Expr::wire_indexed("a", 0), Expr::wire_indexed("b", 1)],
        );
        let or = Expr::reduction(
            BinOp::Or,
            vec![Expr::wire_indexed("a", 0), Expr::wire_indexed("b", 1)],
        );
        let xor = Expr::reduction(
            BinOp::Xor,
            vec![Expr::wire_indexed("a", 0), Expr::wire_indexed("b", 1)],
        );
        assert_eq!(and.eval(&env).unwrap(), 0b1000);
        assert_eq!(or.eval(&env).unwrap(), 0b1110);
        assert_eq!(xor.eval(&env).unwrap(), 0b0110);
    }

    #[test]
    fn nested_reduction() {
        // ((1 + 2) ^ 4)
        let inner = Expr::reduction(BinOp::Add, vec![Expr::literal(1), Expr::literal(2)]);
        let outer = Expr::reduction(BinOp::Xor, vec![inner, Expr::literal(4)]);
        assert_eq!(outer.emit(), "((32'd1 + 32'd2) ^ 32'd4)");
        assert_eq!(outer.eval(&[]).unwrap(), 7);
    }

    #[test]
    fn empty_reduction_is_internal_error() {
        let e = Expr::Reduction {
            op: BinOp::Add,
            operands: Vec::new(),
        };
        assert!(e.eval(&[]).is_err());
    }
}
