//! The nested-loop design generator.
//!
//! Emits a top module whose body is a stack of `for`-generate loops of
//! configurable depth over a pool of random constants packed into a single
//! `CONSTS0` localparam. The innermost loop instantiates `const_block` to
//! surface each constant on a wire; every outer level folds the array below
//! it through a `case(var)` whose arms each carry a freshly drawn reduction
//! operator. The top module reduces the outermost array into `result`.
//!
//! The oracle mirrors elaboration: starting from the constant pool it folds
//! one level-output vector per loop level, innermost to outermost, using the
//! very same expression trees that were emitted into the case arms.
//!
//! Draw order is fixed and shared between emission and oracle: level
//! parameters outermost-first, then the constant pool, then case-arm
//! operators innermost-level-first in arm order, then the top reduction
//! operator. Reordering any of these silently desynchronizes the oracle.

use verifuzz_ast::{BinOp, Expr, Module, Stmt};
use verifuzz_common::FuzzRng;

use crate::config::LoopConfig;
use crate::error::GenError;
use crate::GeneratedDesign;

/// Iteration direction of one generated loop level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// `var = var + 1`, condition `var < start + n`, index `var - start`.
    Increment,
    /// `var = var - 1`, condition `var > start - n`, index `start - var`.
    Decrement,
}

/// Parameters of one loop level, drawn up front.
#[derive(Debug, Clone)]
struct LoopLevel {
    start: i64,
    count: u32,
    dir: Direction,
}

impl LoopLevel {
    /// The concrete induction value at iteration `i`.
    fn value_at(&self, i: i64) -> i64 {
        match self.dir {
            Direction::Increment => self.start + i,
            Direction::Decrement => self.start - i,
        }
    }

    fn cond_text(&self, var: &str) -> String {
        let n = self.count as i64;
        match self.dir {
            Direction::Increment => format!("{var} < {}", fmt_i64(self.start + n)),
            Direction::Decrement => format!("{var} > {}", fmt_i64(self.start - n)),
        }
    }

    fn update_text(&self, var: &str) -> String {
        match self.dir {
            Direction::Increment => format!("{var} = {var} + 1"),
            Direction::Decrement => format!("{var} = {var} - 1"),
        }
    }

    /// Index of the current iteration into this level's output array.
    fn index_text(&self, var: &str) -> String {
        match self.dir {
            Direction::Increment => format!("{var} - {}", fmt_i64(self.start)),
            Direction::Decrement => format!("{} - {var}", fmt_i64(self.start)),
        }
    }
}

/// Formats an `i64` for emission, parenthesizing negatives so they survive
/// inside larger expressions (`v0 - (-3)`).
fn fmt_i64(v: i64) -> String {
    if v < 0 {
        format!("({v})")
    } else {
        v.to_string()
    }
}

/// The `const_block` helper module: one parameter, one output wire.
///
/// Emitted at most once per generated file.
pub fn const_block_module() -> Module {
    let mut m = Module::new("const_block", vec!["output [31:0] w".to_string()]);
    m.push(Stmt::line("parameter VALUE = 32'h00000000;"));
    m.push(Stmt::Assign {
        lhs: "w".into(),
        rhs: Expr::symbol(0, "VALUE"),
    });
    m
}

/// A loop design produced for standalone use or for embedding into a
/// hierarchy leaf.
#[derive(Debug)]
pub struct LoopDesign {
    /// The generated module (output port `result`).
    pub module: Module,
    /// Whether the module instantiates `const_block`.
    pub uses_const_block: bool,
    /// The oracle's expected value of `result`.
    pub oracle: u32,
}

/// The loop design generator. One instance owns one RNG stream; successive
/// calls to [`LoopGenerator::generate`] continue that stream, so iteration
/// `k` of a run is a pure function of `(seed, config, k)`.
pub struct LoopGenerator {
    cfg: LoopConfig,
    rng: FuzzRng,
}

impl LoopGenerator {
    /// Creates a generator seeded from the configuration.
    pub fn new(cfg: &LoopConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            rng: FuzzRng::from_seed(cfg.seed),
        }
    }

    /// Generates one standalone design with top module `top`.
    pub fn generate(&mut self) -> Result<GeneratedDesign, GenError> {
        let design = self.generate_module("top")?;
        let mut text = String::new();
        if design.uses_const_block {
            text.push_str(&const_block_module().emit());
            text.push('\n');
        }
        text.push_str(&design.module.emit());
        Ok(GeneratedDesign {
            text,
            top: "top".to_string(),
            oracle: design.oracle,
        })
    }

    /// Generates one loop module under the given name.
    ///
    /// Used directly by the hierarchy generator to embed uniquely named loop
    /// modules at its leaves.
    pub fn generate_module(&mut self, name: &str) -> Result<LoopDesign, GenError> {
        if self.cfg.min_iter == 0 {
            return Err(GenError::EmptyIterRange(self.cfg.min_iter));
        }

        let depth = self.cfg.depth as usize;
        let mut module = Module::new(name, vec!["output [31:0] result".to_string()]);

        if depth == 0 {
            return self.generate_flat(module);
        }

        let levels: Vec<LoopLevel> = (0..depth)
            .map(|_| LoopLevel {
                start: self.rng.range_i64(self.cfg.min_start, self.cfg.max_start),
                count: self.rng.range_u32(self.cfg.min_iter, self.cfg.max_iter),
                dir: if self.cfg.random_update && self.rng.coin() {
                    Direction::Decrement
                } else {
                    Direction::Increment
                },
            })
            .collect();

        let n_consts = levels[depth - 1].count as usize;
        let consts: Vec<u32> = (0..n_consts).map(|_| self.rng.value()).collect();
        let pool = consts.clone();

        // Innermost loop: surface each constant through const_block.
        let leaf = depth - 1;
        let leaf_var = format!("v{leaf}");
        let leaf_idx = levels[leaf].index_text(&leaf_var);
        let mut loop_stmt = Stmt::ForGen {
            var: leaf_var.clone(),
            label: format!("gen_l{leaf}"),
            init: levels[leaf].start,
            cond: levels[leaf].cond_text(&leaf_var),
            update: levels[leaf].update_text(&leaf_var),
            body: vec![Stmt::Instance {
                module: "const_block".into(),
                instance: "u_const".into(),
                params: vec![format!(".VALUE(CONSTS0[32*({leaf_idx}) +: 32])")],
                ports: vec![("w".into(), format!("t{leaf}[{leaf_idx}]"))],
            }],
        };

        // Wrap outward. Each wrapped level declares the array below it,
        // embeds the inner loop, and folds that array per case arm. The
        // oracle's level-output vector advances in lockstep.
        let mut values = consts;
        for l in (0..depth - 1).rev() {
            let var = format!("v{l}");
            let next = l + 1;
            let inner_count = levels[next].count as usize;

            let mut body = vec![
                Stmt::line(format!("wire [31:0] t{next} [0:{}];", inner_count - 1)),
                loop_stmt,
            ];

            let mut arms = Vec::new();
            let mut outputs = Vec::with_capacity(levels[l].count as usize);
            for i in 0..levels[l].count as i64 {
                let val = levels[l].value_at(i);
                let expr = self.draw_reduction(next, inner_count);
                outputs.push(expr.eval(&values).map_err(GenError::from)?);
                arms.push((
                    Expr::symbol(val as u32, val.to_string()),
                    vec![Stmt::Assign {
                        lhs: format!("t{l}[{}]", levels[l].index_text(&var)),
                        rhs: expr,
                    }],
                ));
            }
            values = outputs;
            body.push(Stmt::CaseGen {
                selector: var.clone(),
                arms,
                default: None,
            });

            loop_stmt = Stmt::ForGen {
                var: var.clone(),
                label: format!("gen_l{l}"),
                init: levels[l].start,
                cond: levels[l].cond_text(&var),
                update: levels[l].update_text(&var),
                body,
            };
        }

        let n0 = levels[0].count as usize;
        module.push(consts_localparam(&pool));
        module.push(Stmt::line(format!("wire [31:0] t0 [0:{}];", n0 - 1)));
        let genvars: Vec<String> = (0..depth).map(|l| format!("v{l}")).collect();
        module.push(Stmt::line(format!("genvar {};", genvars.join(", "))));
        module.push(Stmt::line("generate"));
        module.push(loop_stmt);
        module.push(Stmt::line("endgenerate"));

        let top_expr = self.draw_reduction(0, n0);
        let oracle = top_expr.eval(&values).map_err(GenError::from)?;
        module.push(Stmt::Assign {
            lhs: "result".into(),
            rhs: top_expr,
        });

        Ok(LoopDesign {
            module,
            uses_const_block: true,
            oracle,
        })
    }

    /// Depth-zero shape: a 1-entry constant pool and a direct reduction.
    fn generate_flat(&mut self, mut module: Module) -> Result<LoopDesign, GenError> {
        let c = self.rng.value();
        module.push(Stmt::line(format!(
            "localparam [31:0] CONSTS0 = {{32'h{c:08x}}};"
        )));
        module.push(Stmt::line("wire [31:0] t0 [0:0];"));
        module.push(Stmt::Instance {
            module: "const_block".into(),
            instance: "u_const".into(),
            params: vec![".VALUE(CONSTS0[31:0])".into()],
            ports: vec![("w".into(), "t0[0]".into())],
        });
        let expr = self.draw_reduction(0, 1);
        let oracle = expr.eval(&[c]).map_err(GenError::from)?;
        module.push(Stmt::Assign {
            lhs: "result".into(),
            rhs: expr,
        });
        Ok(LoopDesign {
            module,
            uses_const_block: true,
            oracle,
        })
    }

    /// A reduction over the full array `t<level>` under a freshly drawn
    /// operator. Loop-level reductions use `{+, ^}`.
    fn draw_reduction(&mut self, level: usize, width: usize) -> Expr {
        let op = *self.rng.pick(&[BinOp::Add, BinOp::Xor]);
        let operands = (0..width)
            .map(|j| Expr::wire_indexed(format!("t{level}[{j}]"), j))
            .collect();
        Expr::reduction(op, operands)
    }
}

/// Formats the packed constant pool, index 0 at the least significant slice.
fn consts_localparam(consts: &[u32]) -> Stmt {
    let entries: Vec<String> = consts.iter().rev().map(|c| format!("32'h{c:08x}")).collect();
    Stmt::line(format!(
        "localparam [{}:0] CONSTS0 = {{{}}};",
        consts.len() * 32 - 1,
        entries.join(", ")
    ))
}
