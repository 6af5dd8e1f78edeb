//! The module-hierarchy design generator.
//!
//! Emits a tree of modules in which children are instantiated with empty
//! port lists and observed only through hierarchical names: every internal
//! module assigns its output to a reduction whose operands are dotted paths
//! down to leaf outputs, optionally qualified with `$root.tb.top.` absolute
//! prefixes or `..` upward rewrites. Leaves hold random constants, carry an
//! overridable `VALUE` parameter under `defparam`, or embed entire
//! loop-generator modules.
//!
//! The oracle never re-parses paths: each operand is bound to its leaf's
//! slot in a leaf-value vector at construction time, and the root expression
//! is folded over that vector after any defparam override has been applied.
//!
//! Draw order is fixed: tree shape first (preorder; per leaf the embed
//! decision then its content, per internal node its fanout), then expression
//! draws during bottom-up emission (per internal node: operand count,
//! operand sample, extra-literal coin and value, per-operand qualification,
//! operator), with the root's defparam pick and override value drawn just
//! before the root expression.

use std::collections::HashSet;

use verifuzz_ast::{BinOp, Expr, Module, Stmt};
use verifuzz_common::FuzzRng;

use crate::config::HierConfig;
use crate::error::GenError;
use crate::loops::{const_block_module, LoopDesign, LoopGenerator};
use crate::GeneratedDesign;

/// One node of the in-memory module tree.
#[derive(Debug)]
struct Node {
    /// Module name: `top` at the root, `m<k>` elsewhere.
    module_name: String,
    /// Instance name under the parent (`c<i>`); empty at the root.
    instance: String,
    /// Child nodes, in instantiation order.
    children: Vec<Node>,
    /// Slot in the leaf-value vector; `Some` exactly at leaves.
    leaf_id: Option<usize>,
    /// Embedded loop design when this leaf is a generator leaf.
    embedded: Option<LoopDesign>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.leaf_id.is_some()
    }
}

/// Normalizes a qualified hierarchical path by stripping `$root.`, leading
/// `tb.` and `top.` qualifiers, and leading `..` rewrites (which appear as
/// empty segments once the path is split on dots). Idempotent.
pub fn normalise(path: &str) -> String {
    let mut segs: Vec<&str> = path.split('.').collect();
    while let Some(first) = segs.first() {
        match *first {
            "$root" | "tb" | "top" | "" => {
                segs.remove(0);
            }
            _ => break,
        }
    }
    segs.join(".")
}

/// Per-file generation state.
struct FileState {
    /// Leaf values in leaf-id order; defparam overrides mutate this before
    /// the oracle folds the root expression.
    leaf_values: Vec<u32>,
    /// Emitted module text, bottom-up.
    text: String,
    /// Names of helper/embedded modules already emitted.
    emitted: HashSet<String>,
    module_counter: usize,
    gen_counter: usize,
}

/// The hierarchy design generator.
///
/// Owns two RNG streams: its own (tree shape, expressions, qualification)
/// and the embedded loop generator's. Both advance across iterations, so a
/// run's k-th file is a pure function of `(seed, config, k)`.
pub struct HierGenerator {
    cfg: HierConfig,
    rng: FuzzRng,
    loop_gen: LoopGenerator,
}

impl HierGenerator {
    /// Creates a generator seeded from the configuration.
    pub fn new(cfg: &HierConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            rng: FuzzRng::from_seed(cfg.seed),
            loop_gen: LoopGenerator::new(&cfg.loop_cfg),
        }
    }

    /// Generates one design with root module `top`.
    pub fn generate(&mut self) -> Result<GeneratedDesign, GenError> {
        let mut st = FileState {
            leaf_values: Vec::new(),
            text: String::new(),
            emitted: HashSet::new(),
            module_counter: 0,
            gen_counter: 0,
        };

        let root = self.build_node(self.cfg.depth as usize, &mut st)?;
        let oracle = self.emit_tree(&root, &mut st)?;

        Ok(GeneratedDesign {
            text: st.text,
            top: "top".to_string(),
            oracle,
        })
    }

    /// Builds the tree shape, drawing leaf contents and fanouts in preorder.
    fn build_node(&mut self, remaining: usize, st: &mut FileState) -> Result<Node, GenError> {
        let module_name = if st.module_counter == 0 {
            "top".to_string()
        } else {
            format!("m{}", st.module_counter)
        };
        st.module_counter += 1;

        if remaining == 0 {
            let embedded = if self.cfg.enable_big_gen && self.rng.chance(self.cfg.big_gen_prob) {
                let name = format!("gen_mod{}", st.gen_counter);
                st.gen_counter += 1;
                Some(self.loop_gen.generate_module(&name)?)
            } else {
                None
            };
            let value = match &embedded {
                Some(design) => design.oracle,
                None => self.rng.value(),
            };
            let leaf_id = st.leaf_values.len();
            st.leaf_values.push(value);
            return Ok(Node {
                module_name,
                instance: String::new(),
                children: Vec::new(),
                leaf_id: Some(leaf_id),
                embedded,
            });
        }

        let fanout = self
            .rng
            .range_usize(self.cfg.min_child.max(1) as usize, self.cfg.max_child.max(1) as usize);
        let mut children = Vec::with_capacity(fanout);
        for i in 0..fanout {
            let mut child = self.build_node(remaining - 1, st)?;
            child.instance = format!("c{i}");
            children.push(child);
        }
        Ok(Node {
            module_name,
            instance: String::new(),
            children,
            leaf_id: None,
            embedded: None,
        })
    }

    /// Emits every module bottom-up and returns the oracle value.
    fn emit_tree(&mut self, root: &Node, st: &mut FileState) -> Result<u32, GenError> {
        if root.is_leaf() {
            // Degenerate depth-0 tree: the root is the only module.
            self.emit_leaf(root, "result", st);
            return Ok(st.leaf_values[0]);
        }

        self.emit_children(root, st)?;
        let root_expr = self.emit_internal(root, 0, "", true, st)?;
        root_expr.eval(&st.leaf_values).map_err(GenError::from)
    }

    /// Recursively emits the modules below `node` (post-order).
    fn emit_children(&mut self, node: &Node, st: &mut FileState) -> Result<(), GenError> {
        for child in &node.children {
            self.emit_subtree(child, 1, &child.instance, st)?;
        }
        Ok(())
    }

    fn emit_subtree(
        &mut self,
        node: &Node,
        depth: usize,
        abs_prefix: &str,
        st: &mut FileState,
    ) -> Result<(), GenError> {
        if node.is_leaf() {
            self.emit_leaf(node, "out", st);
            return Ok(());
        }
        for child in &node.children {
            let child_prefix = format!("{abs_prefix}.{}", child.instance);
            self.emit_subtree(child, depth + 1, &child_prefix, st)?;
        }
        self.emit_internal(node, depth, abs_prefix, false, st)?;
        Ok(())
    }

    /// Emits one leaf module (plain constant, parameterized constant, or
    /// embedded generator instance).
    fn emit_leaf(&mut self, node: &Node, port: &str, st: &mut FileState) {
        let leaf_id = node.leaf_id.expect("leaf node");
        let value = st.leaf_values[leaf_id];
        let mut m = Module::new(&node.module_name, vec![format!("output [31:0] {port}")]);

        match &node.embedded {
            Some(design) => {
                if design.uses_const_block && st.emitted.insert("const_block".to_string()) {
                    st.text.push_str(&const_block_module().emit());
                    st.text.push('\n');
                }
                if st.emitted.insert(design.module.name.clone()) {
                    st.text.push_str(&design.module.emit());
                    st.text.push('\n');
                }
                m.push(Stmt::Instance {
                    module: design.module.name.clone(),
                    instance: "u_gen".into(),
                    params: Vec::new(),
                    ports: vec![("result".into(), port.to_string())],
                });
            }
            None if self.cfg.defparam => {
                m.push(Stmt::line(format!("parameter VALUE = 32'h{value:08x};")));
                m.push(Stmt::Assign {
                    lhs: port.to_string(),
                    rhs: Expr::symbol(value, "VALUE"),
                });
            }
            None => {
                m.push(Stmt::Assign {
                    lhs: port.to_string(),
                    rhs: Expr::literal(value),
                });
            }
        }

        st.text.push_str(&m.emit());
        st.text.push('\n');
    }

    /// Emits one internal module and returns its reduction expression.
    ///
    /// `abs_prefix` is the node's instance path from the root (empty at the
    /// root itself), used for `$root.tb.top.` qualification.
    fn emit_internal(
        &mut self,
        node: &Node,
        depth: usize,
        abs_prefix: &str,
        is_root: bool,
        st: &mut FileState,
    ) -> Result<Expr, GenError> {
        let port = if is_root { "result" } else { "out" };
        let mut m = Module::new(&node.module_name, vec![format!("output [31:0] {port}")]);

        for child in &node.children {
            m.push(Stmt::Instance {
                module: child.module_name.clone(),
                instance: child.instance.clone(),
                params: Vec::new(),
                ports: Vec::new(),
            });
        }

        if self.cfg.alias {
            // Experimental; see HierConfig::alias.
            m.push(Stmt::line("wire [31:0] out_alias;"));
            m.push(Stmt::line(format!("alias out_alias = {port};")));
        }

        if is_root && self.cfg.defparam {
            if let Some(stmt) = self.draw_defparam(node, st) {
                m.push(stmt);
            }
        }

        let expr = self.draw_expr(node, depth, abs_prefix);
        m.push(Stmt::Assign {
            lhs: port.to_string(),
            rhs: expr.clone(),
        });

        st.text.push_str(&m.emit());
        if !is_root {
            st.text.push('\n');
        }
        Ok(expr)
    }

    /// Picks one plain-constant leaf, overrides its value, and returns the
    /// `defparam` statement. Generator leaves carry no `VALUE` parameter, so
    /// when every leaf embeds a generator the override is skipped.
    fn draw_defparam(&mut self, root: &Node, st: &mut FileState) -> Option<Stmt> {
        let candidates: Vec<(String, usize)> = leaf_paths(root)
            .into_iter()
            .filter(|(_, _, embedded)| !*embedded)
            .map(|(path, id, _)| (path.trim_end_matches(".out").to_string(), id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let (path, leaf_id) = candidates[self.rng.range_usize(0, candidates.len() - 1)].clone();
        let new_val = self.rng.value();
        st.leaf_values[leaf_id] = new_val;
        Some(Stmt::line(format!(
            "defparam {path}.VALUE = 32'h{new_val:08x};"
        )))
    }

    /// Builds the reduction expression for an internal node.
    fn draw_expr(&mut self, node: &Node, depth: usize, abs_prefix: &str) -> Expr {
        let leaves = leaf_paths(node);
        let lo = 2.min(leaves.len());
        let k = self.rng.range_usize(lo, leaves.len());
        let chosen = sample_indices(&mut self.rng, leaves.len(), k);
        let extra = if self.rng.coin() {
            Some(self.rng.value())
        } else {
            None
        };

        let mut operands = Vec::with_capacity(k + 1);
        for idx in chosen {
            let (rel, leaf_id, _) = &leaves[idx];
            let name = self.qualify(rel, depth, abs_prefix);
            operands.push(Expr::wire_indexed(name, *leaf_id));
        }
        if let Some(value) = extra {
            operands.push(Expr::literal(value));
        }

        let op = *self
            .rng
            .pick(&[BinOp::Add, BinOp::Or, BinOp::And, BinOp::Xor]);
        Expr::reduction(op, operands)
    }

    /// Applies one of the hierarchical-name styles to a relative leaf path.
    fn qualify(&mut self, rel: &str, depth: usize, abs_prefix: &str) -> String {
        if self.cfg.root_prefix && self.rng.chance(1.0 / 3.0) {
            if abs_prefix.is_empty() {
                format!("$root.tb.top.{rel}")
            } else {
                format!("$root.tb.top.{abs_prefix}.{rel}")
            }
        } else if self.cfg.relative_up && depth >= 1 && self.rng.coin() {
            match rel.split_once('.') {
                Some((_, rest)) => format!("..{rest}"),
                None => rel.to_string(),
            }
        } else {
            rel.to_string()
        }
    }
}

/// Enumerates `(relative path, leaf id, is generator leaf)` for every leaf
/// below `node`, in child order. Paths end in `.out`.
fn leaf_paths(node: &Node) -> Vec<(String, usize, bool)> {
    fn walk(n: &Node, prefix: &str, out: &mut Vec<(String, usize, bool)>) {
        if let Some(id) = n.leaf_id {
            out.push((format!("{prefix}{}.out", n.instance), id, n.embedded.is_some()));
        } else {
            let deeper = format!("{prefix}{}.", n.instance);
            for c in &n.children {
                walk(c, &deeper, out);
            }
        }
    }
    let mut out = Vec::new();
    for c in &node.children {
        walk(c, "", &mut out);
    }
    out
}

/// Draws `k` distinct indices in `[0, len)` via a partial Fisher-Yates
/// shuffle, preserving a deterministic draw count of exactly `k`.
fn sample_indices(rng: &mut FuzzRng, len: usize, k: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..len).collect();
    for i in 0..k {
        let j = rng.range_usize(i, len - 1);
        idx.swap(i, j);
    }
    idx.truncate(k);
    idx
}
