//! Configuration records for the two design generators.
//!
//! Defaults mirror the CLI defaults, so a `LoopConfig::default()` with a
//! seed swapped in behaves exactly like running the binary with no knobs.

/// Configuration for the nested-loop design generator.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// RNG seed.
    pub seed: u64,
    /// Nesting depth (number of `for`-generate levels). Zero emits a single
    /// constant and a direct reduction.
    pub depth: u32,
    /// Lower bound for each loop's initial induction value.
    pub min_start: i64,
    /// Upper bound for each loop's initial induction value. Swapped bounds
    /// are normalized.
    pub max_start: i64,
    /// Lower bound for each loop's iteration count. Must be at least 1.
    pub min_iter: u32,
    /// Upper bound for each loop's iteration count.
    pub max_iter: u32,
    /// When true, each loop flips a fair coin between increment and
    /// decrement direction; otherwise every loop increments.
    pub random_update: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            depth: 2,
            min_start: 0,
            max_start: 0,
            min_iter: 2,
            max_iter: 16,
            random_update: true,
        }
    }
}

/// Configuration for the module-hierarchy design generator.
#[derive(Debug, Clone)]
pub struct HierConfig {
    /// RNG seed.
    pub seed: u64,
    /// Tree depth. Zero makes the root itself a leaf.
    pub depth: u32,
    /// Lower bound for per-node fanout.
    pub min_child: u32,
    /// Upper bound for per-node fanout.
    pub max_child: u32,
    /// Allow `$root.tb.top.…` absolute references.
    pub root_prefix: bool,
    /// Allow leading `..` upward references. Experimental: the rewrites are
    /// not legal IEEE 1364 upward name references and some tools reject them.
    pub relative_up: bool,
    /// Parameterize leaves and override one at the root via `defparam`.
    pub defparam: bool,
    /// Emit alias declarations at internal nodes. Experimental: `alias` is
    /// not part of the Verilog-2005 subset every backend accepts.
    pub alias: bool,
    /// Allow leaves to embed whole loop-generator modules.
    pub enable_big_gen: bool,
    /// Bernoulli probability that a leaf embeds a loop-generator module
    /// when `enable_big_gen` is set.
    pub big_gen_prob: f64,
    /// Knobs for embedded loop-generator modules.
    pub loop_cfg: LoopConfig,
}

impl Default for HierConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            depth: 2,
            min_child: 2,
            max_child: 4,
            root_prefix: false,
            relative_up: false,
            defparam: false,
            alias: false,
            enable_big_gen: false,
            big_gen_prob: 0.5,
            loop_cfg: LoopConfig::default(),
        }
    }
}
