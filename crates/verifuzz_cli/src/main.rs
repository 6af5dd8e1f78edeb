//! Verifuzz CLI — differential fuzzing of Verilog EDA toolchains.
//!
//! Each iteration generates a constrained-random design with a known
//! 32-bit oracle value, drives it through the selected backend, and
//! classifies the outcome. Exit codes: 0 clean, 1 mismatch, 2 timeout,
//! 3 crash; crash dominates timeout dominates mismatch.

#![warn(missing_docs)]

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use verifuzz_common::FuzzRng;
use verifuzz_gen::{HierConfig, LoopConfig};
use verifuzz_session::{run_emit, run_fuzz, DesignGenerator};
use verifuzz_tools::{create_tool, ToolKind, DEFAULT_TOOL_TIMEOUT};

/// Verifuzz — a differential fuzzer for Verilog EDA toolchains.
#[derive(Parser, Debug)]
#[command(name = "verifuzz", version, about = "Differential fuzzer for Verilog EDA toolchains")]
pub struct Cli {
    /// Number of fuzzing iterations.
    #[arg(short = 'n', long = "iter", default_value_t = 1)]
    pub iter: u32,

    /// RNG seed; drawn from OS entropy when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Backend: 1=Quartus, 2=QuartusPro, 3=Vivado, 4=Icarus, 5=ModelSim,
    /// 6=CompareSim.
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub tool: u8,

    /// Echo subprocess transcripts to stderr.
    #[arg(short, long)]
    pub chat: bool,

    /// Generate hierarchical-name designs instead of loop designs.
    #[arg(long)]
    pub hier: bool,

    /// Lower bound for loop start values.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub min_start: i64,

    /// Upper bound for loop start values.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub max_start: i64,

    /// Lower bound for loop iteration counts (must be at least 1).
    #[arg(long, default_value_t = 2)]
    pub min_iter: u32,

    /// Upper bound for loop iteration counts.
    #[arg(long, default_value_t = 16)]
    pub max_iter: u32,

    /// Always increment loop induction variables instead of flipping a
    /// coin per loop.
    #[arg(long)]
    pub no_rand_update: bool,

    /// Nesting depth (loop levels, or hierarchy depth under --hier).
    #[arg(long, default_value_t = 2)]
    pub depth: u32,

    /// Lower bound for hierarchy fanout.
    #[arg(long, default_value_t = 2)]
    pub min_child: u32,

    /// Upper bound for hierarchy fanout.
    #[arg(long, default_value_t = 4)]
    pub max_child: u32,

    /// Allow $root.tb.top.… absolute references.
    #[arg(long)]
    pub root_prefix: bool,

    /// Allow leading `..` upward references (experimental).
    #[arg(long)]
    pub relative_up: bool,

    /// Emit alias declarations at internal nodes (experimental).
    #[arg(long)]
    pub alias: bool,

    /// Parameterize leaves and override one via defparam at the root.
    #[arg(long)]
    pub defparam: bool,

    /// Allow hierarchy leaves to embed loop-generator modules.
    #[arg(long)]
    pub include_gen: bool,

    /// Probability that a leaf embeds a generator under --include-gen.
    #[arg(long, default_value_t = 0.5)]
    pub gen_prob: f64,

    /// Emit generated Verilog to this file and run no tools; numbered
    /// <stem>_NN<ext> when --iter exceeds 1.
    #[arg(long)]
    pub emit_file: Option<PathBuf>,

    /// Session base directory.
    #[arg(long, default_value = "fuzz_out")]
    pub base: PathBuf,

    /// Terminal summary rendering.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Depth of loop modules embedded at hierarchy leaves. The hierarchy's own
/// `--depth` governs the tree; embedded generators stay at the loop
/// generator's default nesting.
const EMBEDDED_LOOP_DEPTH: u32 = 2;

/// Maps the numeric `--tool` selector onto a backend kind.
fn tool_kind(index: u8) -> ToolKind {
    match index {
        1 => ToolKind::Quartus,
        2 => ToolKind::QuartusPro,
        3 => ToolKind::Vivado,
        4 => ToolKind::Icarus,
        5 => ToolKind::ModelSim,
        _ => ToolKind::CompareSim,
    }
}

/// Assembles the generator configured by the CLI flags.
fn build_generator(cli: &Cli, seed: u64) -> DesignGenerator {
    let loop_cfg = LoopConfig {
        seed,
        depth: cli.depth,
        min_start: cli.min_start,
        max_start: cli.max_start,
        min_iter: cli.min_iter,
        max_iter: cli.max_iter,
        random_update: !cli.no_rand_update,
    };

    if cli.hier {
        let hier_cfg = HierConfig {
            seed,
            depth: cli.depth,
            min_child: cli.min_child,
            max_child: cli.max_child,
            root_prefix: cli.root_prefix,
            relative_up: cli.relative_up,
            defparam: cli.defparam,
            alias: cli.alias,
            enable_big_gen: cli.include_gen,
            big_gen_prob: cli.gen_prob,
            loop_cfg: LoopConfig {
                depth: EMBEDDED_LOOP_DEPTH,
                ..loop_cfg
            },
        };
        DesignGenerator::from_hier(&hier_cfg)
    } else {
        DesignGenerator::from_loop(&loop_cfg)
    }
}

/// Runs the fuzzer and returns the process exit code.
fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let seed = match cli.seed {
        Some(seed) => seed,
        None => FuzzRng::from_entropy().1,
    };
    eprintln!("   Seed {seed}");

    let mut generator = build_generator(cli, seed);

    if let Some(target) = &cli.emit_file {
        run_emit(&mut generator, cli.iter, target)?;
        return Ok(0);
    }

    let tool = create_tool(tool_kind(cli.tool), cli.chat);
    let summary = run_fuzz(
        &mut generator,
        tool,
        cli.iter,
        DEFAULT_TOOL_TIMEOUT,
        &cli.base,
    )?;

    match cli.format {
        ReportFormat::Text => eprintln!("{}", summary.render_text()),
        ReportFormat::Json => println!("{}", summary.render_json()),
    }

    Ok(summary.exit_code())
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["verifuzz"]);
        assert_eq!(cli.iter, 1);
        assert!(cli.seed.is_none());
        assert_eq!(cli.tool, 4);
        assert!(!cli.chat);
        assert!(!cli.hier);
        assert_eq!(cli.min_start, 0);
        assert_eq!(cli.max_start, 0);
        assert_eq!(cli.min_iter, 2);
        assert_eq!(cli.max_iter, 16);
        assert!(!cli.no_rand_update);
        assert_eq!(cli.depth, 2);
        assert_eq!(cli.min_child, 2);
        assert_eq!(cli.max_child, 4);
        assert!(!cli.root_prefix);
        assert!(!cli.relative_up);
        assert!(!cli.alias);
        assert!(!cli.defparam);
        assert!(!cli.include_gen);
        assert!((cli.gen_prob - 0.5).abs() < f64::EPSILON);
        assert!(cli.emit_file.is_none());
        assert_eq!(cli.base, PathBuf::from("fuzz_out"));
        assert_eq!(cli.format, ReportFormat::Text);
    }

    #[test]
    fn parse_short_flags() {
        let cli = Cli::parse_from(["verifuzz", "-n", "10", "-s", "42", "-t", "6", "-c"]);
        assert_eq!(cli.iter, 10);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.tool, 6);
        assert!(cli.chat);
    }

    #[test]
    fn parse_loop_knobs() {
        let cli = Cli::parse_from([
            "verifuzz",
            "--min-start",
            "-3",
            "--max-start",
            "3",
            "--min-iter",
            "1",
            "--max-iter",
            "4",
            "--no-rand-update",
        ]);
        assert_eq!(cli.min_start, -3);
        assert_eq!(cli.max_start, 3);
        assert_eq!(cli.min_iter, 1);
        assert_eq!(cli.max_iter, 4);
        assert!(cli.no_rand_update);
    }

    #[test]
    fn parse_hier_knobs() {
        let cli = Cli::parse_from([
            "verifuzz",
            "--hier",
            "--depth",
            "3",
            "--min-child",
            "1",
            "--max-child",
            "5",
            "--root-prefix",
            "--relative-up",
            "--alias",
            "--defparam",
            "--include-gen",
            "--gen-prob",
            "0.9",
        ]);
        assert!(cli.hier);
        assert_eq!(cli.depth, 3);
        assert_eq!(cli.min_child, 1);
        assert_eq!(cli.max_child, 5);
        assert!(cli.root_prefix);
        assert!(cli.relative_up);
        assert!(cli.alias);
        assert!(cli.defparam);
        assert!(cli.include_gen);
        assert!((cli.gen_prob - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn tool_selector_rejects_out_of_range() {
        assert!(Cli::try_parse_from(["verifuzz", "-t", "0"]).is_err());
        assert!(Cli::try_parse_from(["verifuzz", "-t", "7"]).is_err());
    }

    #[test]
    fn tool_kind_mapping() {
        assert_eq!(tool_kind(1), ToolKind::Quartus);
        assert_eq!(tool_kind(2), ToolKind::QuartusPro);
        assert_eq!(tool_kind(3), ToolKind::Vivado);
        assert_eq!(tool_kind(4), ToolKind::Icarus);
        assert_eq!(tool_kind(5), ToolKind::ModelSim);
        assert_eq!(tool_kind(6), ToolKind::CompareSim);
    }

    #[test]
    fn parse_emit_file() {
        let cli = Cli::parse_from(["verifuzz", "--emit-file", "dump.v", "-n", "3"]);
        assert_eq!(cli.emit_file, Some(PathBuf::from("dump.v")));
        assert_eq!(cli.iter, 3);
    }

    #[test]
    fn parse_format_json() {
        let cli = Cli::parse_from(["verifuzz", "--format", "json"]);
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn emit_mode_runs_without_tools() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("dump.v");
        let cli = Cli::parse_from([
            "verifuzz",
            "--emit-file",
            target.to_str().unwrap(),
            "-s",
            "1",
            "-n",
            "2",
        ]);
        let code = run(&cli).unwrap();
        assert_eq!(code, 0);
        assert!(dir.path().join("dump_00.v").is_file());
        assert!(dir.path().join("dump_01.v").is_file());
    }

    #[test]
    fn emit_mode_is_seed_reproducible() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.v");
        let b = dir.path().join("b.v");
        for target in [&a, &b] {
            let cli = Cli::parse_from([
                "verifuzz",
                "--emit-file",
                target.to_str().unwrap(),
                "-s",
                "7",
                "--hier",
            ]);
            run(&cli).unwrap();
        }
        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            std::fs::read_to_string(&b).unwrap()
        );
    }

    #[test]
    fn min_iter_zero_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("dump.v");
        let cli = Cli::parse_from([
            "verifuzz",
            "--emit-file",
            target.to_str().unwrap(),
            "-s",
            "1",
            "--min-iter",
            "0",
        ]);
        assert!(run(&cli).is_err());
    }
}
