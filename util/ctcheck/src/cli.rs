use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Constant-time codegen checker for ct-primitives
#[derive(Parser, Debug)]
#[command(name = "ctcheck")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Scan probe functions in a binary for conditional branches
    Disasm(DisasmCommand),
    /// Run a fixed-vs-random differential timing test on the probes
    Timing(TimingCommand),
    /// List the exported probe symbols
    Probes,
}

#[derive(Parser, Debug)]
pub(crate) struct DisasmCommand {
    /// Binary to disassemble (defaults to this executable)
    #[arg(short, long, value_name = "PATH")]
    pub(crate) binary: Option<PathBuf>,

    /// Disassembler to invoke
    #[arg(long, default_value = "objdump", value_name = "TOOL")]
    pub(crate) objdump: PathBuf,

    /// Only functions whose symbol starts with this prefix are scanned
    #[arg(long, default_value = crate::probes::PROBE_PREFIX, value_name = "PREFIX")]
    pub(crate) symbol_prefix: String,
}

#[derive(Parser, Debug)]
pub(crate) struct TimingCommand {
    /// Measurements per probe
    #[arg(
        short = 'n',
        long,
        default_value_t = 200_000,
        value_name = "COUNT",
        help = "Number of timed calls per probe, split between both input classes"
    )]
    pub(crate) samples: usize,

    /// Seed for the input generator
    #[arg(short, long, default_value_t = 0, value_name = "SEED")]
    pub(crate) seed: u64,

    /// |t| above this value is reported as a leak
    #[arg(short, long, default_value_t = 4.5, value_name = "T")]
    pub(crate) threshold: f64,

    /// Measurements above this percentile are discarded before the test
    #[arg(long, default_value_t = 0.95, value_name = "FRACTION")]
    pub(crate) crop: f64,

    /// Restrict to one operation
    #[arg(long, value_enum)]
    pub(crate) op: Option<Op>,

    /// Restrict to one operand width
    #[arg(short, long, value_enum)]
    pub(crate) width: Option<Width>,
}

/// Primitive under test.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Eq,
    Ne,
    Le,
    Gt,
    Ge,
    Lt,
    Select,
    Swap,
}

/// Operand width in bits.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    #[value(name = "8")]
    W8,
    #[value(name = "16")]
    W16,
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

impl Width {
    pub(crate) fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
