use clap::{Args, Parser, Subcommand};

/// Demonstrates constant-time tag comparison, conditional copy and swap
#[derive(Parser, Debug)]
#[command(name = "ctdemo")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    /// Seed for randomly generated inputs (defaults to OS entropy)
    #[arg(short, long, global = true, value_name = "SEED")]
    pub(crate) seed: Option<u64>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Compare two byte tags in constant time
    Compare(CompareCommand),
    /// Conditionally copy a random source buffer over a destination buffer
    Copy(CopyCommand),
    /// Conditionally swap two 64-bit values
    Swap(SwapCommand),
}

#[derive(Args, Debug)]
pub(crate) struct CompareCommand {
    /// First tag, as text
    #[arg(value_name = "A", requires = "b", conflicts_with = "random")]
    pub(crate) a: Option<String>,

    /// Second tag, as text
    #[arg(value_name = "B")]
    pub(crate) b: Option<String>,

    /// Compare two random tags of this many bytes instead
    #[arg(short, long, value_name = "LEN")]
    pub(crate) random: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct CopyCommand {
    /// Buffer length in bytes
    #[arg(short, long, default_value_t = 16, value_name = "LEN")]
    pub(crate) len: usize,

    /// Force the branch instead of deriving it from the buffers
    #[arg(short, long, value_name = "BOOL")]
    pub(crate) branch: Option<bool>,
}

#[derive(Args, Debug)]
pub(crate) struct SwapCommand {
    /// First value (random if omitted)
    #[arg(value_name = "X", requires = "y")]
    pub(crate) x: Option<u64>,

    /// Second value
    #[arg(value_name = "Y")]
    pub(crate) y: Option<u64>,

    /// Swap if true (random if omitted)
    #[arg(short, long, value_name = "BOOL")]
    pub(crate) branch: Option<bool>,
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
