//! Verifies that the compiled primitives stay branch-free and that their
//! latency does not depend on operand values.

mod cli;
mod clock;
mod disasm;
mod probes;
mod timing;

use anyhow::{Context, Result, bail};
use cli::{Cli, Command, DisasmCommand, TimingCommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let args = Cli::parse_args();
    init_tracing(args.verbose)?;

    match args.command {
        Command::Disasm(cmd) => run_disasm(cmd),
        Command::Timing(cmd) => run_timing(cmd),
        Command::Probes => {
            for probe in probes::PROBES {
                println!("{}", probe.name);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .context("failed to init tracing")
}

fn run_disasm(args: DisasmCommand) -> Result<()> {
    let binary = match args.binary {
        Some(path) => path,
        None => std::env::current_exe().context("failed to locate own executable")?,
    };

    let text = disasm::run_objdump(&args.objdump, &binary)?;
    let scans = disasm::scan(&text, &args.symbol_prefix);
    if scans.is_empty() {
        bail!(
            "no functions starting with {:?} found in {}",
            args.symbol_prefix,
            binary.display()
        );
    }

    let mut dirty = 0;
    for func in &scans {
        if func.is_clean() {
            println!("ok    {} ({} instructions)", func.name, func.instructions);
            continue;
        }
        dirty += 1;
        println!("FAIL  {} ({} instructions)", func.name, func.instructions);
        for finding in &func.branches {
            println!("        {}: {}", finding.address, finding.instruction);
        }
    }

    info!(scanned = scans.len(), dirty, "disassembly scan finished");
    if dirty > 0 {
        bail!("{dirty} of {} functions contain conditional branches", scans.len());
    }
    Ok(())
}

fn run_timing(args: TimingCommand) -> Result<()> {
    if args.samples < 2 {
        bail!("at least two samples are needed, got {}", args.samples);
    }
    if !(0.0..=1.0).contains(&args.crop) {
        bail!("crop must be within 0..=1, got {}", args.crop);
    }

    let config = timing::TimingConfig {
        samples: args.samples,
        seed: args.seed,
        threshold: args.threshold,
        crop: args.crop,
    };
    let selected: Vec<_> = probes::select(args.op, args.width).collect();
    if selected.is_empty() {
        bail!("no probe matches the given filters");
    }
    if cfg!(debug_assertions) {
        warn!("timing an unoptimized build; results do not reflect release codegen");
    }

    info!(
        probes = selected.len(),
        samples = config.samples,
        seed = config.seed,
        "running fixed-vs-random timing test"
    );
    let verdicts = timing::run(selected, &config);

    println!(
        "{:<28} {:>14} {:>14} {:>10}",
        "probe",
        format!("fixed ({})", clock::UNIT),
        format!("random ({})", clock::UNIT),
        "t"
    );
    let mut leaks = 0;
    for v in &verdicts {
        println!(
            "{:<28} {:>14.2} {:>14.2} {:>10.2}{}",
            v.probe,
            v.fixed.mean,
            v.random.mean,
            v.t,
            if v.leak { "  LEAK" } else { "" }
        );
        leaks += v.leak as usize;
    }

    if leaks > 0 {
        bail!(
            "{leaks} of {} probes exceed |t| > {}",
            verdicts.len(),
            config.threshold
        );
    }
    Ok(())
}
