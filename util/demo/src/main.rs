//! Small programs showing how callers put the constant-time primitives to
//! work: MAC tag comparison, conditional buffer copy and conditional swap.

mod cli;

use anyhow::{Context, Result, bail, ensure};
use cli::{Cli, Command, CompareCommand, CopyCommand, SwapCommand};
use ct_primitives::{ct_compare, ct_copy, ct_swap};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let args = Cli::parse_args();
    init_tracing(args.verbose)?;

    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };

    match args.command {
        Command::Compare(cmd) => run_compare(cmd, &mut rng),
        Command::Copy(cmd) => run_copy(cmd, &mut rng),
        Command::Swap(cmd) => run_swap(cmd, &mut rng),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .context("failed to init tracing")
}

/// Truth mask for a public boolean.
fn mask(flag: bool) -> u32 {
    (flag as u32).wrapping_neg()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn random_bytes(rng: &mut ChaCha20Rng, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

fn run_compare(args: CompareCommand, rng: &mut ChaCha20Rng) -> Result<()> {
    let (a, b) = match (args.a, args.b, args.random) {
        (Some(a), Some(b), None) => (a.into_bytes(), b.into_bytes()),
        (None, None, Some(len)) => (random_bytes(rng, len), random_bytes(rng, len)),
        _ => bail!("pass either two tags or --random <LEN>"),
    };
    debug!(a = %to_hex(&a), b = %to_hex(&b), "comparing tags");

    let res = ct_compare::<u32>(&a, &b);
    println!("{res:#010x}");
    Ok(())
}

fn run_copy(args: CopyCommand, rng: &mut ChaCha20Rng) -> Result<()> {
    ensure!(args.len > 0, "buffer length must be positive");

    let src = random_bytes(rng, args.len);
    let mut dst = random_bytes(rng, args.len);
    let before = dst.clone();

    // Derived from the data so the compiler cannot fold the branch away.
    let br = match args.branch {
        Some(flag) => mask(flag),
        None => (((src[0] ^ dst[0]) & 1) as u32).wrapping_neg(),
    };

    ct_copy(br, &src, &mut dst)?;

    let expected = if br == u32::MAX { &src } else { &before };
    ensure!(&dst == expected, "conditional copy produced unexpected bytes");

    println!("branch {br:#010x}");
    println!("src    {}", to_hex(&src));
    println!("before {}", to_hex(&before));
    println!("after  {}", to_hex(&dst));
    Ok(())
}

fn run_swap(args: SwapCommand, rng: &mut ChaCha20Rng) -> Result<()> {
    let (mut a, mut b) = match (args.x, args.y) {
        (Some(x), Some(y)) => (x, y),
        _ => (rng.random(), rng.random()),
    };
    let br = mask(args.branch.unwrap_or_else(|| rng.random()));

    println!("{br:#010x}\t{a}, {b}");
    ct_swap(br, &mut a, &mut b);
    println!("{br:#010x}\t{a}, {b}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Used only by the integration tests
    use assert_cmd as _;
    use predicates as _;

    #[test]
    fn test_mask() {
        assert_eq!(mask(true), u32::MAX);
        assert_eq!(mask(false), 0);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0x2b, 0xff]), "002bff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_random_bytes_seeded() {
        let a = random_bytes(&mut ChaCha20Rng::seed_from_u64(5), 32);
        let b = random_bytes(&mut ChaCha20Rng::seed_from_u64(5), 32);
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
    }
}
