//! Fixed-vs-random differential timing test.
//!
//! Each probe is called with inputs from two classes interleaved at random:
//! a fixed class that always passes the same operands and a random class
//! with uniform operands. If the primitive's timing does not depend on its
//! inputs, both classes share one latency distribution and Welch's t
//! statistic stays near zero.

use std::hint::black_box;

use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::cli::Op;
use crate::clock;
use crate::probes::Probe;

/// Operands used by every fixed-class call.
const FIXED_X: u64 = 0;
const FIXED_Y: u64 = 0;
const FIXED_BRANCH: u64 = u64::MAX;

/// Parameters shared by all probes in a run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimingConfig {
    pub(crate) samples: usize,
    pub(crate) seed: u64,
    pub(crate) threshold: f64,
    pub(crate) crop: f64,
}

/// Outcome for one probe.
#[derive(Debug, Clone)]
pub(crate) struct Verdict {
    pub(crate) probe: &'static str,
    pub(crate) fixed: Stats,
    pub(crate) random: Stats,
    pub(crate) t: f64,
    pub(crate) leak: bool,
}

/// Running mean and variance (Welford).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Stats {
    pub(crate) n: u64,
    pub(crate) mean: f64,
    m2: f64,
}

impl Stats {
    pub(crate) fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Unbiased sample variance; zero below two samples.
    pub(crate) fn variance(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        self.m2 / (self.n - 1) as f64
    }
}

/// Welch's t statistic between two samples.
///
/// Returns zero when both variances vanish, since identical constant
/// samples carry no evidence of a difference.
pub(crate) fn welch_t(a: &Stats, b: &Stats) -> f64 {
    let se = (a.variance() / a.n.max(1) as f64 + b.variance() / b.n.max(1) as f64).sqrt();
    if se == 0.0 {
        return if a.mean == b.mean { 0.0 } else { f64::INFINITY };
    }
    (a.mean - b.mean) / se
}

/// Value at fraction `p` of the sorted measurements.
fn percentile(measurements: &[u64], p: f64) -> u64 {
    let mut sorted = measurements.to_vec();
    sorted.sort_unstable();
    let idx = ((sorted.len() as f64 - 1.0) * p.clamp(0.0, 1.0)).round() as usize;
    sorted.get(idx).copied().unwrap_or(u64::MAX)
}

/// Random operands for one call of `probe`; the branch is a valid truth value.
fn random_inputs(op: Op, rng: &mut ChaCha20Rng) -> (u64, u64, u64) {
    let br = match op {
        Op::Select | Op::Swap => (rng.random::<bool>() as u64).wrapping_neg(),
        _ => 0,
    };
    (br, rng.random(), rng.random())
}

/// Runs the fixed-vs-random test on one probe.
pub(crate) fn run_probe(probe: &Probe, config: &TimingConfig, pb: &ProgressBar) -> Verdict {
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

    // Inputs are drawn up front so RNG work stays outside the timed region.
    let mut classes = Vec::with_capacity(config.samples);
    let mut inputs = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        let random_class: bool = rng.random();
        classes.push(random_class);
        inputs.push(if random_class {
            random_inputs(probe.op, &mut rng)
        } else {
            (FIXED_BRANCH, FIXED_X, FIXED_Y)
        });
    }

    let mut measurements = Vec::with_capacity(config.samples);
    for (i, &(br, x, y)) in inputs.iter().enumerate() {
        let start = clock::now();
        black_box((probe.call)(black_box(br), black_box(x), black_box(y)));
        let end = clock::now();
        measurements.push(end.wrapping_sub(start));

        if i % 4096 == 4095 {
            pb.inc(4096);
        }
    }
    pb.inc((config.samples % 4096) as u64);

    let cutoff = percentile(&measurements, config.crop);
    let (mut fixed, mut random) = (Stats::default(), Stats::default());
    for (&m, &random_class) in measurements.iter().zip(&classes) {
        if m > cutoff {
            continue;
        }
        if random_class {
            random.push(m as f64);
        } else {
            fixed.push(m as f64);
        }
    }

    let t = welch_t(&fixed, &random);
    let leak = t.abs() > config.threshold;
    debug!(
        probe = probe.name,
        cutoff,
        fixed_n = fixed.n,
        random_n = random.n,
        "cropped measurements"
    );
    if leak {
        info!(probe = probe.name, t, "timing difference above threshold");
    }

    Verdict {
        probe: probe.name,
        fixed,
        random,
        t,
        leak,
    }
}

/// Runs the test over `probes`, returning one verdict each.
pub(crate) fn run<'a>(
    probes: impl IntoIterator<Item = &'a Probe>,
    config: &TimingConfig,
) -> Vec<Verdict> {
    let probes: Vec<&Probe> = probes.into_iter().collect();
    let pb = ProgressBar::new((probes.len() * config.samples) as u64);

    let verdicts = probes
        .into_iter()
        .map(|probe| {
            pb.set_message(probe.name);
            run_probe(probe, config, &pb)
        })
        .collect();

    pb.finish_and_clear();
    verdicts
}
