//! Call-rate measurement for the diff kernel.
//!
//! Calls the diff repeatedly on one fixed pair of sequences for a fixed
//! wall-clock duration and reports calls per second, once per selected scan
//! tier.
//!
//! Usage:
//!   cargo run --release --bin diff_throughput -- [OPTIONS]
//!
//! Options:
//!   --seconds <f64>   Duration of each measurement (default 10)
//!   --scan <mode>     auto, off, scalar, sse4.1, avx2, avx512, avx512-ymm, neon
//!   --all-tiers       Measure merge-only and every supported tier
//!   --len <n>         Random sequences of this length instead of the fixture
//!   --shared <n>      Leading elements the random sequences share (default len/2)
//!   --seed <u64>      Seed for random sequences (default 42)
//!   --cap <i64>       max_count per call, <= 0 for uncapped (default: length)
//!   --big             Use i64 elements

use std::hint::black_box;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use sortdiff::prelude::*;

/// Options parsed from the command line.
#[derive(Debug)]
struct Options {
    seconds: f64,
    modes: Vec<ScanMode>,
    len: Option<usize>,
    shared: Option<usize>,
    seed: u64,
    cap: Option<i64>,
    big: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seconds: 10.0,
            modes: vec![ScanMode::Auto],
            len: None,
            shared: None,
            seed: 42,
            cap: None,
            big: false,
        }
    }
}

/// Result of measuring one kernel.
#[derive(Debug, Clone)]
struct Measurement {
    label: String,
    calls: u64,
    elapsed: Duration,
    diffs: usize,
}

impl Measurement {
    fn calls_per_sec(&self) -> f64 {
        self.calls as f64 / self.elapsed.as_secs_f64()
    }
}

/// 56 elements: 48 shared, then 8 offset by one. Counts 2 under any cap of
/// at least 2.
fn fixture<T: DiffElement>() -> (Vec<T>, Vec<T>) {
    let mut i: Vec<T> = (41..=88).map(T::from_i64).collect();
    let mut j = i.clone();
    i.extend((89..=96).map(T::from_i64));
    j.extend((90..=97).map(T::from_i64));
    (i, j)
}

/// Cap passed on every call: `--cap` as a raw `max_count`, otherwise the
/// sequence length.
fn call_cap(raw: Option<i64>, len: usize) -> Cap {
    raw.map_or(Cap::AtMost(len), Cap::from_raw)
}

/// Runs `kernel` on `a`, `b` until `duration` has passed.
fn measure<T: DiffElement>(
    label: String,
    kernel: DiffKernel,
    (a, b): (&[T], &[T]),
    cap: Cap,
    duration: Duration,
) -> Measurement {
    let mut calls = 0u64;
    let mut diffs = 0;

    let start = Instant::now();
    let deadline = start + duration;

    // Check the clock every 1024 calls; each call is far below a microsecond
    while Instant::now() < deadline {
        for _ in 0..1024 {
            diffs = kernel.count(black_box(a), black_box(b), black_box(cap));
        }
        calls += 1024;
    }

    Measurement {
        label,
        calls,
        elapsed: start.elapsed(),
        diffs,
    }
}

fn kernels(modes: &[ScanMode]) -> Vec<(String, DiffKernel)> {
    modes
        .iter()
        .filter_map(|mode| match mode.resolve() {
            Ok(kernel) => Some((mode.to_string(), kernel)),
            Err(err) => {
                log::warn!("skipping {mode}: {err}");
                None
            }
        })
        .collect()
}

fn run<T: DiffElement>(options: &Options) -> Vec<Measurement> {
    let (a, b) = match options.len {
        Some(len) => {
            let shared = options.shared.unwrap_or(len / 2);
            let mut rng = Random::new(options.seed);
            let pair = rng.sequence_pair::<T>(len, shared, 3);
            log::info!(
                "generated {len} elements ({shared} shared) from seed {} in {} draws",
                rng.seed(),
                rng.steps()
            );
            pair
        }
        None => fixture::<T>(),
    };
    let duration = Duration::from_secs_f64(options.seconds);
    let cap = call_cap(options.cap, a.len());

    println!(
        "{} x i{} elements, {cap:?}, {:.1} s per kernel",
        a.len(),
        T::BITS,
        options.seconds
    );

    kernels(&options.modes)
        .into_iter()
        .map(|(label, kernel)| {
            log::debug!("measuring {label} ({:?})", kernel.tier());
            measure(label, kernel, (&a, &b), cap, duration)
        })
        .collect()
}

fn print_results(results: &[Measurement]) {
    println!("{:-<80}", "");
    for m in results {
        println!(
            "{:<12} {:>16} calls / {:<14.9} s = {:>16.1} calls/sec  (diffs = {})",
            m.label,
            m.calls,
            m.elapsed.as_secs_f64(),
            m.calls_per_sec(),
            m.diffs
        );
    }
}

fn print_usage() {
    println!("Usage: diff_throughput [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seconds <f64>   Duration of each measurement (default 10)");
    println!("  --scan <mode>     auto, off, scalar, sse4.1, avx2, avx512, avx512-ymm, neon");
    println!("  --all-tiers       Measure merge-only and every supported tier");
    println!("  --len <n>         Random sequences of this length instead of the fixture");
    println!("  --shared <n>      Leading elements the random sequences share (default len/2)");
    println!("  --seed <u64>      Seed for random sequences (default 42)");
    println!("  --cap <i64>       max_count per call, <= 0 for uncapped (default: length)");
    println!("  --big             Use i64 elements");
    println!("  --help, -h        Show this help message");
}

fn parse_value<V: std::str::FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<V, String>
where
    V::Err: std::fmt::Display,
{
    let raw = args.next().ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse().map_err(|e| format!("invalid value '{raw}' for {flag}: {e}"))
}

fn parse_args() -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" => {
                options.seconds = parse_value(&mut args, "--seconds")?;
                if !(options.seconds > 0.0 && options.seconds.is_finite()) {
                    return Err("--seconds must be positive".into());
                }
            }
            "--scan" => options.modes = vec![parse_value(&mut args, "--scan")?],
            "--all-tiers" => {
                options.modes = std::iter::once(ScanMode::Disabled)
                    .chain(ScanTier::supported().map(ScanMode::Force))
                    .collect();
            }
            "--len" => options.len = Some(parse_value(&mut args, "--len")?),
            "--shared" => options.shared = Some(parse_value(&mut args, "--shared")?),
            "--seed" => options.seed = parse_value(&mut args, "--seed")?,
            "--cap" => options.cap = Some(parse_value(&mut args, "--cap")?),
            "--big" => options.big = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other => return Err(format!("unknown option: {other}")),
        }
    }

    Ok(Some(options))
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match parse_args() {
        Ok(Some(options)) => options,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    println!("sortdiff {} call-rate measurement", sortdiff::VERSION);
    println!("default kernel: {:?}", default_kernel().tier());

    let results = if options.big {
        run::<i64>(&options)
    } else {
        run::<i32>(&options)
    };

    if results.is_empty() {
        eprintln!("no runnable scan mode selected");
        return ExitCode::FAILURE;
    }

    print_results(&results);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cap_is_length() {
        assert_eq!(call_cap(None, 56), Cap::AtMost(56));
        assert_eq!(call_cap(Some(0), 56), Cap::Unbounded);
        assert_eq!(call_cap(Some(-1), 56), Cap::Unbounded);
        assert_eq!(call_cap(Some(3), 56), Cap::AtMost(3));
    }

    #[test]
    fn test_fixture_counts_two_at_default_cap() {
        let (a, b) = fixture::<i32>();
        let cap = call_cap(None, a.len());
        assert_eq!(a.len(), 56);
        for tier in ScanTier::supported() {
            let kernel = DiffKernel::with_tier(tier).unwrap();
            assert_eq!(kernel.count(&a, &b, cap), 2, "{tier}");
        }
        assert_eq!(DiffKernel::merge_only().count(&a, &b, cap), 2);
    }
}
