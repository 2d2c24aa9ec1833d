//! Round-based driver for the dispatch benchmark.

use std::io::Write;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use switchpoint_dispatch::bench::{self, BenchReport};
use switchpoint_dispatch::sample::{TARGET_INTS, sample_class, target_ints_type};
use switchpoint_dispatch::{Instance, prepare};
use tracing::{debug, info};

use crate::config::BenchConfig;

/// Runs `config.rounds` rounds, printing `--` before each and one report line per strategy.
///
/// Invokers are prepared once, before the first round.
pub fn run(config: &BenchConfig, out: &mut impl Write) -> anyhow::Result<Vec<BenchReport>> {
	let class = sample_class();
	let receiver = Instance::new(class.clone());
	let ty = target_ints_type();
	let invokers = config
		.strategy
		.strategies()
		.iter()
		.map(|&strategy| prepare(strategy, &class, TARGET_INTS, &ty))
		.collect::<Result<Vec<_>, _>>()
		.context("preparing invokers")?;

	let mut rng = match config.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	info!(times = config.times, rounds = config.rounds, seed = ?config.seed, "starting benchmark");

	let mut reports = Vec::with_capacity(config.rounds as usize * invokers.len());
	for round in 0..config.rounds {
		writeln!(out, "--")?;
		for invoker in &invokers {
			let report = bench::run(invoker.as_ref(), &receiver, config.times, &mut rng)
				.with_context(|| format!("running {} benchmark", invoker.strategy()))?;
			debug!(round, strategy = %report.strategy, elapsed = ?report.elapsed, "round finished");
			writeln!(out, "{report}")?;
			reports.push(report);
		}
	}
	Ok(reports)
}
