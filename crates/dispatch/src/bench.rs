//! Timing loop for comparing dispatch strategies.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use rand::Rng;
use switchpoint_primitives::Value;

use crate::class::Instance;
use crate::error::Result;
use crate::strategy::{Invoker, Strategy};

/// Upper bound (exclusive) of generated integer arguments.
pub const ARG_RANGE: i64 = 1_000_000;

/// Outcome of one timed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchReport {
	/// Strategy that was timed.
	pub strategy: Strategy,
	/// Number of calls made.
	pub times: u64,
	/// Wall time for all calls, argument generation included.
	pub elapsed: Duration,
}

impl BenchReport {
	/// Total time in milliseconds.
	pub fn elapsed_ms(&self) -> f64 {
		self.elapsed.as_secs_f64() * 1_000.0
	}

	/// Mean time per call in nanoseconds. Zero when no calls were made.
	pub fn average_ns(&self) -> f64 {
		if self.times == 0 {
			return 0.0;
		}
		self.elapsed.as_secs_f64() * 1e9 / self.times as f64
	}
}

impl fmt::Display for BenchReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} * {}: {:.2} [msec], average: {:.2} [nsec]",
			self.strategy.title(),
			self.times,
			self.elapsed_ms(),
			self.average_ns()
		)
	}
}

/// Fills a fresh argument vector with random integers in `0..ARG_RANGE`.
pub fn random_ints<R: Rng>(rng: &mut R, count: usize) -> Vec<Value> {
	(0..count).map(|_| Value::Int(rng.random_range(0..ARG_RANGE))).collect()
}

/// Calls `invoker` `times` times with fresh random integer arguments.
///
/// Stops at the first failed call.
pub fn run<R: Rng>(invoker: &dyn Invoker, receiver: &Instance, times: u64, rng: &mut R) -> Result<BenchReport> {
	let arity = invoker.method_type().arity();
	let start = Instant::now();
	for _ in 0..times {
		let args = random_ints(rng, arity);
		black_box(invoker.call(receiver, black_box(&args))?);
	}
	Ok(BenchReport {
		strategy: invoker.strategy(),
		times,
		elapsed: start.elapsed(),
	})
}
