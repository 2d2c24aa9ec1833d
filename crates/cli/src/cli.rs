use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use switchpoint_dispatch::Strategy;

use crate::config::{BenchConfig, ScenarioConfig};

#[derive(Parser, Debug)]
#[command(name = "switchpoint")]
#[command(about = "Invalidation-guarded call sites and dispatch benchmarks")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the user config directory)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Bind a call site, invoke it, invalidate, and invoke again
	Scenario(ScenarioArgs),
	/// Time reflective against pre-resolved dispatch
	Bench(BenchArgs),
}

/// Flags for `switchpoint scenario`. Unset flags fall back to the config file.
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
	/// Constant name the call site looks up
	#[arg(long)]
	pub name: Option<String>,

	/// Value stored before invalidation
	#[arg(long)]
	pub first: Option<String>,

	/// Value stored after invalidation
	#[arg(long)]
	pub second: Option<String>,

	/// Invokes per batch
	#[arg(long, value_name = "N")]
	pub invokes: Option<usize>,

	/// Value returned while the constant is missing
	#[arg(long, value_name = "TEXT", conflicts_with = "fail_on_missing")]
	pub placeholder: Option<String>,

	/// Treat a missing constant as an error instead of returning a placeholder
	#[arg(long)]
	pub fail_on_missing: bool,
}

impl ScenarioArgs {
	/// Overlays the given flags on `base`.
	pub fn apply(self, mut base: ScenarioConfig) -> ScenarioConfig {
		if let Some(name) = self.name {
			base.name = name;
		}
		if let Some(first) = self.first {
			base.first = first;
		}
		if let Some(second) = self.second {
			base.second = second;
		}
		if let Some(invokes) = self.invokes {
			base.invokes = invokes;
		}
		if self.fail_on_missing {
			base.placeholder = None;
		} else if let Some(placeholder) = self.placeholder {
			base.placeholder = Some(placeholder);
		}
		base
	}
}

/// Flags for `switchpoint bench`. Unset flags fall back to the config file.
#[derive(Args, Debug, Default)]
pub struct BenchArgs {
	/// Calls per timed run
	#[arg(long, short = 'n', value_name = "N")]
	pub times: Option<u64>,

	/// Number of rounds
	#[arg(long, short = 'r', value_name = "R")]
	pub rounds: Option<u32>,

	/// Seed for argument generation
	#[arg(long, value_name = "SEED")]
	pub seed: Option<u64>,

	/// Strategies to time
	#[arg(long, value_enum)]
	pub strategy: Option<StrategyChoice>,
}

impl BenchArgs {
	/// Overlays the given flags on `base`.
	pub fn apply(self, mut base: BenchConfig) -> BenchConfig {
		if let Some(times) = self.times {
			base.times = times;
		}
		if let Some(rounds) = self.rounds {
			base.rounds = rounds;
		}
		if self.seed.is_some() {
			base.seed = self.seed;
		}
		if let Some(strategy) = self.strategy {
			base.strategy = strategy;
		}
		base
	}
}

/// Which dispatch strategies a benchmark round times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyChoice {
	/// Reflective lookup and invoke only.
	Reflection,
	/// Pre-resolved handle only.
	MethodHandle,
	/// Handle first, then reflection.
	Both,
}

impl StrategyChoice {
	/// Strategies in the order they run within a round.
	pub fn strategies(self) -> &'static [Strategy] {
		match self {
			Self::Reflection => &[Strategy::Reflection],
			Self::MethodHandle => &[Strategy::MethodHandle],
			Self::Both => &Strategy::ALL,
		}
	}
}

#[cfg(test)]
mod tests;
