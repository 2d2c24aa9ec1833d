//! Switchpoint demo binary.
//!
//! Two subcommands:
//! - `scenario` walks a call site through bind, cache, invalidate, rebind
//! - `bench` times reflective lookup against a pre-resolved handle

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::Config;

mod bench;
mod cli;
mod config;
mod scenario;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
	debug!(?config, "effective configuration before flags");

	let stdout = io::stdout();
	let mut out = stdout.lock();
	match cli.command {
		Command::Scenario(args) => {
			scenario::run(&args.apply(config.scenario), &mut out)?;
		}
		Command::Bench(args) => {
			bench::run(&args.apply(config.bench), &mut out)?;
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	// SWITCHPOINT_LOG takes EnvFilter directives, e.g. `switchpoint_callsite=trace`
	if let Ok(filter) = EnvFilter::try_from_env("SWITCHPOINT_LOG") {
		tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(true))
			.init();
		return;
	}

	tracing_subscriber::fmt()
		.with_writer(io::stderr)
		.with_max_level(if verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::WARN
		})
		.init();
}
