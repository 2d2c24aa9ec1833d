//! The invalidation walkthrough: bind, serve from cache, invalidate, rebind.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use switchpoint_callsite::{CallSite, ConstantResolver, ConstantStore, MissingPolicy, SiteStats};
use switchpoint_primitives::{MethodType, TypeTag, Value};
use tracing::info;

use crate::config::ScenarioConfig;

/// What a scenario run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
	/// Every value returned by the site, in call order.
	pub values: Vec<Value>,
	/// Resolver invocations across the run.
	pub resolver_calls: u64,
	/// Site counters at the end of the run.
	pub stats: SiteStats,
}

/// Runs the scenario and writes one line per step to `out`.
pub fn run(config: &ScenarioConfig, out: &mut impl Write) -> anyhow::Result<ScenarioOutcome> {
	let store = ConstantStore::new();
	let resolver = Arc::new(ConstantResolver::new());
	let policy = match &config.placeholder {
		Some(text) => MissingPolicy::Placeholder(Value::from(text.as_str())),
		None => MissingPolicy::Fail,
	};
	let site = CallSite::new(config.name.as_str(), MethodType::nullary(TypeTag::Any), resolver.clone())
		.and_then(|site| site.with_missing_policy(policy))
		.context("creating call site")?;

	let mut values = Vec::with_capacity(config.invokes * 2);

	store.set(&config.name, config.first.as_str());
	writeln!(out, "set {} = {}", config.name, config.first)?;
	invoke_batch(&site, &store, config.invokes, &mut values, out)?;

	let revoked = store.invalidator().invalidate(&config.name);
	writeln!(out, "invalidated {} ({revoked} guard(s) revoked)", config.name)?;

	store.set(&config.name, config.second.as_str());
	writeln!(out, "set {} = {}", config.name, config.second)?;
	invoke_batch(&site, &store, config.invokes, &mut values, out)?;

	let outcome = ScenarioOutcome {
		values,
		resolver_calls: resolver.calls(),
		stats: site.stats(),
	};
	writeln!(
		out,
		"{} invokes, {} resolutions",
		outcome.values.len(),
		outcome.resolver_calls
	)?;
	info!(
		site = %config.name,
		resolutions = outcome.stats.resolutions,
		misses = outcome.stats.misses,
		"scenario finished"
	);
	Ok(outcome)
}

fn invoke_batch(
	site: &CallSite,
	store: &ConstantStore,
	count: usize,
	values: &mut Vec<Value>,
	out: &mut impl Write,
) -> anyhow::Result<()> {
	for _ in 0..count {
		let value = site
			.invoke(store)
			.with_context(|| format!("invoking {}", site.name()))?;
		values.push(value);
		writeln!(out, "invoke {}: {}", values.len(), values[values.len() - 1])?;
	}
	Ok(())
}
