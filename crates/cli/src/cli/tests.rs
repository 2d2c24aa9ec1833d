use clap::Parser;
use pretty_assertions::assert_eq;

use super::*;

fn parse(args: &[&str]) -> Cli {
	Cli::try_parse_from(std::iter::once("switchpoint").chain(args.iter().copied())).unwrap()
}

#[test]
fn scenario_flags_override_config() {
	let cli = parse(&["scenario", "--name", "greeting", "--second", "Baz", "--invokes", "5"]);
	let Command::Scenario(args) = cli.command else {
		panic!("expected scenario");
	};

	let config = args.apply(ScenarioConfig::default());
	assert_eq!(
		config,
		ScenarioConfig {
			name: "greeting".into(),
			first: "Foo".into(),
			second: "Baz".into(),
			invokes: 5,
			placeholder: Some("(null)".into()),
		}
	);
}

#[test]
fn fail_on_missing_clears_placeholder() {
	let Command::Scenario(args) = parse(&["scenario", "--fail-on-missing"]).command else {
		panic!("expected scenario");
	};
	assert_eq!(args.apply(ScenarioConfig::default()).placeholder, None);
}

#[test]
fn placeholder_conflicts_with_fail_on_missing() {
	let result = Cli::try_parse_from(["switchpoint", "scenario", "--placeholder", "x", "--fail-on-missing"]);
	assert!(result.is_err());
}

#[test]
fn bench_flags_override_config() {
	let cli = parse(&["-v", "bench", "-n", "1000", "--seed", "9", "--strategy", "method-handle"]);
	assert!(cli.verbose);
	let Command::Bench(args) = cli.command else {
		panic!("expected bench");
	};

	let config = args.apply(BenchConfig::default());
	assert_eq!(config.times, 1000);
	assert_eq!(config.rounds, 10);
	assert_eq!(config.seed, Some(9));
	assert_eq!(config.strategy, StrategyChoice::MethodHandle);
}

#[test]
fn global_flags_follow_subcommand() {
	let cli = parse(&["bench", "--config", "/tmp/switchpoint.toml", "--verbose"]);
	assert_eq!(cli.config, Some(PathBuf::from("/tmp/switchpoint.toml")));
	assert!(cli.verbose);
}

#[test]
fn strategy_choice_order() {
	assert_eq!(StrategyChoice::Reflection.strategies(), &[Strategy::Reflection]);
	assert_eq!(
		StrategyChoice::Both.strategies(),
		&[Strategy::MethodHandle, Strategy::Reflection]
	);
}
