use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config_cloner::logging::*;
use config_cloner::recipe::{parse_property, Recipe};
use config_cloner::transfer::{Transfer, TransferRequest};
use config_cloner::validation::Validator;
use config_cloner::{
	CliConnector, CloneError, Config, ConnectionPool, EntityKind, Gateway, Response,
	ValidationError,
};

/// Exit code for invalid arguments, recipes and configuration
const USAGE_ERROR: u8 = 2;

/// What the selected subcommand will run
enum Plan {
	Transfer(Transfer),
	Recipe(Recipe),
}

fn transfer_command(name: &'static str, about: &'static str) -> Command {
	Command::new(name)
		.about(about)
		.arg(
			Arg::new("force")
				.short('f')
				.long("force")
				.action(ArgAction::SetTrue)
				.help("Overwrite target configuration if it exists"),
		)
		.arg(
			Arg::new("expression")
				.short('e')
				.long("expression")
				.value_name("EXPR")
				.action(ArgAction::Append)
				.help("Transform configuration with s/regex/replacement/flags (repeatable)"),
		)
		.arg(
			Arg::new("location")
				.value_name("LOCATION")
				.action(ArgAction::Append)
				.num_args(1..)
				.help("Source followed by one or more destinations"),
		)
}

fn cli() -> Command {
	Command::new("config-cloner")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Clone jobs, views and nodes between CI server instances")
		.subcommand_required(true)
		.arg(
			Arg::new("dry-run")
				.long("dry-run")
				.global(true)
				.action(ArgAction::SetTrue)
				.help("Fetch sources but do not create or update anything"),
		)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.global(true)
				.help("Configuration file (TOML, or JSON5 for .json/.json5)"),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.global(true)
				.action(ArgAction::SetTrue)
				.help("Debug logging"),
		)
		.arg(
			Arg::new("json")
				.long("json")
				.global(true)
				.action(ArgAction::SetTrue)
				.help("Print a JSON summary instead of streaming output"),
		)
		.subcommand(transfer_command("job", "Clone a job"))
		.subcommand(transfer_command("view", "Clone a view, nested views included"))
		.subcommand(transfer_command("node", "Clone a node"))
		.subcommand(
			Command::new("recipe")
				.about("Run the clone operations listed in a TOML recipe")
				.arg(Arg::new("file").value_name("FILE").required(true))
				.arg(
					Arg::new("property")
						.short('p')
						.long("property")
						.value_name("KEY=VALUE")
						.action(ArgAction::Append)
						.help("Set or override a recipe property (repeatable)"),
				),
		)
}

fn load_config(matches: &ArgMatches) -> Result<Config, CloneError> {
	let path = matches.get_one::<String>("config").map(PathBuf::from);
	let mut config = Config::load(path.as_deref())?;
	if matches.get_flag("dry-run") {
		config.dry_run = true;
	}
	config.validate()?;
	Ok(config)
}

fn plan(matches: &ArgMatches) -> Result<Plan, CloneError> {
	let strings = |m: &ArgMatches, id: &str| -> Vec<String> {
		m.get_many::<String>(id).map(|v| v.cloned().collect()).unwrap_or_default()
	};

	match matches.subcommand() {
		Some(("recipe", sub)) => {
			let file = sub.get_one::<String>("file").map(PathBuf::from).unwrap_or_default();
			let overrides = strings(sub, "property")
				.iter()
				.map(|p| parse_property(p))
				.collect::<Result<Vec<_>, _>>()?;
			Ok(Plan::Recipe(Recipe::load(Path::new(&file), &overrides)?))
		}
		Some((name, sub)) => {
			let kind: EntityKind = name.parse().map_err(ValidationError::Arguments)?;
			let request = TransferRequest::parse(
				kind,
				&strings(sub, "location"),
				sub.get_flag("force"),
				&strings(sub, "expression"),
			)?;
			Ok(Plan::Transfer(Transfer::new(request)))
		}
		None => Err(ValidationError::Arguments("missing subcommand".to_string()).into()),
	}
}

/// Process exit status for a response exit code; codes outside 0..=255 become 1
fn exit_status(code: i32) -> u8 {
	u8::try_from(code).unwrap_or(1)
}

#[tokio::main]
async fn main() -> ExitCode {
	let matches = cli().get_matches();
	let json = matches.get_flag("json");

	let config = match load_config(&matches) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::from(USAGE_ERROR);
		}
	};
	init_tracing(if matches.get_flag("verbose") { "debug" } else { config.log_level.as_str() });

	// Everything is validated before the first remote command
	let plan = match plan(&matches) {
		Ok(plan) => plan,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::from(USAGE_ERROR);
		}
	};

	let mut pool = ConnectionPool::new(Box::new(CliConnector::new(config.cli.clone())));
	let mut response = if json { Response::accumulate() } else { Response::live() };
	{
		let mut gateway = Gateway::new(&mut pool, config.dry_run);
		match &plan {
			Plan::Transfer(transfer) => {
				transfer.run(&mut gateway, &mut response).await;
			}
			Plan::Recipe(recipe) => recipe.run(&mut gateway, &mut response).await,
		}
	}
	if let Err(e) = pool.close() {
		error!("Failed to close connections: {}", e);
	}

	if json {
		let summary = serde_json::json!({
			"succeeded": response.succeeded(),
			"exitCode": response.exit_code(),
			"stdout": response.stdout(),
			"stderr": response.stderr(),
		});
		println!("{}", summary);
	}

	ExitCode::from(exit_status(response.exit_code()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_definition_is_valid() {
		cli().debug_assert();
	}

	#[test]
	fn test_transfer_arguments() {
		let matches = cli()
			.try_get_matches_from([
				"config-cloner",
				"--dry-run",
				"view",
				"-f",
				"-e",
				"s/a/b/",
				"-e",
				"s/c/d/g",
				"http://a/view/x",
				"http://b/",
			])
			.unwrap();

		assert!(matches.get_flag("dry-run"));
		let Plan::Transfer(transfer) = plan(&matches).unwrap() else {
			panic!("expected a transfer");
		};
		let request = transfer.request();
		assert_eq!(request.kind, EntityKind::View);
		assert!(request.force);
		assert_eq!(request.transforms.len(), 2);
		assert_eq!(request.destinations[0].entity(), "x");
	}

	#[test]
	fn test_single_location_is_rejected() {
		let matches = cli().try_get_matches_from(["config-cloner", "job", "http://a/job/x"]).unwrap();
		assert!(matches!(plan(&matches), Err(CloneError::Validation(_))));
	}

	#[test]
	fn test_exit_status_mapping() {
		assert_eq!(exit_status(0), 0);
		assert_eq!(exit_status(3), 3);
		assert_eq!(exit_status(-1), 1);
		assert_eq!(exit_status(300), 1);
	}
}

// vim: ts=4
