use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use shade_cli::config::{
	CONFIG_FILE_NAME, compile_relocations, discover_configs, generate_init_template,
	load_config_file, load_merged_config, user_config_path,
};
use shade_cli::relocation::{RelocatorSet, SimpleRelocator};

#[derive(Parser)]
#[command(name = "shade")]
#[command(
	author,
	version,
	about = "Relocate class names, resource paths and source text for shaded archives"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .shade.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .shade.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Relocate dotted class names
	Class {
		#[command(flatten)]
		relocations: RelocationArgs,

		/// Class names such as org.example.Foo
		#[arg(required = true)]
		names: Vec<String>,
	},
	/// Relocate resource or class file paths
	Path {
		#[command(flatten)]
		relocations: RelocationArgs,

		/// Paths such as org/example/Foo.class
		#[arg(required = true)]
		paths: Vec<String>,
	},
	/// Rewrite source text from a file (or stdin) to stdout
	Source {
		#[command(flatten)]
		relocations: RelocationArgs,

		/// Source file to read; stdin when omitted
		file: Option<PathBuf>,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration files and their relocations
	Show,
	/// Check all config files for errors without relocating anything
	Validate,
}

/// Where relocations come from: a single ad-hoc rule, a config file, or discovery.
#[derive(Args)]
struct RelocationArgs {
	/// Load relocations from this file instead of discovering .shade.toml
	#[arg(long, value_name = "FILE", conflicts_with = "pattern")]
	config: Option<PathBuf>,

	/// Source pattern of an ad-hoc relocation
	#[arg(long)]
	pattern: Option<String>,

	/// Shaded pattern of the ad-hoc relocation (defaults to hidden.<pattern>)
	#[arg(long, requires = "pattern")]
	shaded_pattern: Option<String>,

	/// Include glob for the ad-hoc relocation (repeatable)
	#[arg(long = "include", value_name = "GLOB", requires = "pattern")]
	includes: Vec<String>,

	/// Exclude glob for the ad-hoc relocation (repeatable)
	#[arg(long = "exclude", value_name = "GLOB", requires = "pattern")]
	excludes: Vec<String>,

	/// Treat the ad-hoc pattern as a regex applied to paths only
	#[arg(long, requires = "pattern")]
	raw: bool,
}

fn main() -> ExitCode {
	init_tracing();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing() {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_env("SHADE_LOG").unwrap_or_else(|_| "warn".into()))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Class { relocations, names }) => handle_class(&relocations, &names),
		Some(Commands::Path { relocations, paths }) => handle_path(&relocations, &paths),
		Some(Commands::Source { relocations, file }) => {
			handle_source(&relocations, file.as_deref())
		}
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn load_relocators(args: &RelocationArgs) -> Result<RelocatorSet> {
	if let Some(ref pattern) = args.pattern {
		let relocator = SimpleRelocator::with_raw_string(
			pattern,
			args.shaded_pattern.as_deref(),
			&args.includes,
			&args.excludes,
			args.raw,
		)
		.with_context(|| format!("Invalid relocation: {pattern}"))?;
		return Ok([relocator].into_iter().collect());
	}

	let merged = match args.config {
		Some(ref path) => load_config_file(path)
			.with_context(|| format!("Failed to load {}", path.display()))?,
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd).context("Failed to load configuration")?
		}
	};

	let relocators = compile_relocations(&merged).context("Failed to compile relocations")?;
	if relocators.is_empty() {
		anyhow::bail!("No relocations configured. Use --pattern or create a {CONFIG_FILE_NAME}.");
	}
	Ok(relocators)
}

fn handle_class(args: &RelocationArgs, names: &[String]) -> Result<ExitCode> {
	let relocators = load_relocators(args)?;

	for name in names {
		match relocators.map_class(name)? {
			Some(relocated) => {
				tracing::debug!(class = %name, relocated = %relocated, "relocated class");
				println!("{name} -> {relocated}");
			}
			None => println!("{name}"),
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_path(args: &RelocationArgs, paths: &[String]) -> Result<ExitCode> {
	let relocators = load_relocators(args)?;

	for path in paths {
		match relocators.map_path(path)? {
			Some(relocated) => {
				tracing::debug!(path = %path, relocated = %relocated, "relocated path");
				println!("{path} -> {relocated}");
			}
			None => println!("{path}"),
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_source(args: &RelocationArgs, file: Option<&Path>) -> Result<ExitCode> {
	let relocators = load_relocators(args)?;

	let content = match file {
		Some(path) => std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read {}", path.display()))?,
		None => {
			let mut content = String::new();
			std::io::stdin()
				.read_to_string(&mut content)
				.context("Failed to read stdin")?;
			content
		}
	};

	print!("{}", relocators.apply_to_source_text(&content));
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# no-external-lookup: {}", loaded.config.no_external_lookup);
		if let Some(ref env_var) = loaded.config.user_config_lookup_disable_env_var {
			println!("# user-config-lookup-disable-env-var: {}", env_var);
		}
		println!("# relocations: {}", loaded.config.relocations.len());
		println!();

		for (i, relocation) in loaded.config.relocations.iter().enumerate() {
			println!("  Relocation {}:", i + 1);
			println!("    pattern: {}", relocation.pattern);
			if let Some(ref shaded) = relocation.shaded_pattern {
				println!("    shaded_pattern: {}", shaded);
			}
			if !relocation.includes.is_empty() {
				println!("    includes: {}", relocation.includes.join(", "));
			}
			if !relocation.excludes.is_empty() {
				println!("    excludes: {}", relocation.excludes.join(", "));
			}
			if relocation.raw_string {
				println!("    raw_string: true");
			}
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let validated = discover_configs(&cwd).and_then(|configs| {
		for loaded in &configs {
			for relocation in &loaded.config.relocations {
				relocation.compile()?;
			}
		}
		Ok(configs)
	});

	match validated {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} relocations)",
						loaded.path.display(),
						loaded.config.relocations.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
