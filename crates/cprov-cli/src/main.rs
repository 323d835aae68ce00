// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cprov_common_secret::EnvSecretProvider;
use cprov_config::{ConfigError, LogFormat, ProvisionerConfig};
use cprov_core::{LiveConnectors, Provisioner, EXIT_FAILURE, EXIT_SUCCESS};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const BOOTSTRAP_LEVEL: &str = "info";

/// Provision an OCI compartment with its admin group, federation mapping,
/// policy and budget.
#[derive(Parser, Debug)]
#[command(name = "cprov", about = "OCI compartment provisioner", version)]
struct Args {
	/// Request envelope: {"RequestBody": "{\"subname\": ..., \"owner\": ..., \"monthlybudget\": ...}"}
	payload: String,

	/// TOML config file (default: /etc/cprov/provisioner.toml)
	#[arg(long, env = "CPROV_CONFIG")]
	config: Option<PathBuf>,

	/// Log level for cprov crates; RUST_LOG takes precedence
	#[arg(long)]
	log_level: Option<String>,

	/// Emit logs as JSON lines
	#[arg(long)]
	json_logs: bool,
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	let code = match run(args).await {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:#}");
			EXIT_FAILURE
		}
	};
	std::process::exit(code);
}

async fn run(args: Args) -> anyhow::Result<i32> {
	let mut config =
		load_config_logged(&args, std::io::stderr).context("failed to load configuration")?;
	apply_overrides(&mut config, &args);
	init_tracing(&config);

	let connectors = LiveConnectors::new(&config).context("failed to build HTTP client")?;
	let secrets = Arc::new(EnvSecretProvider::new());
	let provisioner = Provisioner::new(config, secrets, connectors);

	match provisioner.run(&args.payload).await {
		Ok(report) => {
			println!("{}", serde_json::to_string_pretty(&report)?);
			Ok(EXIT_SUCCESS)
		}
		Err(e) => {
			tracing::error!(error = %e, "provisioning failed");
			Ok(e.exit_code())
		}
	}
}

fn apply_overrides(config: &mut ProvisionerConfig, args: &Args) {
	if let Some(level) = &args.log_level {
		config.logging.level = level.clone();
	}
	if args.json_logs {
		config.logging.format = LogFormat::Json;
	}
}

fn filter_directive(level: &str) -> String {
	format!("cprov={level}")
}

fn env_filter(level: &str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

/// Load configuration under a temporary subscriber built from the command
/// line alone; the global one depends on the loaded logging section.
fn load_config_logged<W>(args: &Args, writer: W) -> Result<ProvisionerConfig, ConfigError>
where
	W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
	let filter = env_filter(args.log_level.as_deref().unwrap_or(BOOTSTRAP_LEVEL));
	let load = || cprov_config::load_config(args.config.clone());

	if args.json_logs {
		let subscriber = tracing_subscriber::fmt()
			.json()
			.with_env_filter(filter)
			.with_writer(writer)
			.finish();
		tracing::subscriber::with_default(subscriber, load)
	} else {
		let subscriber = tracing_subscriber::fmt()
			.compact()
			.with_env_filter(filter)
			.with_writer(writer)
			.finish();
		tracing::subscriber::with_default(subscriber, load)
	}
}

fn init_tracing(config: &ProvisionerConfig) {
	let filter = env_filter(&config.logging.level);
	let registry = tracing_subscriber::registry().with(filter);

	// stdout carries the report
	match config.logging.format {
		LogFormat::Compact => registry
			.with(
				tracing_subscriber::fmt::layer()
					.compact()
					.with_writer(std::io::stderr),
			)
			.init(),
		LogFormat::Pretty => registry
			.with(
				tracing_subscriber::fmt::layer()
					.pretty()
					.with_writer(std::io::stderr),
			)
			.init(),
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init(),
	}
}
