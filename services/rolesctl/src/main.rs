//! rolesctl: inspect and check the platform's reserved roles.
//!
//! # Purpose
//! Loads configuration, installs tracing, evaluates one subcommand against the
//! reserved-role registry and prints the result.
//!
//! # Notes
//! Exit status is 0 when the role was found or the check was allowed, 1 when
//! it was not, and 2 when configuration or output fails.
use anyhow::Result;
use clap::Parser;
use rolesctl::commands::{self, Command};
use rolesctl::config::{OutputFormat, RolesCtlConfig};
use rolesctl::observability;
use std::process::ExitCode;
use warden_authz::ReservedRoleRegistry;

#[derive(Parser, Debug)]
#[command(name = "rolesctl")]
#[command(about = "Inspect and check the platform's reserved roles")]
struct Args {
    /// Output format (overrides WARDEN_ROLESCTL_OUTPUT)
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,

    /// Log filter directive (overrides WARDEN_LOG)
    #[arg(long)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("rolesctl: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = RolesCtlConfig::from_env_or_yaml()?;
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(log) = args.log {
        config.log_filter = log;
    }
    observability::init_observability(&config.log_filter);
    tracing::debug!(output = %config.output, command = ?args.command, "running rolesctl");

    let registry = ReservedRoleRegistry::global();
    let outcome = commands::run(registry, &args.command);
    println!("{}", outcome.render(config.output)?);
    Ok(outcome.exit_code())
}
