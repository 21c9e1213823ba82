//! Evaluation of rolesctl subcommands against a reserved-role registry.
//!
//! # Purpose
//! Turns a parsed [`Command`] into an [`Outcome`]: a pass/fail flag plus the
//! result in both text and JSON form. Nothing here writes to stdout, so every
//! command can be exercised from tests.
//!
//! # Key invariants
//! - Unknown role names fail the command; they are never treated as empty roles.
//! - Checks only report what the compiled role decides.
use crate::config::OutputFormat;
use anyhow::Result;
use clap::Subcommand;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;
use std::process::ExitCode;
use warden_authz::{CompiledRole, ReservedRoleRegistry, RoleDescriptor};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the built-in role names
    List,
    /// Print a built-in role's definition
    Show { role: String },
    /// Report whether a role name is reserved
    Reserved { name: String },
    /// Check a cluster action or cluster privilege for a role
    CheckCluster { role: String, action: String },
    /// Check an index action or index privilege on an index for a role
    CheckIndex {
        role: String,
        index: String,
        action: String,
    },
    /// Check whether a role may run as another principal
    RunAs { role: String, principal: String },
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub text: String,
    pub json: Value,
}

impl Outcome {
    fn new(success: bool, text: impl Into<String>, json: Value) -> Self {
        Self {
            success,
            text: text.into(),
            json,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.text.clone()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.json)?),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn run(registry: &ReservedRoleRegistry, command: &Command) -> Outcome {
    match command {
        Command::List => list(registry),
        Command::Show { role } => show(registry, role),
        Command::Reserved { name } => reserved(registry, name),
        Command::CheckCluster { role, action } => with_role(registry, role, |compiled| {
            let allowed = compiled.can_perform_cluster_action(action);
            decision(
                allowed,
                format!("cluster action `{action}` for role `{role}`"),
                json!({"role": role, "action": action, "allowed": allowed}),
            )
        }),
        Command::CheckIndex {
            role,
            index,
            action,
        } => with_role(registry, role, |compiled| {
            let allowed = compiled.can_access_index_for_action(index, action);
            decision(
                allowed,
                format!("`{action}` on index `{index}` for role `{role}`"),
                json!({"role": role, "index": index, "action": action, "allowed": allowed}),
            )
        }),
        Command::RunAs { role, principal } => with_role(registry, role, |compiled| {
            let allowed = compiled.can_run_as(principal);
            decision(
                allowed,
                format!("run as `{principal}` for role `{role}`"),
                json!({"role": role, "principal": principal, "allowed": allowed}),
            )
        }),
    }
}

fn list(registry: &ReservedRoleRegistry) -> Outcome {
    let names: Vec<&str> = registry.names().into_iter().collect();
    Outcome::new(true, names.join("\n"), json!({ "roles": names }))
}

fn show(registry: &ReservedRoleRegistry, role: &str) -> Outcome {
    match registry.role_descriptor(role) {
        Some(descriptor) => match serde_json::to_value(descriptor) {
            Ok(value) => {
                let mut body = Map::new();
                body.insert(role.to_string(), value);
                Outcome::new(true, describe(descriptor), Value::Object(body))
            }
            Err(err) => {
                tracing::warn!(role, error = %err, "failed to serialize role descriptor");
                let text = format!("failed to serialize role `{role}`: {err}");
                Outcome::new(false, text.clone(), json!({"role": role, "error": text}))
            }
        },
        None => unknown_role(registry, role),
    }
}

fn reserved(registry: &ReservedRoleRegistry, name: &str) -> Outcome {
    let reserved = registry.is_reserved(name);
    let text = if reserved {
        format!("`{name}` is reserved")
    } else {
        format!("`{name}` is not reserved")
    };
    Outcome::new(reserved, text, json!({"name": name, "reserved": reserved}))
}

fn with_role<F>(registry: &ReservedRoleRegistry, role: &str, check: F) -> Outcome
where
    F: FnOnce(&CompiledRole) -> Outcome,
{
    match registry.compiled_role(role) {
        Some(compiled) => check(&compiled),
        None => unknown_role(registry, role),
    }
}

fn decision(allowed: bool, subject: String, json: Value) -> Outcome {
    let verdict = if allowed { "allowed" } else { "denied" };
    tracing::debug!(allowed, "{subject}");
    Outcome::new(allowed, format!("{verdict}: {subject}"), json)
}

fn unknown_role(registry: &ReservedRoleRegistry, role: &str) -> Outcome {
    // Internal principal roles are reserved but have no descriptor.
    let text = if registry.is_reserved(role) {
        format!("`{role}` is an internal role with no built-in definition")
    } else {
        format!("unknown reserved role `{role}`")
    };
    Outcome::new(false, text.clone(), json!({"role": role, "error": text}))
}

fn describe(descriptor: &RoleDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "role: {}", descriptor.name());
    let _ = writeln!(out, "cluster: {}", join_or_none(descriptor.cluster()));
    if descriptor.indices().is_empty() {
        let _ = writeln!(out, "indices: (none)");
    } else {
        let _ = writeln!(out, "indices:");
        for group in descriptor.indices() {
            let _ = writeln!(
                out,
                "  {} -> {}",
                group.indices().join(", "),
                group.privileges().join(", ")
            );
        }
    }
    let _ = write!(out, "run_as: {}", join_or_none(descriptor.run_as()));
    out
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
