//! Registry of the platform's reserved (built-in) roles.
//!
//! # Purpose
//! Builds the name → [`RoleDescriptor`] table from the literal role table and
//! answers read-only lookups for it.
//!
//! # How it fits
//! Authentication resolves a principal's role names, asks the registry whether
//! each is reserved, and uses [`ReservedRoleRegistry::compiled_role`] for the
//! per-request decision.
//!
//! # Key invariants
//! - The global registry is built exactly once per process; concurrent first
//!   callers block until it is complete and never observe a partial table.
//! - Any invalid built-in role aborts the build; none is silently dropped.
//! - The table is never mutated after the build. Only the compiled-role cache
//!   changes, and rebuilding an entry yields an equal value.
//!
//! # Examples
//! ```rust
//! use warden_authz::ReservedRoleRegistry;
//!
//! let registry = ReservedRoleRegistry::global();
//! assert!(registry.is_reserved("superuser"));
//! assert!(registry.is_reserved("_system"));
//! assert!(registry.role_descriptor("not_a_real_role").is_none());
//! ```
use crate::reserved::{RESERVED_ROLES, ReservedRoleSpec, SYSTEM_ROLE, XPACK_ROLE};
use crate::{AuthzResult, CompiledRole, IndicesPrivileges, PrivilegeCatalog, RoleDescriptor, metadata};
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
pub struct ReservedRoleRegistry {
    catalog: Arc<PrivilegeCatalog>,
    roles: BTreeMap<String, Arc<RoleDescriptor>>,
    compiled: DashMap<String, Arc<CompiledRole>>,
}

impl ReservedRoleRegistry {
    /// The process-wide registry over the built-in catalog.
    ///
    /// # Panics
    /// - If the literal role table does not validate against the built-in
    ///   catalog. Running without a built-in role is not an option.
    pub fn global() -> &'static ReservedRoleRegistry {
        static GLOBAL: OnceLock<ReservedRoleRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let catalog = Arc::new(PrivilegeCatalog::builtin().clone());
            ReservedRoleRegistry::build(catalog).expect("reserved role table must be valid")
        })
    }

    /// Build a registry from the literal reserved-role table.
    ///
    /// # Errors
    /// - [`crate::AuthzError::InvalidRoleDefinition`] for the first role that
    ///   references an unknown privilege or has a malformed index group.
    pub fn build(catalog: Arc<PrivilegeCatalog>) -> AuthzResult<Self> {
        Self::from_specs(catalog, RESERVED_ROLES)
    }

    pub(crate) fn from_specs(
        catalog: Arc<PrivilegeCatalog>,
        specs: &[ReservedRoleSpec],
    ) -> AuthzResult<Self> {
        let mut roles = BTreeMap::new();
        for spec in specs {
            let descriptor = descriptor_from_spec(spec, &catalog)?;
            if roles
                .insert(spec.name.to_string(), Arc::new(descriptor))
                .is_some()
            {
                return Err(crate::AuthzError::InvalidRoleDefinition(format!(
                    "duplicate reserved role `{}`",
                    spec.name
                )));
            }
        }
        tracing::info!(roles = roles.len(), "reserved role registry initialized");
        Ok(Self {
            catalog,
            roles,
            compiled: DashMap::new(),
        })
    }

    /// Whether `name` is a built-in role or one of the internal principal roles.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.roles.contains_key(name) || name == SYSTEM_ROLE || name == XPACK_ROLE
    }

    /// Descriptor for a built-in role; `None` for unknown names.
    pub fn role_descriptor(&self, name: &str) -> Option<&RoleDescriptor> {
        self.roles.get(name).map(|role| role.as_ref())
    }

    /// All built-in descriptors, ordered by name.
    pub fn role_descriptors(&self) -> impl Iterator<Item = &RoleDescriptor> {
        self.roles.values().map(|role| role.as_ref())
    }

    /// Names of the built-in roles; excludes the internal principal roles.
    pub fn names(&self) -> BTreeSet<&str> {
        self.roles.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn catalog(&self) -> &PrivilegeCatalog {
        &self.catalog
    }

    /// Usage telemetry for the reserved store; currently always empty.
    pub fn usage_stats(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Compiled permissions for a built-in role, memoized per name.
    pub fn compiled_role(&self, name: &str) -> Option<Arc<CompiledRole>> {
        if let Some(compiled) = self.compiled.get(name) {
            return Some(compiled.clone());
        }
        let descriptor = self.roles.get(name)?;
        // Every descriptor was validated against this catalog at build time.
        let compiled = match CompiledRole::new(descriptor.clone(), self.catalog.clone()) {
            Ok(compiled) => Arc::new(compiled),
            Err(err) => {
                tracing::error!(role = name, error = %err, "failed to compile reserved role");
                return None;
            }
        };
        tracing::debug!(role = name, "compiled reserved role");
        Some(
            self.compiled
                .entry(name.to_string())
                .or_insert(compiled)
                .clone(),
        )
    }

    /// Every descriptor rendered as JSON, keyed by role name.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut out = Map::new();
        for (name, descriptor) in &self.roles {
            out.insert(name.clone(), serde_json::to_value(descriptor.as_ref())?);
        }
        Ok(Value::Object(out))
    }
}

fn descriptor_from_spec(
    spec: &ReservedRoleSpec,
    catalog: &PrivilegeCatalog,
) -> AuthzResult<RoleDescriptor> {
    let mut groups = Vec::with_capacity(spec.indices.len());
    for group in spec.indices {
        let group = IndicesPrivileges::new(group.indices.iter().copied(), group.privileges.iter().copied())
            .map_err(|err| {
                crate::AuthzError::InvalidRoleDefinition(format!("role `{}`: {err}", spec.name))
            })?;
        groups.push(group);
    }
    RoleDescriptor::new(
        spec.name,
        spec.cluster.iter().copied(),
        groups,
        spec.run_as.iter().copied(),
        metadata::reserved(),
        catalog,
    )
}
