//! Compiled, queryable form of a role descriptor.
//!
//! # Purpose
//! Resolves a descriptor's privilege names through the catalog once so that
//! per-request checks are pattern matches only.
//!
//! # Key invariants
//! - Grants are additive: index groups are OR-ed and there is no deny rule.
//!   Anything not matched is denied.
//! - A request may name a concrete action, an action pattern, or a privilege of
//!   the matching scope. It is granted only when every pattern it resolves to
//!   is covered by the role; unresolvable requests are denied.
//!
//! # Examples
//! ```rust
//! use warden_authz::ReservedRoleRegistry;
//!
//! let registry = ReservedRoleRegistry::global();
//! let role = registry.compiled_role("monitoring_user").unwrap();
//! assert!(role.can_access_index_for_action(".monitoring-es-2024.01.01", "read"));
//! assert!(!role.can_access_index_for_action(".monitoring-es-2024.01.01", "delete"));
//! ```
use crate::matcher::{PatternSet, any_match};
use crate::{AuthzResult, PrivilegeCatalog, PrivilegeScope, RoleDescriptor};
use std::borrow::Cow;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CompiledIndexGroup {
    indices: Vec<String>,
    actions: PatternSet,
}

#[derive(Debug, Clone)]
pub struct CompiledRole {
    descriptor: Arc<RoleDescriptor>,
    catalog: Arc<PrivilegeCatalog>,
    cluster: PatternSet,
    indices: Vec<CompiledIndexGroup>,
}

impl CompiledRole {
    /// Compile `descriptor` against `catalog`.
    ///
    /// # Errors
    /// - [`crate::AuthzError::UnknownPrivilege`] if the descriptor was validated
    ///   against a different catalog that knows names this one does not.
    pub fn new(descriptor: Arc<RoleDescriptor>, catalog: Arc<PrivilegeCatalog>) -> AuthzResult<Self> {
        let mut cluster = PatternSet::default();
        for name in descriptor.cluster() {
            cluster.union(catalog.resolve(name, PrivilegeScope::Cluster)?.as_ref());
        }

        let mut indices = Vec::with_capacity(descriptor.indices().len());
        for group in descriptor.indices() {
            let mut actions = PatternSet::default();
            for name in group.privileges() {
                actions.union(catalog.resolve(name, PrivilegeScope::Index)?.as_ref());
            }
            indices.push(CompiledIndexGroup {
                indices: group.indices().to_vec(),
                actions,
            });
        }

        Ok(Self {
            descriptor,
            catalog,
            cluster,
            indices,
        })
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &RoleDescriptor {
        &self.descriptor
    }

    /// Whether the role may run a cluster action (or holds a cluster privilege).
    pub fn can_perform_cluster_action(&self, action: &str) -> bool {
        match self.request(action, PrivilegeScope::Cluster) {
            Some(requested) => self.cluster.covers(&requested),
            None => false,
        }
    }

    /// Whether any index group both matches `index` and grants `action`.
    pub fn can_access_index_for_action(&self, index: &str, action: &str) -> bool {
        let Some(requested) = self.request(action, PrivilegeScope::Index) else {
            return false;
        };
        self.indices
            .iter()
            .any(|group| any_match(&group.indices, index) && group.actions.covers(&requested))
    }

    /// Keep the candidate indices the role may touch for `action`.
    pub fn allowed_indices<'a, I>(&self, action: &str, candidates: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(requested) = self.request(action, PrivilegeScope::Index) else {
            return Vec::new();
        };
        let granting: Vec<&CompiledIndexGroup> = self
            .indices
            .iter()
            .filter(|group| group.actions.covers(&requested))
            .collect();
        candidates
            .into_iter()
            .filter(|index| granting.iter().any(|group| any_match(&group.indices, index)))
            .collect()
    }

    /// Whether the role may act on behalf of `principal`.
    pub fn can_run_as(&self, principal: &str) -> bool {
        any_match(self.descriptor.run_as(), principal)
    }

    fn request(&self, action: &str, scope: PrivilegeScope) -> Option<Cow<'_, PatternSet>> {
        match self.catalog.resolve(action, scope) {
            Ok(requested) => Some(requested),
            Err(err) => {
                tracing::trace!(role = self.name(), error = %err, "denying unresolvable request");
                None
            }
        }
    }
}
