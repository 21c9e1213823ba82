//! Role descriptors: the declarative, validated form of a role.
//!
//! # Purpose
//! Holds a role's cluster privileges, index privilege groups, run-as
//! principals and metadata. Values are validated on construction and are
//! immutable afterwards.
//!
//! # Key invariants
//! - A descriptor only references privilege names the catalog resolves.
//! - Every index group has at least one index pattern and one privilege.
//! - Equality compares every field, not just the name.
//!
//! # Examples
//! ```rust
//! use warden_authz::{IndicesPrivileges, PrivilegeCatalog, RoleDescriptor, metadata};
//!
//! let group = IndicesPrivileges::new([".logs-*"], ["read"]).unwrap();
//! let role = RoleDescriptor::new(
//!     "log_reader",
//!     ["monitor"],
//!     vec![group],
//!     Vec::<String>::new(),
//!     metadata::Metadata::new(),
//!     PrivilegeCatalog::builtin(),
//! )
//! .unwrap();
//! assert_eq!(role.cluster(), ["monitor"]);
//! ```
use crate::metadata::Metadata;
use crate::{AuthzError, AuthzResult, PrivilegeCatalog, PrivilegeScope};
use serde::Serialize;

/// Index patterns paired with the index privileges granted on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicesPrivileges {
    #[serde(rename = "names")]
    indices: Vec<String>,
    privileges: Vec<String>,
}

impl IndicesPrivileges {
    /// Build an index privilege group.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidRoleDefinition`] if either list is empty or holds
    ///   a blank entry.
    pub fn new<I, P>(indices: I, privileges: P) -> AuthzResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let indices: Vec<String> = indices.into_iter().map(Into::into).collect();
        let privileges: Vec<String> = privileges.into_iter().map(Into::into).collect();
        if indices.is_empty() {
            return Err(AuthzError::InvalidRoleDefinition(
                "indices privileges must name at least one index".to_string(),
            ));
        }
        if privileges.is_empty() {
            return Err(AuthzError::InvalidRoleDefinition(
                "indices privileges must grant at least one privilege".to_string(),
            ));
        }
        if indices.iter().chain(&privileges).any(|entry| entry.trim().is_empty()) {
            return Err(AuthzError::InvalidRoleDefinition(
                "indices privileges must not contain blank entries".to_string(),
            ));
        }
        Ok(Self {
            indices,
            privileges,
        })
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn privileges(&self) -> &[String] {
        &self.privileges
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDescriptor {
    #[serde(skip)]
    name: String,
    cluster: Vec<String>,
    indices: Vec<IndicesPrivileges>,
    run_as: Vec<String>,
    metadata: Metadata,
}

impl RoleDescriptor {
    /// Build a descriptor, checking every privilege name against `catalog`.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidRoleDefinition`] for an empty name or a privilege
    ///   name the catalog does not know in the matching scope.
    pub fn new<C, R>(
        name: impl Into<String>,
        cluster: C,
        indices: Vec<IndicesPrivileges>,
        run_as: R,
        metadata: Metadata,
        catalog: &PrivilegeCatalog,
    ) -> AuthzResult<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuthzError::InvalidRoleDefinition(
                "role name must not be empty".to_string(),
            ));
        }
        let cluster: Vec<String> = cluster.into_iter().map(Into::into).collect();
        for privilege in &cluster {
            check_privilege(catalog, &name, privilege, PrivilegeScope::Cluster)?;
        }
        for group in &indices {
            for privilege in group.privileges() {
                check_privilege(catalog, &name, privilege, PrivilegeScope::Index)?;
            }
        }
        Ok(Self {
            name,
            cluster,
            indices,
            run_as: run_as.into_iter().map(Into::into).collect(),
            metadata,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cluster(&self) -> &[String] {
        &self.cluster
    }

    pub fn indices(&self) -> &[IndicesPrivileges] {
        &self.indices
    }

    pub fn run_as(&self) -> &[String] {
        &self.run_as
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether the metadata marks this role as a built-in.
    pub fn is_reserved(&self) -> bool {
        crate::metadata::is_reserved(&self.metadata)
    }

    /// True when the role grants nothing at all.
    pub fn is_empty(&self) -> bool {
        self.cluster.is_empty() && self.indices.is_empty() && self.run_as.is_empty()
    }
}

fn check_privilege(
    catalog: &PrivilegeCatalog,
    role: &str,
    privilege: &str,
    scope: PrivilegeScope,
) -> AuthzResult<()> {
    catalog
        .resolve(privilege, scope)
        .map(|_| ())
        .map_err(|err| AuthzError::InvalidRoleDefinition(format!("role `{role}`: {err}")))
}
