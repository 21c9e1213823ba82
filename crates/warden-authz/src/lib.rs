//! Warden reserved-role authorization primitives.
//!
//! # Purpose
//! Defines the platform's built-in privileges and roles and evaluates them:
//! a privilege catalog, validated role descriptors, the reserved-role
//! registry and compiled roles for per-request checks.
//!
//! # How it fits
//! Request handlers look up the caller's role names in the
//! [`ReservedRoleRegistry`], then ask the [`CompiledRole`] whether a cluster
//! action or an index action is allowed.
//!
//! # Key invariants
//! - The reserved table is built once per process and never mutated.
//! - Every privilege a descriptor references resolves in the catalog.
//! - Grants are additive; whatever no privilege matches is denied.
//!
//! # Important configuration
//! - None; the catalog and the role table are compiled in.
//!
//! # Examples
//! ```rust
//! use warden_authz::ReservedRoleRegistry;
//!
//! let registry = ReservedRoleRegistry::global();
//! let watcher = registry.compiled_role("watcher_user").unwrap();
//! assert!(watcher.can_access_index_for_action(".watcher-history-2024.01.01", "read"));
//! assert!(!watcher.can_access_index_for_action(".watcher-history-2024.01.01", "write"));
//! ```
//!
//! # Common pitfalls
//! - Passing a cluster privilege name to an index check (or the reverse) is
//!   denied, since the two scopes are separate namespaces.
//! - `names()` does not list `_system` and `_xpack` even though both are
//!   reserved.

mod compiled;
mod descriptor;
mod errors;
mod matcher;
pub mod metadata;
mod privilege;
mod registry;
pub mod reserved;

pub use compiled::CompiledRole;
pub use descriptor::{IndicesPrivileges, RoleDescriptor};
pub use errors::{AuthzError, AuthzResult};
pub use matcher::{PatternSet, PatternTerm, any_match, wildcard_match};
pub use privilege::{
    CLUSTER_PRIVILEGES, INDEX_PRIVILEGES, PrivilegeCatalog, PrivilegeDef, PrivilegeScope,
};
pub use registry::ReservedRoleRegistry;
