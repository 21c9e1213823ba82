//! Named cluster and index privileges.
//!
//! # Purpose
//! Maps privilege names to the action patterns they grant. Cluster and index
//! privileges live in separate namespaces.
//!
//! # How it fits
//! Role descriptors are validated against the catalog and compiled roles
//! resolve their privilege names through it once, at build time.
//!
//! # Key invariants
//! - Composite privileges are flattened eagerly; includes must name a
//!   privilege in the same scope and must not form a cycle.
//! - `all` covers every other privilege of its scope.
//! - Names that already look like actions resolve to themselves.
//!
//! # Examples
//! ```rust
//! use warden_authz::{PrivilegeCatalog, PrivilegeScope};
//!
//! let catalog = PrivilegeCatalog::builtin();
//! let read = catalog.resolve("read", PrivilegeScope::Index).unwrap();
//! assert!(read.matches("indices:data/read/search"));
//! ```
use crate::matcher::{PatternSet, PatternTerm};
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Namespace a privilege name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeScope {
    Cluster,
    Index,
}

impl PrivilegeScope {
    pub fn as_str(self) -> &'static str {
        match self {
            PrivilegeScope::Cluster => "cluster",
            PrivilegeScope::Index => "index",
        }
    }

    /// Whether `name` is a raw action (or action pattern) of this scope rather
    /// than a named privilege.
    pub fn is_action(self, name: &str) -> bool {
        match self {
            PrivilegeScope::Cluster => {
                name.starts_with("cluster:") || name.starts_with("indices:admin/template/")
            }
            PrivilegeScope::Index => {
                name.starts_with("indices:") || name.starts_with("internal:transport/proxy/indices:")
            }
        }
    }
}

impl std::fmt::Display for PrivilegeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal definition of a named privilege.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeDef {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub excludes: &'static [&'static str],
    /// Other privileges of the same scope folded into this one.
    pub includes: &'static [&'static str],
}

impl PrivilegeDef {
    pub const fn patterns(name: &'static str, patterns: &'static [&'static str]) -> Self {
        Self {
            name,
            patterns,
            excludes: &[],
            includes: &[],
        }
    }

    pub const fn composite(
        name: &'static str,
        includes: &'static [&'static str],
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            patterns,
            excludes: &[],
            includes,
        }
    }

    pub const fn excluding(mut self, excludes: &'static [&'static str]) -> Self {
        self.excludes = excludes;
        self
    }
}

pub const CLUSTER_PRIVILEGES: &[PrivilegeDef] = &[
    PrivilegeDef::patterns("none", &[]),
    PrivilegeDef::patterns("all", &["cluster:*", "indices:admin/template/*"]),
    PrivilegeDef::patterns("monitor", &["cluster:monitor/*"]),
    PrivilegeDef::patterns("monitor_ml", &["cluster:monitor/xpack/ml/*"]),
    PrivilegeDef::patterns("monitor_watcher", &["cluster:monitor/xpack/watcher/*"]),
    PrivilegeDef::patterns("monitor_rollup", &["cluster:monitor/xpack/rollup/*"]),
    PrivilegeDef::patterns("manage", &["cluster:*", "indices:admin/template/*"])
        .excluding(&["cluster:admin/xpack/security/*"]),
    PrivilegeDef::composite("manage_ml", &["monitor_ml"], &["cluster:admin/xpack/ml/*"]),
    PrivilegeDef::composite(
        "manage_watcher",
        &["monitor_watcher"],
        &["cluster:admin/xpack/watcher/*"],
    ),
    PrivilegeDef::composite(
        "manage_rollup",
        &["monitor_rollup"],
        &["cluster:admin/xpack/rollup/*"],
    ),
    PrivilegeDef::patterns("manage_index_templates", &["indices:admin/template/*"]),
    PrivilegeDef::patterns("manage_ingest_pipelines", &["cluster:admin/ingest/pipeline/*"]),
    PrivilegeDef::composite("manage_pipeline", &["manage_ingest_pipelines"], &[]),
    PrivilegeDef::patterns("manage_security", &["cluster:admin/xpack/security/*"]),
    PrivilegeDef::patterns(
        "manage_saml",
        &[
            "cluster:admin/xpack/security/saml/*",
            "cluster:admin/xpack/security/token/invalidate",
            "cluster:admin/xpack/security/token/refresh",
        ],
    ),
    PrivilegeDef::patterns(
        "transport_client",
        &["cluster:monitor/nodes/liveness", "cluster:monitor/state"],
    ),
];

pub const INDEX_PRIVILEGES: &[PrivilegeDef] = &[
    PrivilegeDef::patterns("none", &[]),
    PrivilegeDef::patterns("all", &["indices:*", "internal:transport/proxy/indices:*"]),
    PrivilegeDef::patterns("read", &["indices:data/read/*"]),
    PrivilegeDef::patterns(
        "read_cross_cluster",
        &[
            "internal:transport/proxy/indices:data/read/*",
            "indices:admin/shards/search_shards",
        ],
    ),
    PrivilegeDef::patterns(
        "create",
        &[
            "indices:data/write/index*",
            "indices:data/write/bulk*",
            "indices:admin/mapping/put",
        ],
    ),
    PrivilegeDef::composite("index", &["create"], &["indices:data/write/update*"]),
    PrivilegeDef::patterns(
        "delete",
        &["indices:data/write/delete*", "indices:data/write/bulk*"],
    ),
    PrivilegeDef::patterns(
        "write",
        &["indices:data/write/*", "indices:admin/mapping/put"],
    ),
    PrivilegeDef::patterns("monitor", &["indices:monitor/*"]),
    PrivilegeDef::composite("manage", &["monitor"], &["indices:admin/*"]),
    PrivilegeDef::patterns("create_index", &["indices:admin/create"]),
    PrivilegeDef::patterns("delete_index", &["indices:admin/delete"]),
    PrivilegeDef::patterns(
        "view_index_metadata",
        &[
            "indices:admin/aliases/get",
            "indices:admin/aliases/exists",
            "indices:admin/get",
            "indices:admin/exists",
            "indices:admin/mappings/fields/get*",
            "indices:admin/mappings/get",
            "indices:admin/types/exists",
            "indices:admin/validate/query",
            "indices:data/read/field_caps*",
            "indices:admin/settings/get",
            "indices:admin/shards/search_shards",
        ],
    ),
];

/// Resolved privilege tables for both scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeCatalog {
    cluster: BTreeMap<String, PatternSet>,
    index: BTreeMap<String, PatternSet>,
}

impl PrivilegeCatalog {
    /// Build a catalog from literal definitions, flattening composites.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPrivilegeDefinition`] on duplicate names, includes
    ///   naming an unknown privilege, or include cycles.
    pub fn new(cluster: &[PrivilegeDef], index: &[PrivilegeDef]) -> AuthzResult<Self> {
        Ok(Self {
            cluster: flatten(PrivilegeScope::Cluster, cluster)?,
            index: flatten(PrivilegeScope::Index, index)?,
        })
    }

    /// The platform's built-in privilege catalog, resolved once per process.
    pub fn builtin() -> &'static PrivilegeCatalog {
        static BUILTIN: OnceLock<PrivilegeCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            PrivilegeCatalog::new(CLUSTER_PRIVILEGES, INDEX_PRIVILEGES)
                .expect("built-in privilege definitions must be valid")
        })
    }

    /// Resolve a privilege name (or raw action) to the patterns it grants.
    ///
    /// # Errors
    /// - [`AuthzError::UnknownPrivilege`] when the name is neither a named
    ///   privilege nor an action of `scope`.
    pub fn resolve(&self, name: &str, scope: PrivilegeScope) -> AuthzResult<Cow<'_, PatternSet>> {
        if let Some(set) = self.table(scope).get(name) {
            return Ok(Cow::Borrowed(set));
        }
        if scope.is_action(name) {
            return Ok(Cow::Owned(PatternSet::single(name)));
        }
        Err(AuthzError::UnknownPrivilege {
            scope,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str, scope: PrivilegeScope) -> bool {
        self.table(scope).contains_key(name) || scope.is_action(name)
    }

    /// Named privileges of `scope`, sorted.
    pub fn names(&self, scope: PrivilegeScope) -> impl Iterator<Item = &str> {
        self.table(scope).keys().map(String::as_str)
    }

    fn table(&self, scope: PrivilegeScope) -> &BTreeMap<String, PatternSet> {
        match scope {
            PrivilegeScope::Cluster => &self.cluster,
            PrivilegeScope::Index => &self.index,
        }
    }
}

fn flatten(
    scope: PrivilegeScope,
    defs: &[PrivilegeDef],
) -> AuthzResult<BTreeMap<String, PatternSet>> {
    let mut by_name: HashMap<&str, &PrivilegeDef> = HashMap::with_capacity(defs.len());
    for def in defs {
        if by_name.insert(def.name, def).is_some() {
            return Err(AuthzError::InvalidPrivilegeDefinition(format!(
                "duplicate {scope} privilege `{}`",
                def.name
            )));
        }
    }

    let mut resolved = BTreeMap::new();
    for def in defs {
        let mut visiting = Vec::new();
        let set = expand(scope, def, &by_name, &mut visiting)?;
        resolved.insert(def.name.to_string(), set);
    }
    Ok(resolved)
}

fn expand<'a>(
    scope: PrivilegeScope,
    def: &'a PrivilegeDef,
    by_name: &HashMap<&str, &'a PrivilegeDef>,
    visiting: &mut Vec<&'a str>,
) -> AuthzResult<PatternSet> {
    if visiting.contains(&def.name) {
        visiting.push(def.name);
        return Err(AuthzError::InvalidPrivilegeDefinition(format!(
            "cyclic {scope} privilege includes: {}",
            visiting.join(" -> ")
        )));
    }
    visiting.push(def.name);

    let mut set = PatternSet::default();
    set.push(PatternTerm::new(def.patterns.iter().copied()).excluding(def.excludes.iter().copied()));
    for include in def.includes {
        let included = by_name.get(include).copied().ok_or_else(|| {
            AuthzError::InvalidPrivilegeDefinition(format!(
                "{scope} privilege `{}` includes unknown privilege `{include}`",
                def.name
            ))
        })?;
        set.union(&expand(scope, included, by_name, visiting)?);
    }

    visiting.pop();
    Ok(set)
}
