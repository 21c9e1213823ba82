//! Literal table of the platform's built-in roles.
//!
//! This table is a product contract: names, privileges and index patterns are
//! relied on by Kibana, Logstash, Beats, monitoring, ML, watcher and rollup.
//! Change it only together with the consumers.

pub const SUPERUSER_ROLE: &str = "superuser";
pub const KIBANA_SYSTEM_ROLE: &str = "kibana_system";
pub const BEATS_SYSTEM_ROLE: &str = "beats_system";

/// Internal principal roles; reserved but never listed in the table.
pub const SYSTEM_ROLE: &str = "_system";
pub const XPACK_ROLE: &str = "_xpack";

pub const MONITORING_BULK_ACTION: &str = "cluster:admin/xpack/monitoring/bulk";
pub const WATCHES_INDEX: &str = ".watches";
pub const TRIGGERED_WATCHES_INDEX: &str = ".triggered_watches";
pub const WATCHER_HISTORY_INDEX_PREFIX: &str = ".watcher-history-";
pub const WATCHER_HISTORY_INDEX_PATTERN: &str = ".watcher-history-*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexGroupSpec {
    pub indices: &'static [&'static str],
    pub privileges: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRoleSpec {
    pub name: &'static str,
    pub cluster: &'static [&'static str],
    pub indices: &'static [IndexGroupSpec],
    pub run_as: &'static [&'static str],
}

const fn role(
    name: &'static str,
    cluster: &'static [&'static str],
    indices: &'static [IndexGroupSpec],
) -> ReservedRoleSpec {
    ReservedRoleSpec {
        name,
        cluster,
        indices,
        run_as: &[],
    }
}

// Expands to a struct literal so the borrow is promoted to `'static`.
macro_rules! group {
    ([$($index:expr),+ $(,)?], [$($privilege:expr),+ $(,)?]) => {
        IndexGroupSpec {
            indices: &[$($index),+],
            privileges: &[$($privilege),+],
        }
    };
}

pub const RESERVED_ROLES: &[ReservedRoleSpec] = &[
    ReservedRoleSpec {
        name: SUPERUSER_ROLE,
        cluster: &["all"],
        indices: &[group!(["*"], ["all"])],
        run_as: &["*"],
    },
    role("transport_client", &["transport_client"], &[]),
    role(
        "kibana_user",
        &[],
        &[group!([".kibana*"], ["manage", "read", "index", "delete"])],
    ),
    role(
        "monitoring_user",
        &["cluster:monitor/main"],
        &[group!([".monitoring-*"], ["read", "read_cross_cluster"])],
    ),
    role(
        "remote_monitoring_agent",
        &[
            "manage_index_templates",
            "manage_ingest_pipelines",
            "monitor",
            "cluster:monitor/xpack/watcher/watch/get",
            "cluster:admin/xpack/watcher/watch/put",
            "cluster:admin/xpack/watcher/watch/delete",
        ],
        &[group!([".monitoring-*"], ["all"])],
    ),
    role(
        "ingest_admin",
        &["manage_index_templates", "manage_pipeline"],
        &[],
    ),
    // Grants nothing here; Kibana authorizes reporting on the role name alone.
    role("reporting_user", &[], &[]),
    role(
        "kibana_dashboard_only_user",
        &[],
        &[group!([".kibana*"], ["read", "view_index_metadata"])],
    ),
    role(
        KIBANA_SYSTEM_ROLE,
        &[
            "monitor",
            "manage_index_templates",
            MONITORING_BULK_ACTION,
            "manage_saml",
        ],
        &[
            group!([".kibana*", ".reporting-*"], ["all"]),
            group!([".monitoring-*"], ["read", "read_cross_cluster"]),
        ],
    ),
    role("logstash_system", &["monitor", MONITORING_BULK_ACTION], &[]),
    role(BEATS_SYSTEM_ROLE, &["monitor", MONITORING_BULK_ACTION], &[]),
    role(
        "machine_learning_user",
        &["monitor_ml"],
        &[group!(
            [".ml-anomalies*", ".ml-notifications"],
            ["view_index_metadata", "read"]
        )],
    ),
    role(
        "machine_learning_admin",
        &["manage_ml"],
        &[group!([".ml-*"], ["view_index_metadata", "read"])],
    ),
    role(
        "watcher_admin",
        &["manage_watcher"],
        &[group!(
            [
                WATCHES_INDEX,
                TRIGGERED_WATCHES_INDEX,
                WATCHER_HISTORY_INDEX_PATTERN
            ],
            ["read"]
        )],
    ),
    role(
        "watcher_user",
        &["monitor_watcher"],
        &[
            group!([WATCHES_INDEX], ["read"]),
            group!([WATCHER_HISTORY_INDEX_PATTERN], ["read"]),
        ],
    ),
    role(
        "logstash_admin",
        &[],
        &[group!(
            [".logstash*"],
            ["create", "delete", "index", "manage", "read"]
        )],
    ),
    role("rollup_user", &["monitor_rollup"], &[]),
    role("rollup_admin", &["manage_rollup"], &[]),
];
