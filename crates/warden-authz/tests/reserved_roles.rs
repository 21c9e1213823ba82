//! Integration tests for the reserved-role registry.
//!
//! # Purpose
//! Pin the literal reserved-role table and the access decisions it produces,
//! including the index-pattern matching rules the table depends on.
//!
//! # Key invariants
//! - Every table role and both internal principal roles are reserved.
//! - Index groups are additive and anything unmatched is denied.
//!
//! # Concurrency + ordering guarantees
//! - The global registry is shared by every test in this binary. Concurrent
//!   first-time initialization is covered in `global_init.rs`.
//!
//! # How to use
//! Run with `cargo test -p warden-authz --test reserved_roles`.
use std::collections::BTreeSet;
use std::sync::Arc;
use warden_authz::reserved::{RESERVED_ROLES, SYSTEM_ROLE, XPACK_ROLE};
use warden_authz::{
    AuthzError, CompiledRole, IndicesPrivileges, PrivilegeCatalog, ReservedRoleRegistry,
    RoleDescriptor,
};

const TABLE: [&str; 18] = [
    "superuser",
    "transport_client",
    "kibana_user",
    "monitoring_user",
    "remote_monitoring_agent",
    "ingest_admin",
    "reporting_user",
    "kibana_dashboard_only_user",
    "kibana_system",
    "logstash_system",
    "beats_system",
    "machine_learning_user",
    "machine_learning_admin",
    "watcher_admin",
    "watcher_user",
    "logstash_admin",
    "rollup_user",
    "rollup_admin",
];

fn registry() -> &'static ReservedRoleRegistry {
    ReservedRoleRegistry::global()
}

fn compiled(name: &str) -> Arc<CompiledRole> {
    registry().compiled_role(name).expect("reserved role")
}

fn groups(descriptor: &RoleDescriptor) -> Vec<(Vec<&str>, Vec<&str>)> {
    descriptor
        .indices()
        .iter()
        .map(|group| {
            (
                group.indices().iter().map(String::as_str).collect(),
                group.privileges().iter().map(String::as_str).collect(),
            )
        })
        .collect()
}

#[test]
fn every_table_role_is_reserved() {
    for name in TABLE {
        assert!(registry().is_reserved(name), "{name} should be reserved");
    }
}

#[test]
fn internal_principal_roles_are_reserved_but_not_listed() {
    assert!(registry().is_reserved(SYSTEM_ROLE));
    assert!(registry().is_reserved(XPACK_ROLE));
    assert!(registry().role_descriptor(SYSTEM_ROLE).is_none());
    assert!(!registry().names().contains(XPACK_ROLE));
}

#[test]
fn unknown_names_are_not_reserved() {
    assert!(!registry().is_reserved("not_a_real_role"));
    assert!(registry().role_descriptor("not_a_real_role").is_none());
    assert!(!registry().is_reserved("Superuser"));
}

#[test]
fn names_match_the_table_exactly() {
    let expected: BTreeSet<&str> = TABLE.into_iter().collect();
    let names = registry().names();
    assert_eq!(names, expected);
    assert_eq!(names, registry().names());
    assert_eq!(registry().role_descriptors().count(), names.len());
    assert_eq!(RESERVED_ROLES.len(), TABLE.len());
}

#[test]
fn superuser_grants_everything() {
    let superuser = registry().role_descriptor("superuser").expect("superuser");
    assert_eq!(superuser.cluster(), ["all"]);
    assert_eq!(groups(superuser), vec![(vec!["*"], vec!["all"])]);
    assert_eq!(superuser.run_as(), ["*"]);

    let role = compiled("superuser");
    assert!(role.can_perform_cluster_action("cluster:admin/xpack/security/user/put"));
    assert!(role.can_perform_cluster_action("manage_security"));
    assert!(role.can_access_index_for_action(".security-6", "indices:data/write/delete"));
    assert!(role.can_access_index_for_action("logs", "all"));
    assert!(role.can_run_as("anyone"));
}

#[test]
fn reporting_user_grants_nothing() {
    let reporting = registry()
        .role_descriptor("reporting_user")
        .expect("reporting_user");
    assert!(reporting.cluster().is_empty());
    assert!(reporting.indices().is_empty());
    assert!(reporting.is_empty());

    let role = compiled("reporting_user");
    assert!(!role.can_perform_cluster_action("cluster:monitor/main"));
    assert!(!role.can_access_index_for_action(".reporting-1", "read"));
}

#[test]
fn every_reserved_role_carries_reserved_metadata() {
    assert!(registry().role_descriptors().all(RoleDescriptor::is_reserved));
}

#[test]
fn literal_index_groups_are_reproduced() {
    let kibana_system = registry()
        .role_descriptor("kibana_system")
        .expect("kibana_system");
    assert_eq!(
        groups(kibana_system),
        vec![
            (vec![".kibana*", ".reporting-*"], vec!["all"]),
            (vec![".monitoring-*"], vec!["read", "read_cross_cluster"]),
        ]
    );
    assert_eq!(
        kibana_system.cluster(),
        [
            "monitor",
            "manage_index_templates",
            "cluster:admin/xpack/monitoring/bulk",
            "manage_saml"
        ]
    );

    let watcher_admin = registry()
        .role_descriptor("watcher_admin")
        .expect("watcher_admin");
    assert_eq!(
        groups(watcher_admin),
        vec![(
            vec![".watches", ".triggered_watches", ".watcher-history-*"],
            vec!["read"]
        )]
    );

    let logstash_admin = registry()
        .role_descriptor("logstash_admin")
        .expect("logstash_admin");
    assert_eq!(
        groups(logstash_admin),
        vec![(
            vec![".logstash*"],
            vec!["create", "delete", "index", "manage", "read"]
        )]
    );
}

#[test]
fn monitoring_user_reads_monitoring_indices() {
    let role = compiled("monitoring_user");
    assert!(role.can_perform_cluster_action("cluster:monitor/main"));
    assert!(!role.can_perform_cluster_action("cluster:monitor/health"));
    assert!(role.can_access_index_for_action(".monitoring-2024.01.01", "read"));
    assert!(role.can_access_index_for_action(".monitoring-2024.01.01", "indices:data/read/search"));
    assert!(!role.can_access_index_for_action(".monitoring-2024.01.01", "delete"));
    assert!(!role.can_access_index_for_action(".kibana", "read"));
}

#[test]
fn watcher_user_reads_history_but_cannot_write() {
    let role = compiled("watcher_user");
    assert!(role.can_access_index_for_action(".watcher-history-2024.01.01", "read"));
    assert!(!role.can_access_index_for_action(".watcher-history-2024.01.01", "write"));
    assert!(role.can_access_index_for_action(".watches", "read"));
    assert!(!role.can_access_index_for_action(".triggered_watches", "read"));
    assert!(role.can_perform_cluster_action("cluster:monitor/xpack/watcher/stats"));
    assert!(!role.can_perform_cluster_action("cluster:admin/xpack/watcher/watch/put"));
}

#[test]
fn cluster_privileges_of_system_roles() {
    let logstash = compiled("logstash_system");
    assert!(logstash.can_perform_cluster_action("cluster:admin/xpack/monitoring/bulk"));
    assert!(logstash.can_perform_cluster_action("cluster:monitor/nodes/stats"));
    assert!(!logstash.can_perform_cluster_action("cluster:admin/xpack/monitoring/other"));

    let kibana = compiled("kibana_system");
    assert!(kibana.can_perform_cluster_action("cluster:admin/xpack/security/saml/authenticate"));
    assert!(kibana.can_perform_cluster_action("cluster:admin/xpack/security/token/refresh"));
    assert!(!kibana.can_perform_cluster_action("cluster:admin/xpack/security/user/put"));
    assert!(kibana.can_access_index_for_action(".reporting-2024.01", "indices:data/write/index"));

    let transport = compiled("transport_client");
    assert!(transport.can_perform_cluster_action("cluster:monitor/state"));
    assert!(!transport.can_perform_cluster_action("cluster:monitor/health"));

    let agent = compiled("remote_monitoring_agent");
    assert!(agent.can_perform_cluster_action("cluster:admin/xpack/watcher/watch/put"));
    assert!(!agent.can_perform_cluster_action("cluster:admin/xpack/watcher/service"));
    assert!(agent.can_perform_cluster_action("indices:admin/template/put"));
    assert!(agent.can_access_index_for_action(".monitoring-es-6", "delete_index"));
}

#[test]
fn ingest_and_rollup_admins() {
    let ingest = compiled("ingest_admin");
    assert!(ingest.can_perform_cluster_action("cluster:admin/ingest/pipeline/put"));
    assert!(ingest.can_perform_cluster_action("indices:admin/template/get"));
    assert!(!ingest.can_perform_cluster_action("cluster:monitor/main"));

    let rollup_user = compiled("rollup_user");
    let rollup_admin = compiled("rollup_admin");
    assert!(rollup_user.can_perform_cluster_action("cluster:monitor/xpack/rollup/get"));
    assert!(!rollup_user.can_perform_cluster_action("cluster:admin/xpack/rollup/put"));
    assert!(rollup_admin.can_perform_cluster_action("cluster:admin/xpack/rollup/put"));
    assert!(rollup_admin.can_perform_cluster_action("monitor_rollup"));
}

#[test]
fn machine_learning_roles_scope_to_ml_indices() {
    let user = compiled("machine_learning_user");
    assert!(user.can_access_index_for_action(".ml-anomalies-shared", "read"));
    assert!(user.can_access_index_for_action(".ml-notifications", "view_index_metadata"));
    assert!(!user.can_access_index_for_action(".ml-state", "read"));
    assert!(!user.can_access_index_for_action(".ml-notifications-old", "read"));

    let admin = compiled("machine_learning_admin");
    assert!(admin.can_access_index_for_action(".ml-state", "read"));
    assert!(!admin.can_access_index_for_action(".ml-state", "write"));
    assert!(admin.can_perform_cluster_action("cluster:admin/xpack/ml/job/put"));
}

#[test]
fn privileges_combined_within_a_group_cover_view_index_metadata() {
    // manage supplies indices:admin/*, read supplies indices:data/read/field_caps*.
    let kibana = compiled("kibana_user");
    assert!(kibana.can_access_index_for_action(".kibana", "view_index_metadata"));
    assert!(kibana.can_access_index_for_action(".kibana", "indices:data/read/field_caps"));
    assert!(kibana.can_access_index_for_action(".kibana", "indices:admin/mappings/get"));

    let logstash = compiled("logstash_admin");
    assert!(logstash.can_access_index_for_action(".logstash", "view_index_metadata"));
    assert!(logstash.can_access_index_for_action(".logstash", "index"));
    assert!(!logstash.can_access_index_for_action(".logstash", "write"));
    assert!(!logstash.can_access_index_for_action(".kibana", "view_index_metadata"));
}

#[test]
fn kibana_user_and_dashboard_only_user() {
    let user = compiled("kibana_user");
    assert!(user.can_access_index_for_action(".kibana", "index"));
    assert!(user.can_access_index_for_action(".kibana_1", "indices:admin/create"));
    assert!(!user.can_access_index_for_action(".kibana", "write"));

    let dashboards = compiled("kibana_dashboard_only_user");
    assert!(dashboards.can_access_index_for_action(".kibana", "indices:admin/mappings/get"));
    assert!(!dashboards.can_access_index_for_action(".kibana", "indices:data/write/index"));
}

// Characterization of index-pattern matching against the literal table.
#[test]
fn index_patterns_cross_separators_and_are_case_sensitive() {
    let role = compiled("monitoring_user");
    assert!(role.can_access_index_for_action(".monitoring-es-6-2024.01.01", "read"));
    assert!(role.can_access_index_for_action(".monitoring-", "read"));
    assert!(!role.can_access_index_for_action(".Monitoring-es", "read"));
    assert!(!role.can_access_index_for_action("monitoring-es", "read"));

    let superuser = compiled("superuser");
    assert!(superuser.can_access_index_for_action(".hidden-index", "read"));
    assert!(superuser.can_access_index_for_action("", "read"));

    let logstash = compiled("logstash_admin");
    assert!(logstash.can_access_index_for_action(".logstash", "read"));
    assert!(logstash.can_access_index_for_action(".logstash-pipelines.v2", "read"));
}

#[test]
fn allowed_indices_filters_for_the_action() {
    let role = compiled("watcher_admin");
    let candidates = [".watches", ".triggered_watches", ".watcher-history-7", ".security"];
    assert_eq!(
        role.allowed_indices("read", candidates),
        vec![".watches", ".triggered_watches", ".watcher-history-7"]
    );
    assert!(role.allowed_indices("write", candidates).is_empty());
}

#[test]
fn empty_index_pattern_list_is_invalid() {
    let err = IndicesPrivileges::new(Vec::<String>::new(), ["read"]).expect_err("empty indices");
    assert!(matches!(err, AuthzError::InvalidRoleDefinition(_)));
}

#[test]
fn independent_registries_are_equal() {
    let catalog = Arc::new(PrivilegeCatalog::builtin().clone());
    let fresh = ReservedRoleRegistry::build(catalog).expect("registry");
    assert_eq!(fresh.names(), registry().names());
    for name in fresh.names() {
        assert_eq!(fresh.role_descriptor(name), registry().role_descriptor(name));
    }
}
