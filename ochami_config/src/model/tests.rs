//! Tests for the typed configuration model.

use super::*;
use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn two_clusters() -> Config {
    Config {
        default_cluster: Some("foo".to_owned()),
        clusters: vec![ClusterEntry::new("foo"), ClusterEntry::new("bar")],
        ..Config::default()
    }
}

#[rstest]
fn builtin_defaults_serialise_to_expected_tree() -> Result<()> {
    let tree = serde_json::to_value(Config::builtin_defaults())?;
    ensure!(
        tree == json!({"log": {"format": "rfc3339", "level": "warning"}, "timeout": "30s"}),
        "unexpected tree {tree}"
    );
    Ok(())
}

#[rstest]
fn empty_optional_fields_are_omitted() -> Result<()> {
    let tree = serde_json::to_value(Config {
        clusters: vec![ClusterEntry::new("foo")],
        ..Config::default()
    })?;
    ensure!(
        tree == json!({"clusters": [{"name": "foo", "cluster": {"enable-auth": true}}]}),
        "unexpected tree {tree}"
    );
    Ok(())
}

#[rstest]
fn cluster_lookup_by_name(two_clusters: Config) -> Result<()> {
    ensure!(two_clusters.cluster("bar")?.name == "bar");
    ensure!(two_clusters.cluster_index("bar") == Some(1));
    ensure!(two_clusters.is_default_cluster("foo"));
    ensure!(!two_clusters.is_default_cluster("bar"));
    Ok(())
}

#[rstest]
fn missing_cluster_is_reported(two_clusters: Config) {
    let err = two_clusters.cluster("baz").err();
    assert!(
        matches!(err, Some(ConfigError::ClusterNotFound { ref name }) if name == "baz"),
        "unexpected result: {err:?}"
    );
}

#[rstest]
fn cluster_config_defaults_enable_auth() -> Result<()> {
    let cfg: ClusterConfig = serde_json::from_value(json!({"uri": "https://a"}))?;
    ensure!(cfg.enable_auth);
    let disabled: ClusterConfig = serde_json::from_value(json!({"enable-auth": false}))?;
    ensure!(!disabled.enable_auth);
    Ok(())
}

#[rstest]
fn unknown_fields_are_denied() {
    let result = serde_json::from_value::<ClusterConfig>(json!({"bogus": 1}));
    assert!(result.is_err());
}

#[rstest]
#[case::none(None, None)]
#[case::empty(Some(""), None)]
#[case::set(Some("/hsm/v2"), Some("/hsm/v2"))]
fn configured_uri_ignores_empty_strings(#[case] uri: Option<&str>, #[case] expected: Option<&str>) {
    let endpoint = ServiceEndpoint {
        uri: uri.map(str::to_owned),
    };
    assert_eq!(endpoint.configured_uri(), expected);
}

#[rstest]
fn uri_overrides_only_replace_non_empty_values() {
    let configured = ClusterConfig {
        uri: Some("https://a.example.com".to_owned()),
        enable_auth: false,
        boot_service: BootServiceEndpoint {
            uri: Some("/boot/v1".to_owned()),
            api_version: Some("v1".to_owned()),
        },
        bss: ServiceEndpoint {
            uri: Some("/boot/v1".to_owned()),
        },
        ..ClusterConfig::default()
    };
    let overrides = ClusterConfig {
        uri: Some(String::new()),
        boot_service: BootServiceEndpoint {
            uri: Some("https://boot.example.com".to_owned()),
            api_version: Some("v2".to_owned()),
        },
        pcs: ServiceEndpoint {
            uri: Some("/power".to_owned()),
        },
        ..ClusterConfig::default()
    };

    let merged = configured.with_uri_overrides(&overrides);

    assert_eq!(merged.uri.as_deref(), Some("https://a.example.com"));
    assert!(!merged.enable_auth);
    assert_eq!(
        merged.boot_service.uri.as_deref(),
        Some("https://boot.example.com")
    );
    assert_eq!(merged.boot_service.api_version.as_deref(), Some("v1"));
    assert_eq!(merged.bss.uri.as_deref(), Some("/boot/v1"));
    assert_eq!(merged.pcs.uri.as_deref(), Some("/power"));
    assert_eq!(merged.smd.uri, None);
}
