//! Tests for configuration edits and file-backed editing.

use super::*;
use crate::ConfigError;
use crate::model::{ClusterEntry, Config, Timeout};
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[fixture]
fn two_clusters() -> Config {
    let mut foo = ClusterEntry::new("foo");
    foo.cluster.uri = Some("https://foo.example.com".to_owned());
    Config {
        default_cluster: Some("foo".to_owned()),
        clusters: vec![foo, ClusterEntry::new("bar")],
        ..Config::builtin_defaults()
    }
}

struct TempFile {
    _dir: TempDir,
    file: ConfigFile,
}

#[fixture]
fn config_file() -> TempFile {
    let dir = TempDir::new().expect("create temp dir");
    let file = ConfigFile::new(dir.path().join("ochami/config.yaml"));
    TempFile { _dir: dir, file }
}

#[rstest]
#[case::scalar("log.level", Some(json!("warning")))]
#[case::map("log", Some(json!({"format": "rfc3339", "level": "warning"})))]
#[case::missing("log.colour", None)]
#[case::through_scalar("timeout.seconds", None)]
fn get_reads_global_keys(
    two_clusters: Config,
    #[case] key: &str,
    #[case] expected: Option<Tree>,
) -> Result<()> {
    let value = ops::get(&two_clusters, key)?;
    ensure!(value == expected, "got {value:?}");
    Ok(())
}

#[rstest]
fn get_with_empty_key_returns_everything(two_clusters: Config) -> Result<()> {
    let whole = ops::get(&two_clusters, "")?.ok_or_else(|| anyhow!("expected a tree"))?;
    ensure!(whole["default-cluster"] == "foo");
    ensure!(whole["clusters"].as_array().map(Vec::len) == Some(2));
    Ok(())
}

#[rstest]
fn get_refuses_to_descend_into_clusters(two_clusters: Config) -> Result<()> {
    ensure!(ops::get(&two_clusters, "clusters")?.is_some());
    let result = ops::get(&two_clusters, "clusters.foo");
    ensure!(
        matches!(result, Err(ConfigError::InvalidKey { ref key, .. }) if key == "clusters.foo"),
        "unexpected result: {result:?}"
    );
    Ok(())
}

#[rstest]
fn set_validates_the_result(mut two_clusters: Config) -> Result<()> {
    ops::set(&mut two_clusters, "timeout", json!("2m"))?;
    ensure!(two_clusters.timeout == Some(Timeout::from_secs(120)));

    let before = two_clusters.clone();
    let unknown = ops::set(&mut two_clusters, "log.colour", json!("red"));
    ensure!(
        matches!(unknown, Err(ConfigError::UnknownKey { .. })),
        "got {unknown:?}"
    );
    let invalid = ops::set(&mut two_clusters, "timeout", json!("soon"));
    ensure!(
        matches!(invalid, Err(ConfigError::InvalidValue { ref key, .. }) if key == "timeout"),
        "got {invalid:?}"
    );
    ensure!(
        two_clusters == before,
        "failed edits must leave the config untouched"
    );
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::empty_segment("log..level")]
#[case::through_scalar("timeout.seconds")]
fn set_rejects_unusable_keys(mut two_clusters: Config, #[case] key: &str) {
    let result = ops::set(&mut two_clusters, key, json!(1));
    assert!(
        matches!(result, Err(ConfigError::InvalidKey { .. })),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn unset_removes_and_tolerates_absence(mut two_clusters: Config) -> Result<()> {
    ops::unset(&mut two_clusters, "log.level")?;
    ensure!(two_clusters.log.level.is_none());
    ensure!(two_clusters.log.format.is_some());
    ops::unset(&mut two_clusters, "log.level")?;
    ops::unset(&mut two_clusters, "default-cluster")?;
    ensure!(two_clusters.default_cluster.is_none());
    Ok(())
}

#[rstest]
fn get_cluster_reads_entry_keys(two_clusters: Config) -> Result<()> {
    let uri = ops::get_cluster(&two_clusters, "foo", "cluster.uri")?;
    ensure!(uri == Some(json!("https://foo.example.com")));
    let entry = ops::get_cluster(&two_clusters, "bar", "")?;
    ensure!(
        entry == Some(json!({"name": "bar", "cluster": {"enable-auth": true}})),
        "got {entry:?}"
    );
    let missing = ops::get_cluster(&two_clusters, "baz", "cluster");
    ensure!(
        matches!(missing, Err(ConfigError::ClusterNotFound { ref name }) if name == "baz"),
        "got {missing:?}"
    );
    Ok(())
}

#[rstest]
fn set_cluster_adds_missing_clusters(mut two_clusters: Config) -> Result<()> {
    let uri = json!("/hsm/v2");
    ops::set_cluster(&mut two_clusters, "baz", "cluster.smd.uri", uri)?;
    let baz = two_clusters.cluster("baz")?;
    ensure!(baz.cluster.smd.uri.as_deref() == Some("/hsm/v2"));
    ensure!(baz.cluster.enable_auth);
    ensure!(two_clusters.default_cluster.as_deref() == Some("foo"));
    ensure!(two_clusters.clusters.last().map(|c| c.name.as_str()) == Some("baz"));
    Ok(())
}

#[rstest]
fn upsert_can_make_default(mut two_clusters: Config) -> Result<()> {
    let key = "cluster.enable-auth";
    ops::upsert_cluster(&mut two_clusters, "bar", key, json!(false), true)?;
    ensure!(two_clusters.default_cluster.as_deref() == Some("bar"));
    ensure!(!two_clusters.cluster("bar")?.cluster.enable_auth);
    Ok(())
}

#[rstest]
fn renaming_default_cluster_follows_the_new_name(mut two_clusters: Config) -> Result<()> {
    ops::set_cluster(&mut two_clusters, "foo", "name", json!("qux"))?;
    ensure!(two_clusters.default_cluster.as_deref() == Some("qux"));
    ensure!(two_clusters.cluster("qux")?.cluster.uri.as_deref() == Some("https://foo.example.com"));
    ensure!(two_clusters.cluster_index("foo").is_none());

    ops::set_cluster(&mut two_clusters, "bar", "name", json!("baz"))?;
    ensure!(two_clusters.default_cluster.as_deref() == Some("qux"));
    Ok(())
}

#[rstest]
#[case::other_cluster("foo", "bar")]
#[case::same_name("foo", "foo")]
fn renaming_onto_existing_name_fails(
    mut two_clusters: Config,
    #[case] cluster: &str,
    #[case] new_name: &str,
) {
    let before = two_clusters.clone();
    let result = ops::set_cluster(&mut two_clusters, cluster, "name", json!(new_name));
    assert!(
        matches!(result, Err(ConfigError::CannotRenameToExisting { ref name }) if name == new_name),
        "unexpected result: {result:?}"
    );
    assert_eq!(two_clusters, before);
}

#[rstest]
fn names_must_be_strings(mut two_clusters: Config) {
    let result = ops::set_cluster(&mut two_clusters, "foo", "name", json!(7));
    assert!(
        matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "name"),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn unknown_cluster_keys_are_rejected(mut two_clusters: Config) {
    let result = ops::set_cluster(&mut two_clusters, "foo", "cluster.hsm.uri", json!("/x"));
    assert!(
        matches!(result, Err(ConfigError::UnknownKey { ref key, .. }) if key == "hsm"),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn unset_cluster_keys(mut two_clusters: Config) -> Result<()> {
    ops::unset_cluster(&mut two_clusters, "foo", "cluster.uri")?;
    ensure!(two_clusters.cluster("foo")?.cluster.uri.is_none());

    let name = ops::unset_cluster(&mut two_clusters, "missing", "name");
    ensure!(
        matches!(name, Err(ConfigError::CannotUnsetName)),
        "got {name:?}"
    );
    let missing = ops::unset_cluster(&mut two_clusters, "missing", "cluster.uri");
    ensure!(
        matches!(missing, Err(ConfigError::ClusterNotFound { .. })),
        "got {missing:?}"
    );
    Ok(())
}

#[rstest]
fn deleting_default_cluster_clears_default(mut two_clusters: Config) -> Result<()> {
    ops::delete_cluster(&mut two_clusters, "bar")?;
    ensure!(two_clusters.default_cluster.as_deref() == Some("foo"));
    ops::delete_cluster(&mut two_clusters, "foo")?;
    ensure!(two_clusters.default_cluster.is_none());
    ensure!(two_clusters.clusters.is_empty());
    let again = ops::delete_cluster(&mut two_clusters, "foo");
    ensure!(
        matches!(again, Err(ConfigError::ClusterNotFound { .. })),
        "got {again:?}"
    );
    Ok(())
}

#[rstest]
fn default_cluster_must_exist(mut two_clusters: Config) -> Result<()> {
    ops::set_default_cluster(&mut two_clusters, "bar")?;
    ensure!(two_clusters.default_cluster.as_deref() == Some("bar"));
    let missing = ops::set_default_cluster(&mut two_clusters, "baz");
    ensure!(
        matches!(missing, Err(ConfigError::ClusterNotFound { .. })),
        "got {missing:?}"
    );
    ensure!(two_clusters.default_cluster.as_deref() == Some("bar"));
    Ok(())
}

#[rstest]
#[case::missing(None, OutputFormat::Yaml, "")]
#[case::null(Some(json!(null)), OutputFormat::Json, "")]
#[case::string(Some(json!("debug")), OutputFormat::Yaml, "debug")]
#[case::boolean(Some(json!(false)), OutputFormat::Yaml, "false")]
#[case::number(Some(json!(30)), OutputFormat::JsonPretty, "30")]
#[case::yaml_map(Some(json!({"level": "info"})), OutputFormat::Yaml, "level: info\n")]
#[case::json_list(Some(json!(["a", 1])), OutputFormat::Json, r#"["a",1]"#)]
#[case::pretty_map(Some(json!({"a": 1})), OutputFormat::JsonPretty, "{\n\t\"a\": 1\n}")]
fn values_render_per_format(
    #[case] value: Option<Tree>,
    #[case] format: OutputFormat,
    #[case] expected: &str,
) -> Result<()> {
    let rendered = render_value(value.as_ref(), format)?;
    ensure!(rendered == expected, "got {rendered:?}");
    Ok(())
}

#[rstest]
fn output_formats_parse_by_name() -> Result<()> {
    for format in [
        OutputFormat::Yaml,
        OutputFormat::Json,
        OutputFormat::JsonPretty,
    ] {
        ensure!(format.as_str().parse::<OutputFormat>()? == format);
    }
    let unknown = "toml".parse::<OutputFormat>();
    ensure!(
        matches!(unknown, Err(ConfigError::UnknownFormat { ref format }) if format == "toml"),
        "got {unknown:?}"
    );
    Ok(())
}

#[rstest]
fn file_edits_persist(config_file: TempFile) -> Result<()> {
    let file = &config_file.file;
    ensure!(file.create_if_missing()?);
    file.set("log.level", json!("debug"))?;
    file.upsert_cluster("foo", "cluster.uri", json!("https://foo.test"), true)?;
    file.set_cluster("bar", "cluster.pcs.uri", json!("/power"))?;

    ensure!(file.get_string("log.level", OutputFormat::Yaml)? == "debug");
    ensure!(file.get_string("default-cluster", OutputFormat::Json)? == "foo");
    ensure!(file.get_cluster_string("bar", "cluster.pcs.uri", OutputFormat::Yaml)? == "/power");

    let text = fs::read_to_string(file.path())?;
    ensure!(text.contains("default-cluster: foo"), "file was:\n{text}");
    ensure!(text.contains("level: debug"), "file was:\n{text}");

    file.delete_cluster("foo")?;
    file.set_default_cluster("bar")?;
    file.unset_cluster("bar", "cluster.pcs")?;
    file.unset("log")?;
    let config = file.read()?;
    ensure!(config.default_cluster.as_deref() == Some("bar"));
    ensure!(config.clusters.len() == 1);
    ensure!(config.log.is_empty());
    Ok(())
}

#[rstest]
fn failed_file_edits_name_the_file(config_file: TempFile) -> Result<()> {
    let file = &config_file.file;
    file.create_if_missing()?;
    let before = fs::read_to_string(file.path())?;
    let err = file
        .delete_cluster("absent")
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    let ConfigError::Source { path, source } = &err else {
        return Err(anyhow!("unexpected error: {err:?}"));
    };
    ensure!(path == file.path());
    ensure!(
        matches!(**source, ConfigError::ClusterNotFound { .. }),
        "cause was {source:?}"
    );
    ensure!(
        fs::read_to_string(file.path())? == before,
        "file must be unchanged"
    );
    Ok(())
}

#[rstest]
fn editing_requires_the_file(config_file: TempFile) {
    let result = config_file.file.set("log.level", json!("info"));
    assert!(
        matches!(result, Err(ConfigError::SourceNotFound { .. })),
        "unexpected result: {result:?}"
    );
}
