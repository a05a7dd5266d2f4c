//! End-to-end resolution of layered configuration files.

use anyhow::{Result, anyhow, ensure};
use ochami_config::{
    CascadeResolver, ConfigError, ConfigFile, ConfigPaths, OutputFormat, ServiceName,
    SourceOrigin, load_config, parse_scalar,
};
use rstest::{fixture, rstest};
use test_helpers::layers::ConfigLayers;

#[fixture]
fn layers() -> ConfigLayers {
    ConfigLayers::new().expect("create config layers")
}

fn paths(layers: &ConfigLayers) -> ConfigPaths {
    ConfigPaths::new(layers.system_path(), Some(layers.user_path().to_path_buf()))
}

#[rstest]
fn site_and_user_files_combine(layers: ConfigLayers) -> Result<()> {
    layers.write_system(concat!(
        "timeout: 45s\n",
        "default-cluster: prod\n",
        "clusters:\n",
        "  - name: prod\n",
        "    cluster:\n",
        "      uri: https://prod.example.com/api\n",
        "      bss:\n",
        "        uri: /boot-script/v1\n",
    ))?;
    layers.write_user(concat!(
        "log:\n",
        "  format: json\n",
        "clusters:\n",
        "  - name: prod\n",
        "    cluster:\n",
        "      enable-auth: false\n",
        "  - name: lab\n",
        "    cluster:\n",
        "      uri: http://lab.local:8080\n",
    ))?;

    let resolved = load_config(None, paths(&layers))?;
    let config = resolved.config();
    ensure!(config.log.format.as_deref() == Some("json"));
    ensure!(config.log.level.as_deref() == Some("warning"));
    ensure!(config.timeout.map(|t| t.to_string()).as_deref() == Some("45s"));
    ensure!(config.clusters.len() == 2);

    let prod = &resolved.select_cluster(None)?.cluster;
    ensure!(!prod.enable_auth);
    ensure!(
        resolved.service_uri(None, ServiceName::Bss)?
            == "https://prod.example.com/api/boot-script/v1"
    );
    ensure!(
        resolved.service_uri(Some("lab"), ServiceName::CloudInit)?
            == "http://lab.local:8080/cloud-init"
    );
    let expected = [
        SourceOrigin::Default,
        SourceOrigin::SystemFile,
        SourceOrigin::UserFile,
    ];
    ensure!(resolved.origins() == expected);
    Ok(())
}

#[rstest]
fn user_layer_edits_take_effect(layers: ConfigLayers) -> Result<()> {
    layers.write_system("log:\n  level: info\n")?;
    let user = ConfigFile::new(layers.user_path());
    user.create_if_missing()?;
    user.set("log.level", parse_scalar("debug"))?;
    let uri = parse_scalar("https://demo.test");
    user.upsert_cluster("demo", "cluster.uri", uri, true)?;
    user.set_cluster("demo", "cluster.enable-auth", parse_scalar("FALSE"))?;

    let resolved = CascadeResolver::new(paths(&layers)).resolve()?;
    ensure!(resolved.config().log.level.as_deref() == Some("debug"));
    let demo = &resolved.select_cluster(None)?.cluster;
    ensure!(!demo.enable_auth);
    ensure!(resolved.service_uri(None, ServiceName::Pcs)? == "https://demo.test/");

    user.unset("log.level")?;
    let reverted = CascadeResolver::new(paths(&layers)).resolve()?;
    ensure!(reverted.config().log.level.as_deref() == Some("info"));
    let text = user.get_string("", OutputFormat::Yaml)?;
    ensure!(
        text.contains("default-cluster: demo"),
        "user file lost its default cluster"
    );
    Ok(())
}

#[rstest]
fn broken_system_file_stops_resolution(layers: ConfigLayers) -> Result<()> {
    layers.write_system("clusters:\n  - name: [oops\n")?;
    layers.write_user("log:\n  level: debug\n")?;
    let err = load_config(None, paths(&layers))
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
    ensure!(
        matches!(err.root(), ConfigError::Parse { .. }),
        "unexpected error: {err:?}"
    );
    let message = err.to_string();
    let system = layers.system_path().display().to_string();
    ensure!(message.contains(&system), "message was {message}");
    Ok(())
}

#[rstest]
fn explicit_file_is_used_alone(layers: ConfigLayers) -> Result<()> {
    layers.write_system("default-cluster: prod\nclusters:\n  - name: prod\n")?;
    let explicit = layers.write_file(
        "elsewhere/ochami.yaml",
        "clusters:\n  - name: other\n    cluster:\n      uri: https://other.test\n",
    )?;
    let resolved = load_config(Some(&explicit), paths(&layers))?;
    ensure!(resolved.cluster("prod").is_err());
    let selected = resolved.select_cluster(None);
    ensure!(
        matches!(selected, Err(ConfigError::NoClusterSelected)),
        "unexpected result: {selected:?}"
    );
    ensure!(resolved.service_uri(Some("other"), ServiceName::Smd)? == "https://other.test/hsm/v2");
    Ok(())
}
