// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use unilet::config::{load_and_validate, parse_str, ConfigFile};
use unilet::errors::UniletError;
use unilet::node::NodeInfo;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(UniletError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message '{msg}' lacks '{needle}'");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_is_loaded() {
    let file = write_config(
        r#"
[node]
name = "edge-1"
host_ip = "192.168.1.147"
internal_ip = "10.0.0.5"
cpu = "8"

[launcher]
search_path = ["/opt/unikernels"]

[[workload]]
namespace = "default"
name = "web"

[[workload.containers]]
name = "echo"
image = "echo-server"
env = [{ name = "FOO", value = "bar" }]
resources = { cpu = "500m", memory = "64Mi" }

[[workload]]
namespace = "batch"
name = "job"
containers = [{ image = "cruncher" }]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.node.name, "edge-1");
    assert_eq!(cfg.node.host_ip, "192.168.1.147");
    assert_eq!(cfg.node.memory, "100Gi");
    assert_eq!(
        cfg.launcher.search_path,
        Some(vec![PathBuf::from("/opt/unikernels")])
    );
    assert_eq!(cfg.workload.len(), 2);

    let web = &cfg.workload[0];
    assert_eq!(web.key().unwrap().to_string(), "default-web");
    assert_eq!(web.containers[0].env[0].name, "FOO");
    assert_eq!(web.containers[0].env[0].value, "bar");
    assert_eq!(
        web.containers[0].resources.as_ref().and_then(|r| r.cpu.as_deref()),
        Some("500m")
    );
    assert_eq!(cfg.workload[1].containers[0].name, "");

    let node = NodeInfo::new(cfg.node.clone());
    assert_eq!(node.capacity().get("cpu").map(String::as_str), Some("8"));
    assert_eq!(node.addresses()[0].address, "10.0.0.5");
    assert_eq!(node.conditions()[0].kind, "Ready");
    assert!(node.conditions()[0].status);
    assert!(node.conditions()[1..].iter().all(|c| !c.status));
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = ConfigFile::try_from(parse_str("").unwrap()).unwrap();

    assert_eq!(cfg.node.name, "unilet-node");
    assert_eq!(cfg.node.host_ip, "127.0.0.1");
    assert_eq!(cfg.node.daemon_port, 10250);
    assert_eq!(cfg.node.pods, "20");
    assert!(cfg.launcher.search_path.is_none());
    assert!(cfg.workload.is_empty());
}

#[test]
fn workload_without_name_is_rejected() {
    expect_config_error(
        r#"
[[workload]]
namespace = "default"
containers = [{ image = "echo-server" }]
"#,
        "name not found",
    );
}

#[test]
fn duplicate_workload_is_rejected() {
    expect_config_error(
        r#"
[[workload]]
namespace = "default"
name = "web"
containers = [{ image = "a" }]

[[workload]]
namespace = "default"
name = "web"
containers = [{ image = "b" }]
"#,
        "more than once",
    );
}

#[test]
fn workload_without_containers_is_rejected() {
    expect_config_error(
        r#"
[[workload]]
namespace = "default"
name = "web"
"#,
        "at least one container",
    );
}

#[test]
fn bad_host_ip_is_rejected() {
    expect_config_error(
        r#"
[node]
host_ip = "not-an-ip"
"#,
        "host_ip",
    );
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[[workload]\nname = ");
    match load_and_validate(file.path()) {
        Err(UniletError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match load_and_validate("/nonexistent/Unilet.toml") {
        Err(UniletError::IoError(_)) => {}
        other => panic!("Expected IoError, got: {:?}", other),
    }
}
