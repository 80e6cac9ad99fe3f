use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use unilet::exec::{build_command, ImageResolver, LaunchRecipe, PathResolver};
use unilet::types::WorkloadSpec;
use unilet_test_utils::builders::{web_workload, ContainerSpecBuilder, WorkloadSpecBuilder};
use unilet_test_utils::fake_resolver::StaticResolver;

fn write_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
}

#[test]
fn unresolvable_image_yields_fallback_command() {
    let recipe = build_command(&web_workload(), &StaticResolver::new());

    assert_eq!(recipe, LaunchRecipe::fallback());
    assert_eq!(recipe.to_string(), "ncat -l 8080");
}

#[test]
fn resolved_image_gets_first_env_entry_as_flag() {
    let resolver = StaticResolver::new().with_image("echo-server", "/usr/bin/echo-server");

    let recipe = build_command(&web_workload(), &resolver);

    assert_eq!(recipe.program, PathBuf::from("/usr/bin/echo-server"));
    assert_eq!(recipe.args, vec!["--FOO=bar".to_string()]);
    assert_eq!(recipe.to_string(), "/usr/bin/echo-server --FOO=bar");
}

#[test]
fn empty_spec_yields_fallback_command() {
    let resolver = StaticResolver::new().with_image("echo-server", "/usr/bin/echo-server");
    assert_eq!(
        build_command(&WorkloadSpec::default(), &resolver).to_string(),
        "ncat -l 8080"
    );
}

#[test]
fn workload_without_containers_yields_fallback_command() {
    let spec = WorkloadSpecBuilder::new("default", "empty").build();
    assert_eq!(
        build_command(&spec, &StaticResolver::new()),
        LaunchRecipe::fallback()
    );
}

#[test]
fn only_first_container_and_env_entry_are_used() {
    let resolver = StaticResolver::new()
        .with_image("first", "/opt/first")
        .with_image("second", "/opt/second");
    let spec = WorkloadSpecBuilder::new("default", "multi")
        .with_container(
            ContainerSpecBuilder::new("a", "first")
                .env("ONE", "1")
                .env("TWO", "2")
                .build(),
        )
        .with_container(ContainerSpecBuilder::new("b", "second").env("X", "y").build())
        .build();

    assert_eq!(build_command(&spec, &resolver).to_string(), "/opt/first --ONE=1");
}

#[test]
fn container_without_env_runs_bare_executable() {
    let resolver = StaticResolver::new().with_image("bare", "/opt/bare");
    let spec = WorkloadSpecBuilder::new("default", "bare")
        .with_container(ContainerSpecBuilder::new("bare", "bare").build())
        .build();

    let recipe = build_command(&spec, &resolver);
    assert_eq!(recipe.program, PathBuf::from("/opt/bare"));
    assert!(recipe.args.is_empty());
}

#[test]
fn env_values_stay_a_single_argument() {
    let resolver = StaticResolver::new().with_image("echo-server", "/usr/bin/echo-server");
    let spec = WorkloadSpecBuilder::new("default", "web")
        .with_container(
            ContainerSpecBuilder::new("echo", "echo-server")
                .env("FOO", "bar; rm -rf / && echo $HOME")
                .build(),
        )
        .build();

    let recipe = build_command(&spec, &resolver);
    assert_eq!(recipe.args, vec!["--FOO=bar; rm -rf / && echo $HOME".to_string()]);
}

#[test]
fn path_resolver_finds_executables_in_search_path() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write_file(dir.path(), "echo-server", 0o755);
    write_file(dir.path(), "plain-file", 0o644);

    let resolver = PathResolver::with_search_path(vec![dir.path().to_path_buf()]);

    assert_eq!(resolver.resolve("echo-server").unwrap(), exe);
    assert!(resolver.resolve("plain-file").is_err());
    assert!(resolver.resolve("missing").is_err());
    assert!(resolver.resolve("").is_err());
}

#[test]
fn path_resolver_checks_paths_directly() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write_file(dir.path(), "svc", 0o755);
    let other = tempfile::tempdir().unwrap();

    // The search path is irrelevant for references with a separator.
    let resolver = PathResolver::with_search_path(vec![other.path().to_path_buf()]);

    assert_eq!(resolver.resolve(exe.to_str().unwrap()).unwrap(), exe);
    assert!(resolver
        .resolve(dir.path().join("nope").to_str().unwrap())
        .is_err());
}

#[test]
fn path_resolver_feeds_command_builder() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write_file(dir.path(), "echo-server", 0o755);
    let resolver = PathResolver::with_search_path(vec![dir.path().to_path_buf()]);

    let recipe = build_command(&web_workload(), &resolver);

    assert_eq!(recipe, LaunchRecipe::new(exe, vec!["--FOO=bar".to_string()]));
}
