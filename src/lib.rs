// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod node;
pub mod reconciler;
pub mod store;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::ConfigFile;
use crate::exec::{
    build_command, ImageResolver, Launcher, PathResolver, ProcessEvent, ProcessLauncher,
};
use crate::node::NodeInfo;
use crate::reconciler::{spawn_exit_supervisor, LifecycleReconciler, Reconciler};
use crate::types::WorkloadRecord;

/// How often `--once` checks whether every workload is terminal.
const ONCE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - resolver / launcher / reconciler
/// - the exit supervisor
/// - Ctrl-C handling and shutdown (every workload is deleted, which kills
///   its process)
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    let node = NodeInfo::new(cfg.node.clone());
    let resolver = match &cfg.launcher.search_path {
        Some(dirs) => PathResolver::with_search_path(dirs.clone()),
        None => PathResolver::new(),
    };

    if args.dry_run {
        println!("{}", dry_run_report(&cfg, &node, &resolver));
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let (events_tx, events_rx) = mpsc::channel::<ProcessEvent>(64);
    let launcher = ProcessLauncher::new(events_tx);
    let reconciler = Arc::new(
        Reconciler::new(resolver, launcher, node.host_ip()).with_notifier(print_notification),
    );
    let supervisor = spawn_exit_supervisor(Arc::clone(&reconciler), events_rx);

    info!(
        node = node.name(),
        os = node.operating_system(),
        workloads = cfg.workload.len(),
        "unilet node starting"
    );

    for spec in cfg.workload {
        let (namespace, name) = (spec.namespace.clone(), spec.name.clone());
        reconciler.create(spec)?;
        let report = reconciler.launch(&namespace, &name)?;
        if !report.started {
            warn!(
                namespace = %namespace,
                name = %name,
                cmd = %report.recipe,
                "workload failed to start"
            );
        }
    }

    if args.once {
        wait_until_terminal(&reconciler).await;
    } else {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received; shutting down"),
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C; shutting down"),
        }
    }

    for record in reconciler.list() {
        match reconciler.delete(&record.spec) {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }

    supervisor.abort();
    info!("unilet node stopped");
    Ok(())
}

async fn wait_until_terminal<R, L>(reconciler: &Reconciler<R, L>)
where
    R: ImageResolver,
    L: Launcher,
{
    loop {
        if reconciler.all_terminal() {
            info!("every workload reached a terminal phase");
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(ONCE_POLL_INTERVAL) => {}
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                }
                info!("Ctrl-C received; shutting down");
                return;
            }
        }
    }
}

/// Change notifier of the CLI host: one JSON line per mutation on stdout.
fn print_notification(record: &WorkloadRecord) {
    match serde_json::to_string(record) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!(
            namespace = record.namespace(),
            name = record.name(),
            error = %e,
            "failed to serialize workload notification"
        ),
    }
}

/// Dry-run output: node description and each workload's launch recipe.
pub fn dry_run_report(cfg: &ConfigFile, node: &NodeInfo, resolver: &dyn ImageResolver) -> String {
    let mut lines = vec![
        "unilet dry-run".to_string(),
        format!("  node.name = {}", node.name()),
        format!("  node.os = {}", node.operating_system()),
        format!("  node.host_ip = {}", node.host_ip()),
        format!("  node.daemon_port = {}", node.daemon_port()),
    ];
    for (resource, amount) in node.capacity() {
        lines.push(format!("  node.capacity.{resource} = {amount}"));
    }
    for address in node.addresses() {
        lines.push(format!("  node.address.{} = {}", address.kind, address.address));
    }
    for condition in node.conditions() {
        lines.push(format!(
            "  node.condition.{} = {} ({})",
            condition.kind, condition.status, condition.reason
        ));
    }
    lines.push(String::new());

    lines.push(format!("workloads ({}):", cfg.workload.len()));
    for spec in &cfg.workload {
        lines.push(format!("  - {}/{}", spec.namespace, spec.name));
        for container in &spec.containers {
            lines.push(format!(
                "      container: {} (image {})",
                container.name, container.image
            ));
        }
        if spec.containers.len() > 1 {
            lines.push("      note: only the first container is launched".to_string());
        }
        lines.push(format!("      cmd: {}", build_command(spec, resolver)));
    }

    lines.join("\n")
}
