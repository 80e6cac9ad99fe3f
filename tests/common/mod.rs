#![allow(dead_code)]

use unilet::reconciler::Reconciler;
use unilet_test_utils::fake_launcher::FakeLauncher;
use unilet_test_utils::fake_resolver::StaticResolver;
use unilet_test_utils::recording_notifier::RecordingNotifier;

pub const HOST_IP: &str = "192.168.1.147";

pub type TestReconciler = Reconciler<StaticResolver, FakeLauncher>;

/// Reconciler over a resolver that knows `echo-server`, a fake launcher and
/// a recording notifier. The launcher and notifier are returned as
/// handles sharing state with the ones inside the reconciler.
pub fn reconciler_with(launcher: FakeLauncher) -> (TestReconciler, FakeLauncher, RecordingNotifier) {
    unilet_test_utils::init_tracing();

    let resolver = StaticResolver::new().with_image("echo-server", "/usr/bin/echo-server");
    let notifier = RecordingNotifier::new();
    let reconciler =
        Reconciler::new(resolver, launcher.clone(), HOST_IP).with_notifier(notifier.clone());

    (reconciler, launcher, notifier)
}

pub fn reconciler() -> (TestReconciler, FakeLauncher, RecordingNotifier) {
    reconciler_with(FakeLauncher::new())
}
