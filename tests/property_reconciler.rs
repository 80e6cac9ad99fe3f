mod common;

use proptest::prelude::*;
use unilet::reconciler::LifecycleReconciler;
use unilet::types::{ContainerSpec, EnvVar, Phase, WorkloadSpec};

use crate::common::reconciler;

fn container_strategy() -> impl Strategy<Value = ContainerSpec> {
    (
        "[a-z]{1,8}",
        "[a-z-]{1,12}",
        proptest::collection::vec(("[A-Z_]{1,6}", "[a-z0-9]{0,6}"), 0..3),
    )
        .prop_map(|(name, image, env)| ContainerSpec {
            name,
            image,
            env: env
                .into_iter()
                .map(|(name, value)| EnvVar { name, value })
                .collect(),
            resources: None,
        })
}

fn spec_strategy() -> impl Strategy<Value = WorkloadSpec> {
    (
        "[a-z][a-z0-9-]{0,10}",
        "[a-z][a-z0-9-]{0,10}",
        proptest::collection::vec(container_strategy(), 0..5),
    )
        .prop_map(|(namespace, name, containers)| WorkloadSpec {
            namespace,
            name,
            containers,
        })
}

proptest! {
    #[test]
    fn create_then_get_is_running_with_one_status_per_container(spec in spec_strategy()) {
        let (rec, _launcher, _notifier) = reconciler();

        rec.create(spec.clone()).unwrap();
        let record = rec.get(&spec.namespace, &spec.name).unwrap();

        prop_assert_eq!(record.status.phase, Phase::Running);
        prop_assert_eq!(record.status.container_statuses.len(), spec.containers.len());
        prop_assert_eq!(record.spec, spec);
    }

    #[test]
    fn delete_always_terminates_every_container(spec in spec_strategy()) {
        let (rec, _launcher, _notifier) = reconciler();
        rec.create(spec.clone()).unwrap();

        let deleted = rec.delete(&spec).unwrap();

        prop_assert_eq!(deleted.status.phase, Phase::Succeeded);
        for status in &deleted.status.container_statuses {
            prop_assert!(!status.ready);
            prop_assert!(!status.state.is_running());
            prop_assert!(status.state.started_at() <= deleted.status.start_time.unwrap());
        }
        prop_assert!(rec.get(&spec.namespace, &spec.name).unwrap_err().is_not_found());
    }
}
