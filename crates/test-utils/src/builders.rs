#![allow(dead_code)]

use unilet::types::{ContainerSpec, EnvVar, ResourceIntent, WorkloadSpec};

/// Builder for `WorkloadSpec` to simplify test setup.
pub struct WorkloadSpecBuilder {
    spec: WorkloadSpec,
}

impl WorkloadSpecBuilder {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            spec: WorkloadSpec {
                namespace: namespace.to_string(),
                name: name.to_string(),
                containers: Vec::new(),
            },
        }
    }

    pub fn with_container(mut self, container: ContainerSpec) -> Self {
        self.spec.containers.push(container);
        self
    }

    /// Add `count` containers named `c0..` running `image`.
    pub fn with_containers(mut self, count: usize, image: &str) -> Self {
        for i in 0..count {
            self.spec
                .containers
                .push(ContainerSpecBuilder::new(&format!("c{i}"), image).build());
        }
        self
    }

    pub fn build(self) -> WorkloadSpec {
        self.spec
    }
}

/// Builder for `ContainerSpec`.
pub struct ContainerSpecBuilder {
    container: ContainerSpec,
}

impl ContainerSpecBuilder {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            container: ContainerSpec {
                name: name.to_string(),
                image: image.to_string(),
                env: Vec::new(),
                resources: None,
            },
        }
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.container.env.push(EnvVar {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn resources(mut self, cpu: &str, memory: &str) -> Self {
        self.container.resources = Some(ResourceIntent {
            cpu: Some(cpu.to_string()),
            memory: Some(memory.to_string()),
        });
        self
    }

    pub fn build(self) -> ContainerSpec {
        self.container
    }
}

/// The `default/web` workload: one `echo-server` container with `FOO=bar`.
pub fn web_workload() -> WorkloadSpec {
    WorkloadSpecBuilder::new("default", "web")
        .with_container(
            ContainerSpecBuilder::new("echo", "echo-server")
                .env("FOO", "bar")
                .build(),
        )
        .build()
}
