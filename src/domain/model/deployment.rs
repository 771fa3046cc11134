// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::volume::{ConfigMapModel, SecretModel, VolumeClaimModel};
use crate::infrastructure::constants::*;
use k8s_openapi::api::core::v1::Toleration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A file copied into the image next to the program artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyFileModel {
    pub source_file: String,
    pub target: String,
}

/// Container and image settings shared by Deployments and Jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerModel {
    pub image: String,
    pub image_pull_policy: String,
    pub build_image: bool,
    pub push_image: bool,
    pub base_image: String,
    pub registry: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub docker_host: Option<String>,
    pub docker_cert_path: Option<String>,
    pub env: BTreeMap<String, String>,
    pub copy_files: Vec<CopyFileModel>,
    pub command_args: Vec<String>,
    pub image_pull_secrets: BTreeSet<String>,
    /// Derived from Service target ports, never declared directly
    pub ports: Vec<i32>,
    pub secrets: Vec<SecretModel>,
    pub config_maps: Vec<ConfigMapModel>,
    pub volume_claims: Vec<VolumeClaimModel>,
}

impl Default for ContainerModel {
    fn default() -> Self {
        Self {
            image: String::new(),
            image_pull_policy: DEFAULT_IMAGE_PULL_POLICY.to_string(),
            build_image: true,
            push_image: false,
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            registry: None,
            username: None,
            password: None,
            docker_host: None,
            docker_cert_path: None,
            env: BTreeMap::new(),
            copy_files: Vec::new(),
            command_args: Vec::new(),
            image_pull_secrets: BTreeSet::new(),
            ports: Vec::new(),
            secrets: Vec::new(),
            config_maps: Vec::new(),
            volume_claims: Vec::new(),
        }
    }
}

impl ContainerModel {
    pub fn add_port(&mut self, port: i32) {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
    }

    /// Fills in `<registry>/<artifact>:latest` when no image was given.
    pub fn resolve_image(&mut self, artifact_name: &str) {
        if !self.image.is_empty() {
            return;
        }
        self.image = match &self.registry {
            Some(registry) => format!("{}/{}:{}", registry, artifact_name, DEFAULT_IMAGE_TAG),
            None => format!("{}:{}", artifact_name, DEFAULT_IMAGE_TAG),
        };
    }

    /// `DOCKER_HOST` and `DOCKER_CERT_PATH` win over annotation values.
    pub fn apply_docker_env(&mut self, docker_host: Option<String>, docker_cert_path: Option<String>) {
        if docker_host.is_some() {
            self.docker_host = docker_host;
        }
        if docker_cert_path.is_some() {
            self.docker_cert_path = docker_cert_path;
        }
    }

    pub fn command_line(&self) -> String {
        self.command_args.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LivenessProbeModel {
    pub enabled: bool,
    pub port: Option<i32>,
    pub initial_delay_seconds: i32,
    pub period_seconds: i32,
}

impl Default for LivenessProbeModel {
    fn default() -> Self {
        Self {
            enabled: false,
            port: None,
            initial_delay_seconds: LIVENESS_INITIAL_DELAY,
            period_seconds: LIVENESS_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentModel {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub pod_annotations: BTreeMap<String, String>,
    pub pod_tolerations: Vec<Toleration>,
    pub liveness: LivenessProbeModel,
    pub depends_on: BTreeSet<String>,
    pub service_account_name: Option<String>,
    pub container: ContainerModel,
}

impl DeploymentModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            replicas: DEFAULT_REPLICAS,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            pod_annotations: BTreeMap::new(),
            pod_tolerations: Vec::new(),
            liveness: LivenessProbeModel::default(),
            depends_on: BTreeSet::new(),
            service_account_name: None,
            container: ContainerModel::default(),
        }
    }

    /// Port probed by the liveness check: explicit port, else the first exposed port.
    pub fn liveness_port(&self) -> Option<i32> {
        self.liveness
            .port
            .or_else(|| self.container.ports.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_image() {
        let mut container = ContainerModel::default();
        container.resolve_image("hello");
        assert_eq!(container.image, "hello:latest");

        let mut container = ContainerModel {
            registry: Some("docker.io/team".to_string()),
            ..Default::default()
        };
        container.resolve_image("hello");
        assert_eq!(container.image, "docker.io/team/hello:latest");

        let mut container = ContainerModel {
            image: "custom:1.0".to_string(),
            ..Default::default()
        };
        container.resolve_image("hello");
        assert_eq!(container.image, "custom:1.0");
    }

    #[test]
    fn test_ports_are_deduplicated() {
        let mut container = ContainerModel::default();
        container.add_port(9090);
        container.add_port(9091);
        container.add_port(9090);
        assert_eq!(container.ports, vec![9090, 9091]);
    }

    #[test]
    fn test_docker_env_overrides() {
        let mut container = ContainerModel {
            docker_host: Some("tcp://annotation:2376".to_string()),
            ..Default::default()
        };
        container.apply_docker_env(Some("unix:///var/run/docker.sock".to_string()), None);
        assert_eq!(container.docker_host.as_deref(), Some("unix:///var/run/docker.sock"));
        assert!(container.docker_cert_path.is_none());
    }
}
