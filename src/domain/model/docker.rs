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

use super::deployment::{ContainerModel, CopyFileModel};
use std::collections::BTreeMap;

/// Registry login used for pushing the built image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub registry: Option<String>,
    pub username: String,
    pub password: String,
}

/// Container image descriptor, derived from the workload container.
#[derive(Debug, Clone, PartialEq)]
pub struct DockerModel {
    pub base_image: String,
    pub image: String,
    pub artifact_file_name: String,
    pub ports: Vec<i32>,
    pub env: BTreeMap<String, String>,
    pub copy_files: Vec<CopyFileModel>,
    pub command_args: Vec<String>,
    pub registry: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub docker_host: Option<String>,
    pub docker_cert_path: Option<String>,
    pub build: bool,
    pub push: bool,
}

impl DockerModel {
    pub fn from_container(container: &ContainerModel, artifact_file_name: impl Into<String>) -> Self {
        Self {
            base_image: container.base_image.clone(),
            image: container.image.clone(),
            artifact_file_name: artifact_file_name.into(),
            ports: container.ports.clone(),
            env: container.env.clone(),
            copy_files: container.copy_files.clone(),
            command_args: container.command_args.clone(),
            registry: container.registry.clone(),
            username: container.username.clone(),
            password: container.password.clone(),
            docker_host: container.docker_host.clone(),
            docker_cert_path: container.docker_cert_path.clone(),
            build: container.build_image,
            push: container.push_image,
        }
    }

    /// Credentials are only available when both user name and password were given.
    pub fn credentials(&self) -> Option<RegistryCredentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(RegistryCredentials {
                registry: self.registry.clone(),
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_container() {
        let mut container = ContainerModel::default();
        container.image = "hello:latest".to_string();
        container.add_port(9090);
        container.push_image = true;
        container.username = Some("alice".to_string());

        let docker = DockerModel::from_container(&container, "hello.jar");
        assert_eq!(docker.image, "hello:latest");
        assert_eq!(docker.ports, vec![9090]);
        assert!(docker.build);
        assert!(docker.push);
        assert!(docker.credentials().is_none());
    }
}
