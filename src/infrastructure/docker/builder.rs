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

use crate::domain::model::{DockerModel, RegistryCredentials};
use crate::infrastructure::constants::{ENV_DOCKER_CERT_PATH, ENV_DOCKER_HOST};
use crate::shared::error::{KubeError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Builds and pushes container images
#[async_trait::async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Build `model.image` from `docker_dir`, returning the image id.
    async fn build(&self, docker_dir: &Path, model: &DockerModel) -> Result<String>;

    async fn push(&self, model: &DockerModel, credentials: Option<RegistryCredentials>) -> Result<()>;
}

/// [`ImageBuilder`] backed by the `docker` command line client
#[derive(Debug, Clone)]
pub struct DockerCliBuilder {
    program: String,
}

impl Default for DockerCliBuilder {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }
}

impl DockerCliBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, model: &DockerModel) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(host) = &model.docker_host {
            command.env(ENV_DOCKER_HOST, host);
        }
        if let Some(cert_path) = &model.docker_cert_path {
            command.env(ENV_DOCKER_CERT_PATH, cert_path);
            command.env("DOCKER_TLS_VERIFY", "1");
        }
        command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        command
    }

    async fn login(&self, model: &DockerModel, credentials: &RegistryCredentials) -> Result<()> {
        let mut command = self.command(model);
        command
            .arg("login")
            .arg("--username")
            .arg(&credentials.username)
            .arg("--password-stdin")
            .stdin(Stdio::piped());
        if let Some(registry) = &credentials.registry {
            command.arg(registry);
        }

        let push_error = |message: String| KubeError::ImagePush {
            image: model.image.clone(),
            message,
        };

        let mut child = command
            .spawn()
            .map_err(|e| push_error(format!("failed to run {}: {}", self.program, e)))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(credentials.password.as_bytes())
                .await
                .map_err(|e| push_error(format!("failed to send registry password: {}", e)))?;
        }
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| push_error(e.to_string()))?;
        if !output.status.success() {
            return Err(push_error(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ImageBuilder for DockerCliBuilder {
    async fn build(&self, docker_dir: &Path, model: &DockerModel) -> Result<String> {
        info!("Building docker image {}", model.image);
        let output = self
            .command(model)
            .arg("build")
            .arg("--quiet")
            .arg("--tag")
            .arg(&model.image)
            .arg(docker_dir)
            .output()
            .await
            .map_err(|e| KubeError::ImageBuild {
                image: model.image.clone(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(KubeError::ImageBuild {
                image: model.image.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let image_id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Built image {} ({})", model.image, image_id);
        Ok(image_id)
    }

    async fn push(&self, model: &DockerModel, credentials: Option<RegistryCredentials>) -> Result<()> {
        if let Some(credentials) = &credentials {
            self.login(model, credentials).await?;
        }

        info!("Pushing docker image {}", model.image);
        let output = self
            .command(model)
            .arg("push")
            .arg(&model.image)
            .output()
            .await
            .map_err(|e| KubeError::ImagePush {
                image: model.image.clone(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(KubeError::ImagePush {
                image: model.image.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContainerModel;

    #[tokio::test]
    async fn test_missing_program_is_build_error() {
        let container = ContainerModel {
            image: "hello:latest".to_string(),
            ..Default::default()
        };
        let model = DockerModel::from_container(&container, "hello.balx");
        let builder = DockerCliBuilder::new("kubegen-no-such-docker-binary");

        let err = builder.build(Path::new("."), &model).await.unwrap_err();
        match err {
            KubeError::ImageBuild { image, message } => {
                assert_eq!(image, "hello:latest");
                assert!(message.contains("kubegen-no-such-docker-binary"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
