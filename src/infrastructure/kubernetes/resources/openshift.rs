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

//! OpenShift BuildConfig, ImageStream and Route documents

use super::istio::{metadata, CustomResource};
use crate::domain::model::{BuildConfigModel, RouteModel};
use crate::infrastructure::constants::*;
use crate::shared::error::{KubeError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub to: ObjectReference,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryBuildSource {}

#[derive(Debug, Clone, Serialize)]
pub struct BuildSource {
    #[serde(rename = "type")]
    pub type_: String,
    pub binary: BinaryBuildSource,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerBuildStrategy {
    pub dockerfile_path: String,
    pub force_pull: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    #[serde(rename = "type")]
    pub type_: String,
    pub docker_strategy: DockerBuildStrategy,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildConfigSpec {
    pub output: BuildOutput,
    pub source: BuildSource,
    pub strategy: BuildStrategy,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageStreamSpec {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSpec {
    pub host: String,
    pub port: RoutePort,
    pub to: ObjectReference,
}

pub type BuildConfig = CustomResource<BuildConfigSpec>;
pub type ImageStream = CustomResource<ImageStreamSpec>;
pub type Route = CustomResource<RouteSpec>;

/// Repository part of an image reference: `docker.io/team/hello:1.0` -> `hello`.
pub fn image_stream_name(image: &str) -> String {
    let repository = image.rsplit('/').next().unwrap_or(image);
    repository
        .split(':')
        .next()
        .unwrap_or(repository)
        .to_string()
}

pub struct BuildConfigBuilder<'a> {
    model: &'a BuildConfigModel,
    image: &'a str,
}

impl<'a> BuildConfigBuilder<'a> {
    pub fn new(model: &'a BuildConfigModel, image: &'a str) -> Self {
        Self { model, image }
    }

    pub fn build(&self) -> Result<(BuildConfig, ImageStream)> {
        let stream = image_stream_name(self.image);
        let tag = self
            .image
            .rsplit('/')
            .next()
            .and_then(|repo| repo.split_once(':'))
            .map(|(_, tag)| tag)
            .unwrap_or(DEFAULT_IMAGE_TAG);
        let namespace = self.model.namespace.as_deref();

        let build_config = CustomResource {
            api_version: OPENSHIFT_BUILD_API_VERSION.to_string(),
            kind: "BuildConfig".to_string(),
            metadata: metadata(
                &self.model.name,
                namespace,
                &self.model.labels,
                &self.model.annotations,
            ),
            spec: BuildConfigSpec {
                output: BuildOutput {
                    to: ObjectReference {
                        kind: "ImageStreamTag".to_string(),
                        name: format!("{}:{}", stream, tag),
                        weight: None,
                    },
                },
                source: BuildSource {
                    type_: "Binary".to_string(),
                    binary: BinaryBuildSource {},
                },
                strategy: BuildStrategy {
                    type_: "Docker".to_string(),
                    docker_strategy: DockerBuildStrategy {
                        dockerfile_path: DOCKERFILE_NAME.to_string(),
                        force_pull: self.model.force_pull_docker_image,
                    },
                },
            },
        };

        let image_stream = CustomResource {
            api_version: OPENSHIFT_IMAGE_API_VERSION.to_string(),
            kind: "ImageStream".to_string(),
            metadata: metadata(&stream, namespace, &self.model.labels, &BTreeMap::new()),
            spec: ImageStreamSpec {},
        };

        Ok((build_config, image_stream))
    }
}

pub struct RouteBuilder<'a> {
    model: &'a RouteModel,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(model: &'a RouteModel) -> Self {
        Self { model }
    }

    pub fn build(&self) -> Result<Route> {
        let (Some(service_name), Some(target_port)) =
            (&self.model.service_name, self.model.target_port)
        else {
            return Err(KubeError::validation(format!(
                "Route '{}' has no Service for listener '{}'",
                self.model.name, self.model.listener_name
            )));
        };

        Ok(CustomResource {
            api_version: OPENSHIFT_ROUTE_API_VERSION.to_string(),
            kind: "Route".to_string(),
            metadata: metadata(
                &self.model.name,
                self.model.namespace.as_deref(),
                &self.model.labels,
                &self.model.annotations,
            ),
            spec: RouteSpec {
                host: self.model.host.clone(),
                port: RoutePort { target_port },
                to: ObjectReference {
                    kind: "Service".to_string(),
                    name: service_name.clone(),
                    weight: Some(100),
                },
            },
        })
    }
}
