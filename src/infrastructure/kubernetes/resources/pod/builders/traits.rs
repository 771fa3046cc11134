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

use super::env::EnvironmentBuilder;
use super::volumes::VolumeBuilder;
use crate::domain::model::ContainerModel;
use crate::infrastructure::constants::{INIT_CONTAINER_IMAGE, INIT_CONTAINER_PREFIX, LABEL_APP, PROTOCOL_TCP};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, LocalObjectReference, PodSpec, PodTemplateSpec, Probe, Toleration,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::{BTreeMap, BTreeSet};

/// Shared pod template assembly for Deployments, Jobs and CronJobs.
pub trait PodBuilder {
    fn workload_name(&self) -> &str;

    fn container_model(&self) -> &ContainerModel;

    fn get_labels(&self) -> BTreeMap<String, String>;

    /// Pods are matched on the `app` label only, falling back to every label.
    fn get_selector_labels(&self) -> BTreeMap<String, String> {
        let labels = self.get_labels();
        match labels.get(LABEL_APP) {
            Some(app) => BTreeMap::from([(LABEL_APP.to_string(), app.clone())]),
            None => labels,
        }
    }

    fn main_container_name(&self) -> &str {
        self.workload_name()
    }

    fn pod_annotations(&self) -> Option<BTreeMap<String, String>> {
        None
    }

    fn tolerations(&self) -> Option<Vec<Toleration>> {
        None
    }

    fn restart_policy(&self) -> Option<String> {
        None
    }

    fn service_account_name(&self) -> Option<String> {
        None
    }

    fn depends_on(&self) -> Option<&BTreeSet<String>> {
        None
    }

    fn liveness_probe(&self) -> Option<Probe> {
        None
    }

    fn build_main_container(&self) -> Container {
        let model = self.container_model();
        let volumes = VolumeBuilder::new(model);
        let env = EnvironmentBuilder::new().with_custom_vars(&model.env).build();
        let ports: Vec<ContainerPort> = model
            .ports
            .iter()
            .map(|port| ContainerPort {
                container_port: *port,
                protocol: Some(PROTOCOL_TCP.to_string()),
                ..Default::default()
            })
            .collect();
        let mounts = volumes.build_volume_mounts();

        Container {
            name: self.main_container_name().to_string(),
            image: Some(model.image.clone()),
            image_pull_policy: Some(model.image_pull_policy.clone()),
            env: (!env.is_empty()).then_some(env),
            ports: (!ports.is_empty()).then_some(ports),
            volume_mounts: (!mounts.is_empty()).then_some(mounts),
            liveness_probe: self.liveness_probe(),
            ..Default::default()
        }
    }

    /// One `wait-for-<dependency>` container per dependency, blocking until its
    /// Service name resolves.
    fn build_init_containers(&self) -> Option<Vec<Container>> {
        let depends_on = self.depends_on()?;
        if depends_on.is_empty() {
            return None;
        }
        Some(
            depends_on
                .iter()
                .map(|dependency| Container {
                    name: format!("{}{}", INIT_CONTAINER_PREFIX, dependency),
                    image: Some(INIT_CONTAINER_IMAGE.to_string()),
                    command: Some(vec![
                        "sh".to_string(),
                        "-c".to_string(),
                        format!("until nslookup {}; do sleep 2; done", dependency),
                    ]),
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn build_pod_template(&self) -> PodTemplateSpec {
        let model = self.container_model();
        let volumes = VolumeBuilder::new(model).build_volumes();
        let image_pull_secrets: Vec<LocalObjectReference> = model
            .image_pull_secrets
            .iter()
            .map(|name| LocalObjectReference { name: name.clone() })
            .collect();

        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(self.get_labels()),
                annotations: self.pod_annotations(),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                containers: vec![self.build_main_container()],
                init_containers: self.build_init_containers(),
                volumes: (!volumes.is_empty()).then_some(volumes),
                image_pull_secrets: (!image_pull_secrets.is_empty()).then_some(image_pull_secrets),
                tolerations: self.tolerations(),
                restart_policy: self.restart_policy(),
                service_account_name: self.service_account_name(),
                ..Default::default()
            }),
        }
    }
}

/// Resources that carry labels but no pod template.
pub trait LabeledResourceBuilder {
    fn get_labels(&self) -> BTreeMap<String, String>;
}

/// `None` for empty maps, so optional metadata is omitted from the output.
pub fn non_empty(map: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    (!map.is_empty()).then(|| map.clone())
}
