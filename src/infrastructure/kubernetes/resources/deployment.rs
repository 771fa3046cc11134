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

use super::pod::{non_empty, PodBuilder, ProbeBuilder};
use crate::domain::model::{ContainerModel, DeploymentModel};
use crate::shared::error::Result;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Probe, Toleration};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::{BTreeMap, BTreeSet};

pub struct DeploymentBuilder<'a> {
    model: &'a DeploymentModel,
}

impl PodBuilder for DeploymentBuilder<'_> {
    fn workload_name(&self) -> &str {
        &self.model.name
    }

    fn container_model(&self) -> &ContainerModel {
        &self.model.container
    }

    fn get_labels(&self) -> BTreeMap<String, String> {
        self.model.labels.clone()
    }

    fn pod_annotations(&self) -> Option<BTreeMap<String, String>> {
        non_empty(&self.model.pod_annotations)
    }

    fn tolerations(&self) -> Option<Vec<Toleration>> {
        (!self.model.pod_tolerations.is_empty()).then(|| self.model.pod_tolerations.clone())
    }

    fn service_account_name(&self) -> Option<String> {
        self.model.service_account_name.clone()
    }

    fn depends_on(&self) -> Option<&BTreeSet<String>> {
        Some(&self.model.depends_on)
    }

    fn liveness_probe(&self) -> Option<Probe> {
        if !self.model.liveness.enabled {
            return None;
        }
        let port = self.model.liveness_port()?;
        Some(ProbeBuilder::tcp_liveness(
            port,
            self.model.liveness.initial_delay_seconds,
            self.model.liveness.period_seconds,
        ))
    }
}

impl<'a> DeploymentBuilder<'a> {
    pub fn new(model: &'a DeploymentModel) -> Self {
        Self { model }
    }

    pub fn build(&self) -> Result<Deployment> {
        let metadata = ObjectMeta {
            name: Some(self.model.name.clone()),
            namespace: Some(self.model.namespace.clone()),
            labels: non_empty(&self.model.labels),
            annotations: non_empty(&self.model.annotations),
            ..Default::default()
        };

        Ok(Deployment {
            metadata,
            spec: Some(DeploymentSpec {
                replicas: Some(self.model.replicas),
                selector: LabelSelector {
                    match_labels: Some(self.get_selector_labels()),
                    ..Default::default()
                },
                template: self.build_pod_template(),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
