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

use super::pod::{non_empty, LabeledResourceBuilder};
use crate::domain::model::ServiceModel;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

pub struct ServiceBuilder<'a> {
    model: &'a ServiceModel,
    namespace: &'a str,
}

impl LabeledResourceBuilder for ServiceBuilder<'_> {
    fn get_labels(&self) -> BTreeMap<String, String> {
        self.model.labels.clone()
    }
}

impl<'a> ServiceBuilder<'a> {
    pub fn new(model: &'a ServiceModel, namespace: &'a str) -> Self {
        Self { model, namespace }
    }

    pub fn build(&self) -> Result<Service> {
        let labels = self.get_labels();
        let metadata = ObjectMeta {
            name: Some(self.model.name.clone()),
            namespace: Some(self.namespace.to_string()),
            labels: non_empty(&labels),
            annotations: non_empty(&self.model.annotations),
            ..Default::default()
        };

        Ok(Service {
            metadata,
            spec: Some(ServiceSpec {
                type_: Some(self.model.service_type.as_str().to_string()),
                ports: Some(vec![self.create_service_port()]),
                selector: non_empty(&self.model.selector),
                session_affinity: self
                    .model
                    .session_affinity
                    .map(|affinity| affinity.as_str().to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn create_service_port(&self) -> ServicePort {
        ServicePort {
            name: self.model.port_name.clone(),
            port: self.model.port,
            target_port: Some(IntOrString::Int(self.model.target_port)),
            protocol: Some(self.model.protocol.clone()),
            ..Default::default()
        }
    }
}
