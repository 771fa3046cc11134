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

use super::pod::LabeledResourceBuilder;
use crate::domain::model::IngressModel;
use crate::infrastructure::constants::*;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

const PATH_TYPE_PREFIX: &str = "Prefix";
const PATH_TYPE_IMPLEMENTATION_SPECIFIC: &str = "ImplementationSpecific";

pub struct IngressBuilder<'a> {
    model: &'a IngressModel,
    namespace: &'a str,
}

impl LabeledResourceBuilder for IngressBuilder<'_> {
    fn get_labels(&self) -> BTreeMap<String, String> {
        self.model.labels.clone()
    }
}

impl<'a> IngressBuilder<'a> {
    pub fn new(model: &'a IngressModel, namespace: &'a str) -> Self {
        Self { model, namespace }
    }

    /// Controller annotations first, user annotations override them.
    fn annotations(&self) -> BTreeMap<String, String> {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            ANNOTATION_INGRESS_CLASS.to_string(),
            self.model.ingress_class.clone(),
        );
        if self.model.enable_tls {
            annotations.insert(ANNOTATION_NGINX_SSL_PASSTHROUGH.to_string(), "true".to_string());
        }
        if let Some(target_path) = &self.model.target_path {
            annotations.insert(ANNOTATION_NGINX_REWRITE_TARGET.to_string(), target_path.clone());
        }
        annotations.extend(self.model.annotations.clone());
        annotations
    }

    pub fn build(&self) -> Result<Ingress> {
        let (Some(service_name), Some(service_port)) =
            (&self.model.service_name, self.model.service_port)
        else {
            return Err(KubeError::validation(format!(
                "Ingress '{}' has no Service for listener '{}'",
                self.model.name, self.model.listener_name
            )));
        };

        let labels = self.get_labels();
        let path_type = if self.model.target_path.is_some() {
            PATH_TYPE_IMPLEMENTATION_SPECIFIC
        } else {
            PATH_TYPE_PREFIX
        };

        let rule = IngressRule {
            host: Some(self.model.hostname.clone()),
            http: Some(HTTPIngressRuleValue {
                paths: vec![HTTPIngressPath {
                    path: Some(self.model.path.clone()),
                    path_type: path_type.to_string(),
                    backend: IngressBackend {
                        service: Some(IngressServiceBackend {
                            name: service_name.clone(),
                            port: Some(ServiceBackendPort {
                                number: Some(service_port),
                                ..Default::default()
                            }),
                        }),
                        ..Default::default()
                    },
                }],
            }),
        };

        let tls = self.model.enable_tls.then(|| {
            vec![IngressTLS {
                hosts: Some(vec![self.model.hostname.clone()]),
                secret_name: None,
            }]
        });

        Ok(Ingress {
            metadata: ObjectMeta {
                name: Some(self.model.name.clone()),
                namespace: Some(self.namespace.to_string()),
                labels: (!labels.is_empty()).then_some(labels),
                annotations: Some(self.annotations()),
                ..Default::default()
            },
            spec: Some(IngressSpec {
                rules: Some(vec![rule]),
                tls,
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
