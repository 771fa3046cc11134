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

//! Istio networking documents. Istio types are not part of k8s-openapi, so the
//! documents are plain serde structs around a typed `ObjectMeta`.

use super::pod::non_empty;
use crate::domain::model::{GatewayModel, GatewayServer, HttpRoute, VirtualServiceModel};
use crate::infrastructure::constants::ISTIO_API_VERSION;
use crate::shared::error::Result;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResource<S> {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: S,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewaySpec {
    pub selector: BTreeMap<String, String>,
    pub servers: Vec<GatewayServer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VirtualServiceSpec {
    pub hosts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gateways: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<HttpRoute>,
}

pub type Gateway = CustomResource<GatewaySpec>;
pub type VirtualService = CustomResource<VirtualServiceSpec>;

pub(crate) fn metadata(
    name: &str,
    namespace: Option<&str>,
    labels: &BTreeMap<String, String>,
    annotations: &BTreeMap<String, String>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: namespace.map(str::to_string),
        labels: non_empty(labels),
        annotations: non_empty(annotations),
        ..Default::default()
    }
}

pub struct GatewayBuilder<'a> {
    model: &'a GatewayModel,
}

impl<'a> GatewayBuilder<'a> {
    pub fn new(model: &'a GatewayModel) -> Self {
        Self { model }
    }

    pub fn build(&self) -> Result<Gateway> {
        Ok(CustomResource {
            api_version: ISTIO_API_VERSION.to_string(),
            kind: "Gateway".to_string(),
            metadata: metadata(
                &self.model.name,
                self.model.namespace.as_deref(),
                &self.model.labels,
                &self.model.annotations,
            ),
            spec: GatewaySpec {
                selector: self.model.selector.clone(),
                servers: self.model.servers.clone(),
            },
        })
    }
}

pub struct VirtualServiceBuilder<'a> {
    model: &'a VirtualServiceModel,
}

impl<'a> VirtualServiceBuilder<'a> {
    pub fn new(model: &'a VirtualServiceModel) -> Self {
        Self { model }
    }

    pub fn build(&self) -> Result<VirtualService> {
        Ok(CustomResource {
            api_version: ISTIO_API_VERSION.to_string(),
            kind: "VirtualService".to_string(),
            metadata: metadata(
                &self.model.name,
                self.model.namespace.as_deref(),
                &self.model.labels,
                &self.model.annotations,
            ),
            spec: VirtualServiceSpec {
                hosts: self.model.hosts.clone(),
                gateways: self.model.gateways.clone(),
                http: self.model.http.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_document() {
        let mut model = GatewayModel::new("hello-istio-gw");
        model.servers.push(GatewayServer::default_http());
        let yaml = serde_yaml::to_string(&GatewayBuilder::new(&model).build().unwrap()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["apiVersion"].as_str(), Some("networking.istio.io/v1alpha3"));
        assert_eq!(value["kind"].as_str(), Some("Gateway"));
        assert_eq!(value["spec"]["selector"]["istio"].as_str(), Some("ingressgateway"));
        assert_eq!(value["spec"]["servers"][0]["port"]["number"].as_i64(), Some(80));
        assert!(value["spec"]["servers"][0].get("tls").is_none());
    }

    #[test]
    fn test_virtual_service_omits_empty_lists() {
        let model = VirtualServiceModel::new("hello-istio-vs", "hello");
        let yaml =
            serde_yaml::to_string(&VirtualServiceBuilder::new(&model).build().unwrap()).unwrap();
        assert!(!yaml.contains("gateways"));
        assert!(!yaml.contains("http"));
    }
}
