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

use super::pod::non_empty;
use crate::domain::model::VolumeClaimModel;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

pub struct VolumeClaimBuilder<'a> {
    model: &'a VolumeClaimModel,
    /// Used when the claim does not name its own namespace
    default_namespace: &'a str,
}

impl<'a> VolumeClaimBuilder<'a> {
    pub fn new(model: &'a VolumeClaimModel, default_namespace: &'a str) -> Self {
        Self {
            model,
            default_namespace,
        }
    }

    pub fn build(&self) -> Result<PersistentVolumeClaim> {
        let namespace = self
            .model
            .namespace
            .clone()
            .unwrap_or_else(|| self.default_namespace.to_string());

        let mut requests = BTreeMap::new();
        requests.insert("storage".to_string(), Quantity(self.model.size.clone()));

        Ok(PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(self.model.name.clone()),
                namespace: Some(namespace),
                annotations: non_empty(&self.model.annotations),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![self.model.access_mode.clone()]),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_namespace_fallback() {
        let model = VolumeClaimModel::new("hello-pvc", "/home/ballerina/tmp");
        let claim = VolumeClaimBuilder::new(&model, "prod").build().unwrap();
        assert_eq!(claim.metadata.namespace.as_deref(), Some("prod"));
        let spec = claim.spec.unwrap();
        assert_eq!(spec.access_modes, Some(vec!["ReadWriteOnce".to_string()]));
        assert_eq!(
            spec.resources.unwrap().requests.unwrap().get("storage"),
            Some(&Quantity("1Gi".to_string()))
        );
    }
}
