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
use crate::domain::model::ResourceQuotaModel;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{ResourceQuota, ResourceQuotaSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub struct ResourceQuotaBuilder<'a> {
    model: &'a ResourceQuotaModel,
    default_namespace: &'a str,
}

impl<'a> ResourceQuotaBuilder<'a> {
    pub fn new(model: &'a ResourceQuotaModel, default_namespace: &'a str) -> Self {
        Self {
            model,
            default_namespace,
        }
    }

    pub fn build(&self) -> Result<ResourceQuota> {
        let hard = self
            .model
            .hard
            .iter()
            .map(|(resource, quantity)| (resource.clone(), Quantity(quantity.clone())))
            .collect::<std::collections::BTreeMap<_, _>>();
        let scopes: Vec<String> = self.model.scopes.iter().cloned().collect();

        Ok(ResourceQuota {
            metadata: ObjectMeta {
                name: Some(self.model.name.clone()),
                namespace: Some(
                    self.model
                        .namespace
                        .clone()
                        .unwrap_or_else(|| self.default_namespace.to_string()),
                ),
                labels: non_empty(&self.model.labels),
                annotations: non_empty(&self.model.annotations),
                ..Default::default()
            },
            spec: Some(ResourceQuotaSpec {
                hard: (!hard.is_empty()).then_some(hard),
                scopes: (!scopes.is_empty()).then_some(scopes),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}
