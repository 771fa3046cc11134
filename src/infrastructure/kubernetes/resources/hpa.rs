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
use crate::domain::model::PodAutoscalerModel;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::api::autoscaling::v2::{
    CrossVersionObjectReference, HorizontalPodAutoscaler, HorizontalPodAutoscalerSpec,
    MetricSpec, MetricTarget, ResourceMetricSource,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

const SCALE_TARGET_API_VERSION: &str = "apps/v1";
const SCALE_TARGET_KIND: &str = "Deployment";

pub struct PodAutoscalerBuilder<'a> {
    model: &'a PodAutoscalerModel,
    namespace: &'a str,
}

impl<'a> PodAutoscalerBuilder<'a> {
    pub fn new(model: &'a PodAutoscalerModel, namespace: &'a str) -> Self {
        Self { model, namespace }
    }

    /// Replica bounds must be resolved before rendering.
    pub fn build(&self) -> Result<HorizontalPodAutoscaler> {
        let max_replicas = self.model.max_replicas.ok_or_else(|| {
            KubeError::validation(format!("HPA '{}' has no maxReplicas", self.model.name))
        })?;

        Ok(HorizontalPodAutoscaler {
            metadata: ObjectMeta {
                name: Some(self.model.name.clone()),
                namespace: Some(self.namespace.to_string()),
                labels: non_empty(&self.model.labels),
                ..Default::default()
            },
            spec: Some(HorizontalPodAutoscalerSpec {
                scale_target_ref: CrossVersionObjectReference {
                    api_version: Some(SCALE_TARGET_API_VERSION.to_string()),
                    kind: SCALE_TARGET_KIND.to_string(),
                    name: self.model.deployment_name.clone(),
                },
                min_replicas: self.model.min_replicas,
                max_replicas,
                metrics: Some(vec![MetricSpec {
                    type_: "Resource".to_string(),
                    resource: Some(ResourceMetricSource {
                        name: "cpu".to_string(),
                        target: MetricTarget {
                            type_: "Utilization".to_string(),
                            average_utilization: Some(self.model.cpu_percentage),
                            ..Default::default()
                        },
                    }),
                    ..Default::default()
                }]),
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
    fn test_hpa_targets_deployment() {
        let mut model = PodAutoscalerModel::new("hello-hpa");
        model.deployment_name = "hello-deployment".to_string();
        model.resolve_replicas(2);

        let hpa = PodAutoscalerBuilder::new(&model, "default").build().unwrap();
        let spec = hpa.spec.unwrap();
        assert_eq!(spec.scale_target_ref.name, "hello-deployment");
        assert_eq!(spec.min_replicas, Some(2));
        assert_eq!(spec.max_replicas, 3);
        let metric = &spec.metrics.unwrap()[0];
        assert_eq!(
            metric.resource.as_ref().unwrap().target.average_utilization,
            Some(50)
        );
    }
}
