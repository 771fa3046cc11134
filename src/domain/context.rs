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

//! Run-scoped collection of every model registered by the annotation processors.
//!
//! A `DataHolder` is created for one compilation unit, filled by the processors in
//! declaration order and then handed to the artifact manager. Multi-instance kinds
//! are kept in registration order; re-registering an identical model is a no-op while
//! a different model under an existing name is rejected as a duplicate.

use crate::domain::model::*;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Models that are identified by their resource name.
pub trait NamedModel: PartialEq {
    const RESOURCE_TYPE: &'static str;
    fn name(&self) -> &str;
}

macro_rules! named_model {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(impl NamedModel for $ty {
            const RESOURCE_TYPE: &'static str = $kind;
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

named_model! {
    SecretModel => "Secret",
    ConfigMapModel => "ConfigMap",
    VolumeClaimModel => "PersistentVolumeClaim",
    IngressModel => "Ingress",
    ResourceQuotaModel => "ResourceQuota",
    GatewayModel => "Gateway",
    VirtualServiceModel => "VirtualService",
    RouteModel => "Route",
    ServiceModel => "Service",
}

/// Returns `true` when the model was added, `false` when an identical one was present.
fn add_or_merge<T: NamedModel>(items: &mut Vec<T>, model: T) -> Result<bool> {
    match items.iter().find(|existing| existing.name() == model.name()) {
        Some(existing) if *existing == model => {
            debug!("{} '{}' already registered", T::RESOURCE_TYPE, model.name());
            Ok(false)
        }
        Some(_) => Err(KubeError::duplicate(T::RESOURCE_TYPE, model.name())),
        None => {
            items.push(model);
            Ok(true)
        }
    }
}

#[derive(Debug, Default)]
pub struct DataHolder {
    output_name: String,
    pub(crate) workload: Option<WorkloadModel>,
    pub(crate) pod_autoscaler: Option<PodAutoscalerModel>,
    pub(crate) build_config: Option<BuildConfigModel>,
    /// listener name -> Service
    pub(crate) services: BTreeMap<String, ServiceModel>,
    /// listener name -> TLS secrets derived from its secure socket
    pub(crate) listener_secrets: BTreeMap<String, Vec<SecretModel>>,
    pub(crate) secrets: Vec<SecretModel>,
    pub(crate) config_maps: Vec<ConfigMapModel>,
    pub(crate) volume_claims: Vec<VolumeClaimModel>,
    pub(crate) ingresses: Vec<IngressModel>,
    pub(crate) resource_quotas: Vec<ResourceQuotaModel>,
    pub(crate) gateways: Vec<GatewayModel>,
    pub(crate) virtual_services: Vec<VirtualServiceModel>,
    pub(crate) routes: Vec<RouteModel>,
}

impl DataHolder {
    /// `output_name` is the base name of the compiled artifact, e.g. `hello` for `hello.jar`.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            ..Default::default()
        }
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn set_deployment(&mut self, deployment: DeploymentModel) -> Result<()> {
        self.set_workload(WorkloadModel::Deployment(deployment))
    }

    pub fn set_job(&mut self, job: JobModel) -> Result<()> {
        self.set_workload(WorkloadModel::Job(job))
    }

    fn set_workload(&mut self, workload: WorkloadModel) -> Result<()> {
        if let Some(existing) = &self.workload {
            return Err(KubeError::duplicate(
                format!("{} (already defined {})", workload.kind(), existing.kind()),
                workload.name(),
            ));
        }
        debug!("Registered {} '{}'", workload.kind(), workload.name());
        self.workload = Some(workload);
        Ok(())
    }

    pub fn set_pod_autoscaler(&mut self, hpa: PodAutoscalerModel) -> Result<()> {
        if self.pod_autoscaler.is_some() {
            return Err(KubeError::duplicate("HorizontalPodAutoscaler", hpa.name));
        }
        self.pod_autoscaler = Some(hpa);
        Ok(())
    }

    pub fn set_build_config(&mut self, build_config: BuildConfigModel) -> Result<()> {
        if self.build_config.is_some() {
            return Err(KubeError::duplicate("BuildConfig", build_config.name));
        }
        self.build_config = Some(build_config);
        Ok(())
    }

    pub fn add_service(&mut self, service: ServiceModel) -> Result<()> {
        if let Some(existing) = self.services.get(&service.listener_name) {
            if *existing == service {
                return Ok(());
            }
            return Err(KubeError::duplicate(
                format!("Service for listener '{}'", service.listener_name),
                service.name,
            ));
        }
        if self.services.values().any(|s| s.name == service.name) {
            return Err(KubeError::duplicate(ServiceModel::RESOURCE_TYPE, service.name));
        }
        self.services.insert(service.listener_name.clone(), service);
        Ok(())
    }

    pub fn add_secret(&mut self, secret: SecretModel) -> Result<()> {
        add_or_merge(&mut self.secrets, secret).map(|_| ())
    }

    /// Registers TLS secrets both in the secret set and under the listener.
    pub fn add_listener_secrets(&mut self, listener: &str, secrets: Vec<SecretModel>) -> Result<()> {
        for secret in secrets {
            add_or_merge(&mut self.secrets, secret.clone())?;
            let entry = self.listener_secrets.entry(listener.to_string()).or_default();
            if !entry.contains(&secret) {
                entry.push(secret);
            }
        }
        Ok(())
    }

    pub fn add_config_map(&mut self, config_map: ConfigMapModel) -> Result<()> {
        add_or_merge(&mut self.config_maps, config_map).map(|_| ())
    }

    pub fn add_volume_claim(&mut self, claim: VolumeClaimModel) -> Result<()> {
        add_or_merge(&mut self.volume_claims, claim).map(|_| ())
    }

    pub fn add_ingress(&mut self, ingress: IngressModel) -> Result<()> {
        add_or_merge(&mut self.ingresses, ingress).map(|_| ())
    }

    pub fn add_resource_quota(&mut self, quota: ResourceQuotaModel) -> Result<()> {
        add_or_merge(&mut self.resource_quotas, quota).map(|_| ())
    }

    pub fn add_gateway(&mut self, gateway: GatewayModel) -> Result<()> {
        add_or_merge(&mut self.gateways, gateway).map(|_| ())
    }

    pub fn add_virtual_service(&mut self, virtual_service: VirtualServiceModel) -> Result<()> {
        add_or_merge(&mut self.virtual_services, virtual_service).map(|_| ())
    }

    pub fn add_route(&mut self, route: RouteModel) -> Result<()> {
        add_or_merge(&mut self.routes, route).map(|_| ())
    }

    pub fn workload(&self) -> Option<&WorkloadModel> {
        self.workload.as_ref()
    }

    pub fn pod_autoscaler(&self) -> Option<&PodAutoscalerModel> {
        self.pod_autoscaler.as_ref()
    }

    pub fn build_config(&self) -> Option<&BuildConfigModel> {
        self.build_config.as_ref()
    }

    pub fn service_for_listener(&self, listener: &str) -> Option<&ServiceModel> {
        self.services.get(listener)
    }

    pub fn secrets_for_listener(&self, listener: &str) -> &[SecretModel] {
        self.listener_secrets
            .get(listener)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceModel> {
        self.services.values()
    }

    pub fn secrets(&self) -> &[SecretModel] {
        &self.secrets
    }

    pub fn config_maps(&self) -> &[ConfigMapModel] {
        &self.config_maps
    }

    pub fn volume_claims(&self) -> &[VolumeClaimModel] {
        &self.volume_claims
    }

    pub fn ingresses(&self) -> &[IngressModel] {
        &self.ingresses
    }

    pub fn resource_quotas(&self) -> &[ResourceQuotaModel] {
        &self.resource_quotas
    }

    pub fn gateways(&self) -> &[GatewayModel] {
        &self.gateways
    }

    pub fn virtual_services(&self) -> &[VirtualServiceModel] {
        &self.virtual_services
    }

    pub fn routes(&self) -> &[RouteModel] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_is_singleton() {
        let mut holder = DataHolder::new("hello");
        holder
            .set_deployment(DeploymentModel::new("hello-deployment"))
            .unwrap();
        let err = holder.set_job(JobModel::new("hello-job")).unwrap_err();
        assert!(matches!(err, KubeError::DuplicateArtifact { .. }));
        assert_eq!(holder.workload().map(|w| w.name()), Some("hello-deployment"));
    }

    #[test]
    fn test_identical_secret_is_merged() {
        let mut holder = DataHolder::new("hello");
        let secret = SecretModel::new("hello-secret", "/home/ballerina/certs");
        holder.add_secret(secret.clone()).unwrap();
        holder.add_secret(secret).unwrap();
        assert_eq!(holder.secrets().len(), 1);
    }

    #[test]
    fn test_conflicting_config_map_is_duplicate() {
        let mut holder = DataHolder::new("hello");
        holder
            .add_config_map(ConfigMapModel::new("hello-config-map", "/data/a"))
            .unwrap();
        let err = holder
            .add_config_map(ConfigMapModel::new("hello-config-map", "/data/b"))
            .unwrap_err();
        assert!(
            matches!(err, KubeError::DuplicateArtifact { ref resource_type, .. } if resource_type == "ConfigMap")
        );
    }

    #[test]
    fn test_listener_secrets_lookup() {
        let mut holder = DataHolder::new("hello");
        let secret = SecretModel::new("ep-keystore", "/home/ballerina/certs");
        holder
            .add_listener_secrets("ep", vec![secret.clone()])
            .unwrap();
        holder.add_listener_secrets("ep", vec![secret]).unwrap();
        assert_eq!(holder.secrets_for_listener("ep").len(), 1);
        assert!(holder.secrets_for_listener("other").is_empty());
        assert_eq!(holder.secrets().len(), 1);
    }

    #[test]
    fn test_service_per_listener() {
        let mut holder = DataHolder::new("hello");
        holder
            .add_service(ServiceModel::new("hello-svc", "hello", 9090, None))
            .unwrap();
        assert!(holder
            .add_service(ServiceModel::new("hello-svc", "other", 9091, None))
            .is_err());
        assert_eq!(
            holder.service_for_listener("hello").map(|s| s.port),
            Some(9090)
        );
    }
}
