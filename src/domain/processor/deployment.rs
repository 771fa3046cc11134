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

use super::container::{apply_container_key, ContainerKey};
use super::{annotation_keys, require_entry_point, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{Annotation, AnnotationKind, AnnotationValue, FunctionDecl, ServiceDecl};
use crate::domain::model::naming::{derived_name, ensure_valid_label};
use crate::domain::model::DeploymentModel;
use crate::infrastructure::constants::SUFFIX_DEPLOYMENT;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::Toleration;
use tracing::warn;

annotation_keys! {
    enum DeploymentKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        PodAnnotations => "podAnnotations",
        PodTolerations => "podTolerations",
        Replicas => "replicas",
        EnableLiveness => "enableLiveness",
        LivenessPort => "livenessPort",
        InitialDelaySeconds => "initialDelaySeconds",
        PeriodSeconds => "periodSeconds",
        DependsOn => "dependsOn",
        ServiceAccountName => "serviceAccountName",
    }
}

pub struct DeploymentProcessor;

impl DeploymentProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let mut deployment = DeploymentModel::new(derived_name(identifier, SUFFIX_DEPLOYMENT));
        for (field, value) in &annotation.fields {
            apply_deployment_field(ctx, &mut deployment, field, value)?;
        }
        ensure_valid_label("Deployment", &deployment.name)?;
        ctx.holder.set_deployment(deployment)
    }
}

fn apply_deployment_field(
    ctx: &ProcessorContext<'_>,
    deployment: &mut DeploymentModel,
    field: &str,
    value: &AnnotationValue,
) -> Result<()> {
    let resolver = &ctx.resolver;
    if let Ok(key) = field.parse::<ContainerKey>() {
        return apply_container_key(resolver, &mut deployment.container, key, field, value);
    }
    let Ok(key) = field.parse::<DeploymentKey>() else {
        warn!("Ignoring unknown key '{}' in {}", field, AnnotationKind::Deployment);
        return Ok(());
    };

    match key {
        DeploymentKey::Name => deployment.name = resolver.string(field, value)?,
        DeploymentKey::Namespace => deployment.namespace = resolver.string(field, value)?,
        DeploymentKey::Labels => deployment.labels = resolver.string_map(field, value)?,
        DeploymentKey::Annotations => deployment.annotations = resolver.string_map(field, value)?,
        DeploymentKey::PodAnnotations => {
            deployment.pod_annotations = resolver.string_map(field, value)?
        }
        DeploymentKey::PodTolerations => {
            deployment.pod_tolerations =
                resolver.decode::<Vec<Toleration>>(field, value, "list of tolerations")?
        }
        DeploymentKey::Replicas => deployment.replicas = resolver.i32(field, value)?,
        DeploymentKey::EnableLiveness => deployment.liveness.enabled = resolver.bool(field, value)?,
        DeploymentKey::LivenessPort => deployment.liveness.port = Some(resolver.i32(field, value)?),
        DeploymentKey::InitialDelaySeconds => {
            deployment.liveness.initial_delay_seconds = resolver.i32(field, value)?
        }
        DeploymentKey::PeriodSeconds => {
            deployment.liveness.period_seconds = resolver.i32(field, value)?
        }
        DeploymentKey::DependsOn => deployment.depends_on = resolver.string_set(field, value)?,
        DeploymentKey::ServiceAccountName => {
            deployment.service_account_name = Some(resolver.string(field, value)?)
        }
    }
    Ok(())
}

impl AnnotationProcessor for DeploymentProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Deployment
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, annotation)
    }

    fn process_function(
        &self,
        ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        require_entry_point(self.kind(), function)?;
        let identifier = ctx.holder.output_name().to_string();
        self.register(ctx, &identifier, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{InlineListener, ListenerBinding, Placeholders, ValueResolver};
    use crate::domain::context::DataHolder;
    use crate::domain::model::WorkloadModel;
    use crate::shared::error::KubeError;
    use std::path::Path;

    fn service(name: &str) -> ServiceDecl {
        ServiceDecl {
            name: name.to_string(),
            listener: ListenerBinding::Anonymous(InlineListener {
                port: 9090,
                secure_socket: None,
            }),
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_defaults_and_overrides() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let annotation = Annotation::new(AnnotationKind::Deployment)
            .with("replicas", 3i64)
            .with("enableLiveness", true)
            .with("image", "example/hello:1.0")
            .with("dependsOn", vec!["db"])
            .with("unknownKey", "ignored");

        DeploymentProcessor
            .process_service(&mut ctx, &service("Hello_World"), &annotation)
            .unwrap();

        let Some(WorkloadModel::Deployment(deployment)) = holder.workload() else {
            panic!("deployment not registered");
        };
        assert_eq!(deployment.name, "hello-world-deployment");
        assert_eq!(deployment.namespace, "default");
        assert_eq!(deployment.replicas, 3);
        assert!(deployment.liveness.enabled);
        assert_eq!(deployment.container.image, "example/hello:1.0");
        assert!(deployment.depends_on.contains("db"));
    }

    #[test]
    fn test_non_entry_function_is_rejected() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let function = FunctionDecl {
            name: "helper".to_string(),
            annotations: Vec::new(),
        };
        let err = DeploymentProcessor
            .process_function(&mut ctx, &function, &Annotation::new(AnnotationKind::Deployment))
            .unwrap_err();
        assert!(matches!(err, KubeError::InvalidAttachment { .. }));
    }

    #[test]
    fn test_listener_is_unsupported() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let listener = crate::domain::annotation::ListenerDecl {
            name: "ep".to_string(),
            port: 9090,
            secure_socket: None,
            annotations: Vec::new(),
        };
        let err = DeploymentProcessor
            .process_listener(&mut ctx, &listener, &Annotation::new(AnnotationKind::Deployment))
            .unwrap_err();
        assert!(matches!(err, KubeError::UnsupportedAttachment { .. }));
    }
}
