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

use super::istio::bound_listener;
use super::{annotation_keys, recognized, require_entry_point, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{
    Annotation, AnnotationKind, AnnotationValue, FunctionDecl, ListenerDecl, ServiceDecl,
    ValueResolver,
};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::{BuildConfigModel, RouteHost, RouteModel};
use crate::infrastructure::constants::{SUFFIX_OPENSHIFT_BUILD_CONFIG, SUFFIX_OPENSHIFT_ROUTE};
use crate::shared::error::{KubeError, Result};

annotation_keys! {
    enum RouteKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        Host => "host",
    }
}

annotation_keys! {
    enum BuildConfigKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        ForcePullDockerImage => "forcePullDockerImage",
        BuildDockerImage => "buildDockerImage",
    }
}

fn route_host(resolver: &ValueResolver<'_>, field: &str, value: &AnnotationValue) -> Result<RouteHost> {
    match value {
        AnnotationValue::Record(record) => {
            let domain = record
                .get("domain")
                .ok_or_else(|| KubeError::malformed(field, "host string or {domain} record"))?;
            Ok(RouteHost::Domain(resolver.string(&format!("{}.domain", field), domain)?))
        }
        other => Ok(RouteHost::Host(resolver.string(field, other)?)),
    }
}

pub struct RouteProcessor;

impl RouteProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        listener: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut name = derived_name(identifier, SUFFIX_OPENSHIFT_ROUTE);
        let mut namespace = None;
        let mut labels = Default::default();
        let mut annotations = Default::default();
        let mut host = None;

        for (key, field, value) in recognized::<RouteKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                RouteKey::Name => name = resolver.string(field, value)?,
                RouteKey::Namespace => namespace = Some(resolver.string(field, value)?),
                RouteKey::Labels => labels = resolver.string_map(field, value)?,
                RouteKey::Annotations => annotations = resolver.string_map(field, value)?,
                RouteKey::Host => host = Some(route_host(&resolver, field, value)?),
            }
        }

        let host = host.ok_or_else(|| KubeError::malformed("host", "host string or {domain} record"))?;
        let host = host
            .resolve(&name, namespace.as_deref())
            .ok_or_else(|| KubeError::missing_namespace("Route", &name))?;

        ensure_valid_name("Route", &name)?;
        ctx.holder.add_route(RouteModel {
            name,
            namespace,
            listener_name: listener.to_string(),
            labels,
            annotations,
            host,
            service_name: None,
            target_port: None,
        })
    }
}

impl AnnotationProcessor for RouteProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::OpenShiftRoute
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, bound_listener(service), annotation)
    }

    fn process_listener(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &listener.name, &listener.name, annotation)
    }
}

pub struct BuildConfigProcessor;

impl BuildConfigProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut build_config = BuildConfigModel::new(derived_name(identifier, SUFFIX_OPENSHIFT_BUILD_CONFIG));

        for (key, field, value) in recognized::<BuildConfigKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                BuildConfigKey::Name => build_config.name = resolver.string(field, value)?,
                BuildConfigKey::Namespace => {
                    build_config.namespace = Some(resolver.string(field, value)?)
                }
                BuildConfigKey::Labels => build_config.labels = resolver.string_map(field, value)?,
                BuildConfigKey::Annotations => {
                    build_config.annotations = resolver.string_map(field, value)?
                }
                BuildConfigKey::ForcePullDockerImage => {
                    build_config.force_pull_docker_image = resolver.bool(field, value)?
                }
                BuildConfigKey::BuildDockerImage => {
                    build_config.build_docker_image = resolver.bool(field, value)?
                }
            }
        }

        ensure_valid_name("BuildConfig", &build_config.name)?;
        ctx.holder.set_build_config(build_config)
    }
}

impl AnnotationProcessor for BuildConfigProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::OpenShiftBuildConfig
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
    use crate::domain::annotation::{ListenerBinding, Placeholders};
    use crate::domain::context::DataHolder;
    use std::path::Path;

    fn foo_service() -> ServiceDecl {
        ServiceDecl {
            name: "foo".to_string(),
            listener: ListenerBinding::Named("fooEP".to_string()),
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_route_domain_host() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("foo");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let annotation = Annotation::new(AnnotationKind::OpenShiftRoute)
            .with("namespace", "ns")
            .with("host", AnnotationValue::record([("domain", "example.com")]));

        RouteProcessor
            .process_service(&mut ctx, &foo_service(), &annotation)
            .unwrap();

        let route = &holder.routes()[0];
        assert_eq!(route.name, "foo-openshift-route");
        assert_eq!(route.host, "foo-openshift-route-ns.example.com");
        assert_eq!(route.listener_name, "fooEP");
    }

    #[test]
    fn test_route_domain_without_namespace() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("foo");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let annotation = Annotation::new(AnnotationKind::OpenShiftRoute)
            .with("host", AnnotationValue::record([("domain", "example.com")]));

        let err = RouteProcessor
            .process_service(&mut ctx, &foo_service(), &annotation)
            .unwrap_err();
        assert!(matches!(err, KubeError::MissingNamespace { .. }));
    }

    #[test]
    fn test_single_build_config() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("foo");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let annotation = Annotation::new(AnnotationKind::OpenShiftBuildConfig);
        BuildConfigProcessor
            .process_service(&mut ctx, &foo_service(), &annotation)
            .unwrap();
        let err = BuildConfigProcessor
            .process_service(&mut ctx, &foo_service(), &annotation)
            .unwrap_err();
        assert!(matches!(err, KubeError::DuplicateArtifact { .. }));
    }
}
