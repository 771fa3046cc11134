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

use super::secure_socket::register_tls_secrets;
use super::{annotation_keys, recognized, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{
    Annotation, AnnotationKind, AttachmentPoint, ListenerDecl, ListenerInfo, ServiceDecl,
};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::{ServiceModel, ServiceType, SessionAffinity};
use crate::infrastructure::constants::SUFFIX_SERVICE;
use crate::shared::error::{KubeError, Result};

annotation_keys! {
    enum ServiceKey {
        Name => "name",
        Labels => "labels",
        Annotations => "annotations",
        ServiceType => "serviceType",
        Port => "port",
        PortName => "portName",
        Protocol => "protocol",
        SessionAffinity => "sessionAffinity",
    }
}

pub struct ServiceProcessor;

impl ServiceProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: ListenerInfo<'_>,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let keys = recognized::<ServiceKey>(self.kind().as_str(), &annotation.fields);

        let annotation_port = keys
            .iter()
            .find(|(key, _, _)| *key == ServiceKey::Port)
            .map(|(_, field, value)| resolver.i32(field, value))
            .transpose()?;
        let mut service = ServiceModel::new(
            derived_name(listener.name, SUFFIX_SERVICE),
            listener.name,
            listener.port,
            annotation_port,
        );

        for (key, field, value) in keys {
            match key {
                ServiceKey::Name => service.name = resolver.string(field, value)?,
                ServiceKey::Labels => service.labels = resolver.string_map(field, value)?,
                ServiceKey::Annotations => service.annotations = resolver.string_map(field, value)?,
                ServiceKey::ServiceType => {
                    service.service_type = resolver.string(field, value)?.parse::<ServiceType>()?
                }
                ServiceKey::Port => {}
                ServiceKey::PortName => service.port_name = Some(resolver.string(field, value)?),
                ServiceKey::Protocol => service.protocol = resolver.string(field, value)?,
                ServiceKey::SessionAffinity => {
                    service.session_affinity =
                        Some(resolver.string(field, value)?.parse::<SessionAffinity>()?)
                }
            }
        }

        ensure_valid_name("Service", &service.name)?;
        register_tls_secrets(ctx, &listener)?;
        ctx.holder.add_service(service)
    }
}

impl AnnotationProcessor for ServiceProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Service
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        let listener = ListenerInfo::of_service(service).ok_or_else(|| {
            KubeError::unsupported_attachment(
                self.kind().as_str(),
                format!(
                    "{} bound to a listener reference, annotate the listener instead",
                    AttachmentPoint::Service(service).describe()
                ),
            )
        })?;
        self.register(ctx, listener, annotation)
    }

    fn process_listener(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, ListenerInfo::of_listener(listener), annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{ListenerBinding, Placeholders, ValueResolver};
    use crate::domain::context::DataHolder;
    use std::path::Path;

    #[test]
    fn test_named_listener_reference_is_unsupported() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let service = ServiceDecl {
            name: "hello".to_string(),
            listener: ListenerBinding::Named("helloEP".to_string()),
            annotations: Vec::new(),
        };
        let err = ServiceProcessor
            .process_service(&mut ctx, &service, &Annotation::new(AnnotationKind::Service))
            .unwrap_err();
        assert!(matches!(err, KubeError::UnsupportedAttachment { .. }));
    }

    #[test]
    fn test_listener_service() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let listener = ListenerDecl {
            name: "helloEP".to_string(),
            port: 9090,
            secure_socket: None,
            annotations: Vec::new(),
        };
        let annotation = Annotation::new(AnnotationKind::Service)
            .with("port", 8080i64)
            .with("serviceType", "NodePort");

        ServiceProcessor
            .process_listener(&mut ctx, &listener, &annotation)
            .unwrap();

        let service = holder.service_for_listener("helloEP").unwrap();
        assert_eq!(service.name, "helloep-svc");
        assert_eq!(service.port, 8080);
        assert_eq!(service.target_port, 9090);
        assert_eq!(service.service_type, ServiceType::NodePort);
    }
}
