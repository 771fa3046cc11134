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

//! Annotation processors
//!
//! One processor per annotation kind. A processor turns the fields of one annotation
//! into a model and registers it in the [`DataHolder`]. Each processor only overrides
//! the attachment points it supports; the remaining ones fail with
//! `UnsupportedAttachment`.

mod autoscaler;
mod container;
mod deployment;
mod ingress;
mod istio;
mod job;
mod openshift;
mod resource_quota;
mod secure_socket;
mod service;
mod volume;

pub use self::autoscaler::PodAutoscalerProcessor;
pub use self::deployment::DeploymentProcessor;
pub use self::ingress::IngressProcessor;
pub use self::istio::{IstioGatewayProcessor, IstioVirtualServiceProcessor};
pub use self::job::JobProcessor;
pub use self::openshift::{BuildConfigProcessor, RouteProcessor};
pub use self::resource_quota::ResourceQuotaProcessor;
pub use self::secure_socket::tls_secrets;
pub use self::service::ServiceProcessor;
pub use self::volume::{ConfigMapProcessor, SecretProcessor, VolumeClaimProcessor};

use crate::domain::annotation::{
    Annotation, AnnotationKind, AnnotationValue, AttachmentPoint, CompilationUnit, FunctionDecl,
    ListenerDecl, Placeholders, ServiceDecl, ValueResolver,
};
use crate::domain::context::DataHolder;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Everything a processor may touch while handling one annotation.
pub struct ProcessorContext<'a> {
    pub holder: &'a mut DataHolder,
    pub resolver: ValueResolver<'a>,
    /// Relative data file paths are read from here
    pub source_root: &'a Path,
}

pub trait AnnotationProcessor {
    fn kind(&self) -> AnnotationKind;

    fn process_service(
        &self,
        _ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        _annotation: &Annotation,
    ) -> Result<()> {
        Err(KubeError::unsupported_attachment(
            self.kind().as_str(),
            AttachmentPoint::Service(service).describe(),
        ))
    }

    fn process_function(
        &self,
        _ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        _annotation: &Annotation,
    ) -> Result<()> {
        Err(KubeError::unsupported_attachment(
            self.kind().as_str(),
            AttachmentPoint::Function(function).describe(),
        ))
    }

    fn process_listener(
        &self,
        _ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        _annotation: &Annotation,
    ) -> Result<()> {
        Err(KubeError::unsupported_attachment(
            self.kind().as_str(),
            AttachmentPoint::Listener(listener).describe(),
        ))
    }
}

pub fn processor_for(kind: AnnotationKind) -> Box<dyn AnnotationProcessor> {
    match kind {
        AnnotationKind::Deployment => Box::new(DeploymentProcessor),
        AnnotationKind::Service => Box::new(ServiceProcessor),
        AnnotationKind::Ingress => Box::new(IngressProcessor),
        AnnotationKind::Secret => Box::new(SecretProcessor),
        AnnotationKind::ConfigMap => Box::new(ConfigMapProcessor),
        AnnotationKind::PersistentVolumeClaim => Box::new(VolumeClaimProcessor),
        AnnotationKind::ResourceQuota => Box::new(ResourceQuotaProcessor),
        AnnotationKind::PodAutoscaler => Box::new(PodAutoscalerProcessor),
        AnnotationKind::Job => Box::new(JobProcessor),
        AnnotationKind::IstioGateway => Box::new(IstioGatewayProcessor),
        AnnotationKind::IstioVirtualService => Box::new(IstioVirtualServiceProcessor),
        AnnotationKind::OpenShiftRoute => Box::new(RouteProcessor),
        AnnotationKind::OpenShiftBuildConfig => Box::new(BuildConfigProcessor),
    }
}

/// Runs every annotation of the unit through its processor, in declaration order.
pub fn process_unit(
    unit: &CompilationUnit,
    holder: &mut DataHolder,
    placeholders: &Placeholders,
    source_root: &Path,
) -> Result<()> {
    let mut ctx = ProcessorContext {
        holder,
        resolver: ValueResolver::new(placeholders),
        source_root,
    };

    for declaration in &unit.declarations {
        let point = declaration.attachment_point();
        for annotation in declaration.annotations() {
            debug!("Processing {} on {}", annotation.kind, point.describe());
            let processor = processor_for(annotation.kind);
            match point {
                AttachmentPoint::Service(service) => {
                    processor.process_service(&mut ctx, service, annotation)?
                }
                AttachmentPoint::Function(function) => {
                    processor.process_function(&mut ctx, function, annotation)?
                }
                AttachmentPoint::Listener(listener) => {
                    processor.process_listener(&mut ctx, listener, annotation)?
                }
            }
        }
    }
    Ok(())
}

/// Splits `fields` into recognized keys and logs a warning for the rest.
pub(crate) fn recognized<'f, K: FromStr>(
    context: &str,
    fields: &'f BTreeMap<String, AnnotationValue>,
) -> Vec<(K, &'f str, &'f AnnotationValue)> {
    fields
        .iter()
        .filter_map(|(key, value)| match key.parse::<K>() {
            Ok(k) => Some((k, key.as_str(), value)),
            Err(_) => {
                warn!("Ignoring unknown key '{}' in {}", key, context);
                None
            }
        })
        .collect()
}

/// Keys are closed per annotation kind; this generates the `FromStr` lookup.
macro_rules! annotation_keys {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $key:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),*
        }

        impl std::str::FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)*
                    _ => Err(()),
                }
            }
        }
    };
}
pub(crate) use annotation_keys;

/// Fails with `InvalidAttachment` unless the function is the program entry point.
pub(crate) fn require_entry_point(kind: AnnotationKind, function: &FunctionDecl) -> Result<()> {
    if function.is_entry_point() {
        Ok(())
    } else {
        Err(KubeError::invalid_attachment(
            kind.as_str(),
            &function.name,
            "only the program entry point function can carry this annotation",
        ))
    }
}
