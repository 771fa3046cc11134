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
use crate::domain::model::naming::{derived_name, ensure_valid_name, valid_name};
use crate::domain::model::IngressModel;
use crate::infrastructure::constants::{DEFAULT_HOSTNAME_SUFFIX, SUFFIX_INGRESS};
use crate::shared::error::{KubeError, Result};

annotation_keys! {
    enum IngressKey {
        Name => "name",
        Labels => "labels",
        Annotations => "annotations",
        Hostname => "hostname",
        Path => "path",
        TargetPath => "targetPath",
        IngressClass => "ingressClass",
        EnableTls => "enableTLS",
    }
}

pub struct IngressProcessor;

impl IngressProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: ListenerInfo<'_>,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut ingress = IngressModel::new(
            derived_name(listener.name, SUFFIX_INGRESS),
            listener.name,
            format!("{}{}", valid_name(listener.name), DEFAULT_HOSTNAME_SUFFIX),
        );

        for (key, field, value) in recognized::<IngressKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                IngressKey::Name => ingress.name = resolver.string(field, value)?,
                IngressKey::Labels => ingress.labels = resolver.string_map(field, value)?,
                IngressKey::Annotations => ingress.annotations = resolver.string_map(field, value)?,
                IngressKey::Hostname => ingress.hostname = resolver.string(field, value)?,
                IngressKey::Path => ingress.path = resolver.string(field, value)?,
                IngressKey::TargetPath => ingress.target_path = Some(resolver.string(field, value)?),
                IngressKey::IngressClass => ingress.ingress_class = resolver.string(field, value)?,
                IngressKey::EnableTls => ingress.enable_tls = resolver.bool(field, value)?,
            }
        }

        ensure_valid_name("Ingress", &ingress.name)?;
        register_tls_secrets(ctx, &listener)?;
        ctx.holder.add_ingress(ingress)
    }
}

impl AnnotationProcessor for IngressProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Ingress
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
