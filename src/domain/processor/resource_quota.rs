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

use super::{annotation_keys, recognized, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{Annotation, AnnotationKind, FunctionDecl, ServiceDecl};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::ResourceQuotaModel;
use crate::infrastructure::constants::SUFFIX_RESOURCE_QUOTA;
use crate::shared::error::Result;

annotation_keys! {
    enum QuotaAnnotationKey {
        ResourceQuotas => "resourceQuotas",
    }
}

annotation_keys! {
    enum QuotaKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        Hard => "hard",
        Scopes => "scopes",
    }
}

pub struct ResourceQuotaProcessor;

impl ResourceQuotaProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        for (_, field, value) in
            recognized::<QuotaAnnotationKey>(self.kind().as_str(), &annotation.fields)
        {
            for entry in resolver.list(field, value)? {
                let mut quota = ResourceQuotaModel {
                    name: derived_name(identifier, SUFFIX_RESOURCE_QUOTA),
                    ..Default::default()
                };
                for (key, field, value) in recognized::<QuotaKey>(field, resolver.record(field, entry)?) {
                    match key {
                        QuotaKey::Name => quota.name = resolver.string(field, value)?,
                        QuotaKey::Namespace => quota.namespace = Some(resolver.string(field, value)?),
                        QuotaKey::Labels => quota.labels = resolver.string_map(field, value)?,
                        QuotaKey::Annotations => quota.annotations = resolver.string_map(field, value)?,
                        QuotaKey::Hard => quota.hard = resolver.string_map(field, value)?,
                        QuotaKey::Scopes => quota.scopes = resolver.string_set(field, value)?,
                    }
                }
                ensure_valid_name("ResourceQuota", &quota.name)?;
                ctx.holder.add_resource_quota(quota)?;
            }
        }
        Ok(())
    }
}

impl AnnotationProcessor for ResourceQuotaProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::ResourceQuota
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
        self.register(ctx, &function.name, annotation)
    }
}
