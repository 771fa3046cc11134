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

use super::{annotation_keys, recognized, require_entry_point, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{Annotation, AnnotationKind, FunctionDecl, ServiceDecl};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::PodAutoscalerModel;
use crate::infrastructure::constants::SUFFIX_HPA;
use crate::shared::error::Result;

annotation_keys! {
    enum AutoscalerKey {
        Name => "name",
        Labels => "labels",
        MinReplicas => "minReplicas",
        MaxReplicas => "maxReplicas",
        CpuPercentage => "cpuPercentage",
    }
}

pub struct PodAutoscalerProcessor;

impl PodAutoscalerProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut hpa = PodAutoscalerModel::new(derived_name(identifier, SUFFIX_HPA));

        for (key, field, value) in recognized::<AutoscalerKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                AutoscalerKey::Name => hpa.name = resolver.string(field, value)?,
                AutoscalerKey::Labels => hpa.labels = resolver.string_map(field, value)?,
                AutoscalerKey::MinReplicas => hpa.min_replicas = Some(resolver.i32(field, value)?),
                AutoscalerKey::MaxReplicas => hpa.max_replicas = Some(resolver.i32(field, value)?),
                AutoscalerKey::CpuPercentage => hpa.cpu_percentage = resolver.i32(field, value)?,
            }
        }

        hpa.check_bounds()?;
        ensure_valid_name("HorizontalPodAutoscaler", &hpa.name)?;
        ctx.holder.set_pod_autoscaler(hpa)
    }
}

impl AnnotationProcessor for PodAutoscalerProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::PodAutoscaler
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
