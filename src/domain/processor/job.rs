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
use crate::domain::annotation::{Annotation, AnnotationKind, FunctionDecl};
use crate::domain::model::naming::{derived_name, ensure_valid_label};
use crate::domain::model::{JobModel, RestartPolicy};
use crate::infrastructure::constants::SUFFIX_JOB;
use crate::shared::error::Result;
use tracing::warn;

annotation_keys! {
    enum JobKey {
        Name => "name",
        Namespace => "namespace",
        Labels => "labels",
        Annotations => "annotations",
        RestartPolicy => "restartPolicy",
        BackoffLimit => "backoffLimit",
        ActiveDeadlineSeconds => "activeDeadlineSeconds",
        Schedule => "schedule",
    }
}

/// Batch workload. Only valid on the program entry point.
pub struct JobProcessor;

impl AnnotationProcessor for JobProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Job
    }

    fn process_function(
        &self,
        ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        require_entry_point(self.kind(), function)?;
        let resolver = ctx.resolver;
        let mut job = JobModel::new(derived_name(ctx.holder.output_name(), SUFFIX_JOB));

        for (field, value) in &annotation.fields {
            if let Ok(key) = field.parse::<ContainerKey>() {
                apply_container_key(&resolver, &mut job.container, key, field, value)?;
                continue;
            }
            let Ok(key) = field.parse::<JobKey>() else {
                warn!("Ignoring unknown key '{}' in {}", field, self.kind());
                continue;
            };
            match key {
                JobKey::Name => job.name = resolver.string(field, value)?,
                JobKey::Namespace => job.namespace = resolver.string(field, value)?,
                JobKey::Labels => job.labels = resolver.string_map(field, value)?,
                JobKey::Annotations => job.annotations = resolver.string_map(field, value)?,
                JobKey::RestartPolicy => {
                    job.restart_policy = resolver.string(field, value)?.parse::<RestartPolicy>()?
                }
                JobKey::BackoffLimit => job.backoff_limit = resolver.i32(field, value)?,
                JobKey::ActiveDeadlineSeconds => {
                    job.active_deadline_seconds = resolver.int(field, value)?
                }
                JobKey::Schedule => job.schedule = Some(resolver.string(field, value)?),
            }
        }

        ensure_valid_label("Job", &job.name)?;
        ctx.holder.set_job(job)
    }
}
