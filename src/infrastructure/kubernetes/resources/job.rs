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

use super::pod::{non_empty, PodBuilder};
use crate::domain::model::{ContainerModel, JobModel};
use crate::shared::error::Result;
use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, Job, JobSpec, JobTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use std::collections::BTreeMap;

/// A Job document, or a CronJob when the model carries a schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobDocument {
    Job(Job),
    CronJob(CronJob),
}

pub struct JobBuilder<'a> {
    model: &'a JobModel,
}

impl PodBuilder for JobBuilder<'_> {
    fn workload_name(&self) -> &str {
        &self.model.name
    }

    fn container_model(&self) -> &ContainerModel {
        &self.model.container
    }

    fn get_labels(&self) -> BTreeMap<String, String> {
        self.model.labels.clone()
    }

    fn restart_policy(&self) -> Option<String> {
        Some(self.model.restart_policy.as_str().to_string())
    }
}

impl<'a> JobBuilder<'a> {
    pub fn new(model: &'a JobModel) -> Self {
        Self { model }
    }

    fn metadata(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.model.name.clone()),
            namespace: Some(self.model.namespace.clone()),
            labels: non_empty(&self.model.labels),
            annotations: non_empty(&self.model.annotations),
            ..Default::default()
        }
    }

    fn job_spec(&self) -> JobSpec {
        JobSpec {
            backoff_limit: Some(self.model.backoff_limit),
            active_deadline_seconds: Some(self.model.active_deadline_seconds),
            template: self.build_pod_template(),
            ..Default::default()
        }
    }

    pub fn build(&self) -> Result<JobDocument> {
        let Some(schedule) = &self.model.schedule else {
            return Ok(JobDocument::Job(Job {
                metadata: self.metadata(),
                spec: Some(self.job_spec()),
                ..Default::default()
            }));
        };

        Ok(JobDocument::CronJob(CronJob {
            metadata: self.metadata(),
            spec: Some(CronJobSpec {
                schedule: schedule.clone(),
                job_template: JobTemplateSpec {
                    metadata: None,
                    spec: Some(self.job_spec()),
                },
                ..Default::default()
            }),
            ..Default::default()
        }))
    }
}
