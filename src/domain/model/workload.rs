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

use super::deployment::{ContainerModel, DeploymentModel};
use super::job::JobModel;
use std::collections::BTreeMap;

/// The single workload of a run: a long running Deployment or a batch Job.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkloadModel {
    Deployment(DeploymentModel),
    Job(JobModel),
}

impl WorkloadModel {
    pub fn name(&self) -> &str {
        match self {
            WorkloadModel::Deployment(d) => &d.name,
            WorkloadModel::Job(j) => &j.name,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            WorkloadModel::Deployment(d) => &d.namespace,
            WorkloadModel::Job(j) => &j.namespace,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WorkloadModel::Deployment(_) => "Deployment",
            WorkloadModel::Job(j) if j.schedule.is_some() => "CronJob",
            WorkloadModel::Job(_) => "Job",
        }
    }

    pub fn labels_mut(&mut self) -> &mut BTreeMap<String, String> {
        match self {
            WorkloadModel::Deployment(d) => &mut d.labels,
            WorkloadModel::Job(j) => &mut j.labels,
        }
    }

    pub fn container(&self) -> &ContainerModel {
        match self {
            WorkloadModel::Deployment(d) => &d.container,
            WorkloadModel::Job(j) => &j.container,
        }
    }

    pub fn container_mut(&mut self) -> &mut ContainerModel {
        match self {
            WorkloadModel::Deployment(d) => &mut d.container,
            WorkloadModel::Job(j) => &mut j.container,
        }
    }

    pub fn as_deployment(&self) -> Option<&DeploymentModel> {
        match self {
            WorkloadModel::Deployment(d) => Some(d),
            WorkloadModel::Job(_) => None,
        }
    }
}
