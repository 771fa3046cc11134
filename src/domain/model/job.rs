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

use super::deployment::ContainerModel;
use crate::infrastructure::constants::*;
use crate::shared::error::KubeError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    Always,
    Never,
    OnFailure,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "Always",
            RestartPolicy::Never => "Never",
            RestartPolicy::OnFailure => "OnFailure",
        }
    }
}

impl std::str::FromStr for RestartPolicy {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Always" => Ok(RestartPolicy::Always),
            "Never" => Ok(RestartPolicy::Never),
            "OnFailure" => Ok(RestartPolicy::OnFailure),
            _ => Err(KubeError::malformed(
                "restartPolicy",
                "one of Always, Never, OnFailure",
            )),
        }
    }
}

/// A run-to-completion workload. With a `schedule` it renders as a CronJob.
#[derive(Debug, Clone, PartialEq)]
pub struct JobModel {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub restart_policy: RestartPolicy,
    pub backoff_limit: i32,
    pub active_deadline_seconds: i64,
    pub schedule: Option<String>,
    pub container: ContainerModel,
}

impl JobModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            restart_policy: RestartPolicy::Never,
            backoff_limit: DEFAULT_JOB_BACKOFF_LIMIT,
            active_deadline_seconds: DEFAULT_JOB_ACTIVE_DEADLINE,
            schedule: None,
            container: ContainerModel::default(),
        }
    }
}
