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

use crate::infrastructure::constants::DEFAULT_CPU_PERCENTAGE;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PodAutoscalerModel {
    pub name: String,
    pub deployment_name: String,
    pub min_replicas: Option<i32>,
    pub max_replicas: Option<i32>,
    pub cpu_percentage: i32,
    pub labels: BTreeMap<String, String>,
}

impl PodAutoscalerModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deployment_name: String::new(),
            min_replicas: None,
            max_replicas: None,
            cpu_percentage: DEFAULT_CPU_PERCENTAGE,
            labels: BTreeMap::new(),
        }
    }

    /// Unset bounds default to `replicas` and `replicas + 1`.
    pub fn resolve_replicas(&mut self, replicas: i32) {
        if self.min_replicas.is_none() {
            self.min_replicas = Some(replicas);
        }
        if self.max_replicas.is_none() {
            self.max_replicas = Some(replicas + 1);
        }
    }

    /// Fails when both bounds are known and `min > max`.
    pub fn check_bounds(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_replicas, self.max_replicas) {
            if min > max {
                return Err(KubeError::validation(format!(
                    "HPA '{}' has minReplicas {} greater than maxReplicas {}",
                    self.name, min, max
                )));
            }
        }
        Ok(())
    }
}
