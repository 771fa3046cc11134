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

use k8s_openapi::api::core::v1::EnvVar;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct EnvironmentBuilder {
    custom_vars: BTreeMap<String, String>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_vars(mut self, vars: &BTreeMap<String, String>) -> Self {
        self.custom_vars.extend(vars.clone());
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.custom_vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Variables come out sorted by name.
    pub fn build(self) -> Vec<EnvVar> {
        self.custom_vars
            .into_iter()
            .map(|(name, value)| EnvVar {
                name,
                value: Some(value),
                ..Default::default()
            })
            .collect()
    }
}
