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

use crate::infrastructure::constants::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct IngressModel {
    pub name: String,
    pub listener_name: String,
    pub hostname: String,
    pub path: String,
    pub target_path: Option<String>,
    pub ingress_class: String,
    pub enable_tls: bool,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    /// Filled in from the listener's Service during generation
    pub service_name: Option<String>,
    pub service_port: Option<i32>,
}

impl IngressModel {
    pub fn new(name: impl Into<String>, listener_name: impl Into<String>, hostname: String) -> Self {
        Self {
            name: name.into(),
            listener_name: listener_name.into(),
            hostname,
            path: DEFAULT_INGRESS_PATH.to_string(),
            target_path: None,
            ingress_class: DEFAULT_INGRESS_CLASS.to_string(),
            enable_tls: false,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            service_name: None,
            service_port: None,
        }
    }
}
