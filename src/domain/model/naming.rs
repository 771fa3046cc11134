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

use crate::shared::error::{KubeError, Result};

/// Lowercases an identifier and replaces underscores with hyphens.
pub fn valid_name(identifier: &str) -> String {
    identifier.to_lowercase().replace('_', "-")
}

/// Name used when an annotation leaves `name` blank.
pub fn derived_name(identifier: &str, suffix: &str) -> String {
    format!("{}{}", valid_name(identifier), suffix)
}

/// DNS-1123 subdomain check used for every generated resource name.
pub fn is_valid_k8s_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    if !name.chars().next().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }
    if !name.chars().last().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}

/// DNS-1123 label check: no dots, at most 63 characters.
pub fn is_valid_k8s_label(name: &str) -> bool {
    name.len() <= 63 && !name.contains('.') && is_valid_k8s_name(name)
}

/// Workload names end up in pod hostnames, so they must be labels.
pub fn ensure_valid_label(resource_type: &str, name: &str) -> Result<()> {
    if is_valid_k8s_label(name) {
        Ok(())
    } else {
        Err(KubeError::validation(format!(
            "Invalid {} name '{}': must be a DNS-1123 label of at most 63 lowercase \
             alphanumeric characters or '-', starting and ending with an alphanumeric character",
            resource_type, name
        )))
    }
}

pub fn ensure_valid_name(resource_type: &str, name: &str) -> Result<()> {
    if is_valid_k8s_name(name) {
        Ok(())
    } else {
        Err(KubeError::validation(format!(
            "Invalid {} name '{}': must consist of lowercase alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character",
            resource_type, name
        )))
    }
}
