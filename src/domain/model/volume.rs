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

//! Models mounted into the workload as volumes

use crate::infrastructure::constants::*;
use std::collections::BTreeMap;

/// Secret volume. Data values are raw bytes, base64-encoded when rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretModel {
    pub name: String,
    pub mount_path: String,
    pub data: BTreeMap<String, Vec<u8>>,
    pub read_only: bool,
    pub default_mode: Option<i32>,
    /// Reserved config file secret mounted at the config path
    pub config_file: bool,
}

impl SecretModel {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            data: BTreeMap::new(),
            read_only: true,
            default_mode: None,
            config_file: false,
        }
    }

    pub fn config_file(name: impl Into<String>, content: Vec<u8>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(CONFIG_FILE_NAME.to_string(), content);
        Self {
            name: name.into(),
            mount_path: CONFIG_MOUNT_PATH.to_string(),
            data,
            read_only: false,
            default_mode: None,
            config_file: true,
        }
    }

    pub fn volume_name(&self) -> String {
        format!("{}{}", self.name, VOLUME_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMapModel {
    pub name: String,
    pub mount_path: String,
    pub data: BTreeMap<String, String>,
    pub read_only: bool,
    pub default_mode: Option<i32>,
    /// Drives the injected `--config` argument and `CONFIG_FILE` variable
    pub config_file: bool,
}

impl ConfigMapModel {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            data: BTreeMap::new(),
            read_only: true,
            default_mode: None,
            config_file: false,
        }
    }

    pub fn config_file(name: impl Into<String>, content: String) -> Self {
        let mut data = BTreeMap::new();
        data.insert(CONFIG_FILE_NAME.to_string(), content);
        Self {
            name: name.into(),
            mount_path: CONFIG_MOUNT_PATH.to_string(),
            data,
            read_only: false,
            default_mode: None,
            config_file: true,
        }
    }

    pub fn volume_name(&self) -> String {
        format!("{}{}", self.name, VOLUME_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeClaimModel {
    pub name: String,
    /// Falls back to the workload namespace when unset
    pub namespace: Option<String>,
    pub access_mode: String,
    pub size: String,
    pub mount_path: String,
    pub read_only: bool,
    pub annotations: BTreeMap<String, String>,
}

impl VolumeClaimModel {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            access_mode: DEFAULT_ACCESS_MODE.to_string(),
            size: DEFAULT_VOLUME_CLAIM_SIZE.to_string(),
            mount_path: mount_path.into(),
            read_only: false,
            annotations: BTreeMap::new(),
        }
    }

    pub fn volume_name(&self) -> String {
        format!("{}{}", self.name, VOLUME_SUFFIX)
    }
}
