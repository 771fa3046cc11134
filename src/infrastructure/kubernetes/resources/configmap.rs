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

use super::pod::non_empty;
use crate::domain::model::ConfigMapModel;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub struct ConfigMapBuilder<'a> {
    model: &'a ConfigMapModel,
    namespace: &'a str,
}

impl<'a> ConfigMapBuilder<'a> {
    pub fn new(model: &'a ConfigMapModel, namespace: &'a str) -> Self {
        Self { model, namespace }
    }

    pub fn build(&self) -> Result<ConfigMap> {
        let metadata = ObjectMeta {
            name: Some(self.model.name.clone()),
            namespace: Some(self.namespace.to_string()),
            ..Default::default()
        };

        Ok(ConfigMap {
            metadata,
            data: non_empty(&self.model.data),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_map_data() {
        let model = ConfigMapModel::config_file("hello-ballerina-conf-config-map", "[b7a]\n".to_string());
        let config_map = ConfigMapBuilder::new(&model, "default").build().unwrap();
        let data = config_map.data.unwrap();
        assert_eq!(data.get("ballerina.conf").map(String::as_str), Some("[b7a]\n"));
        assert_eq!(config_map.metadata.namespace.as_deref(), Some("default"));
    }
}
