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

use crate::domain::model::SecretModel;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;

const SECRET_TYPE_OPAQUE: &str = "Opaque";

/// Opaque secret; `ByteString` base64-encodes the data on serialization.
pub struct SecretBuilder<'a> {
    model: &'a SecretModel,
    namespace: &'a str,
}

impl<'a> SecretBuilder<'a> {
    pub fn new(model: &'a SecretModel, namespace: &'a str) -> Self {
        Self { model, namespace }
    }

    pub fn build(&self) -> Result<Secret> {
        let data = self
            .model
            .data
            .iter()
            .map(|(key, bytes)| (key.clone(), ByteString(bytes.clone())))
            .collect::<std::collections::BTreeMap<_, _>>();

        Ok(Secret {
            metadata: ObjectMeta {
                name: Some(self.model.name.clone()),
                namespace: Some(self.namespace.to_string()),
                ..Default::default()
            },
            type_: Some(SECRET_TYPE_OPAQUE.to_string()),
            data: (!data.is_empty()).then_some(data),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_data_is_base64() {
        let mut model = SecretModel::new("hello-secret", "/home/ballerina/certs");
        model.data.insert("cert.pem".to_string(), b"hello".to_vec());
        let secret = SecretBuilder::new(&model, "default").build().unwrap();
        let yaml = serde_yaml::to_string(&secret).unwrap();
        assert!(yaml.contains("cert.pem: aGVsbG8="));
        assert!(yaml.contains("type: Opaque"));
    }
}
