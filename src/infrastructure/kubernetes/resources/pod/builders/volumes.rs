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

use crate::domain::model::ContainerModel;
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, PersistentVolumeClaimVolumeSource, SecretVolumeSource, Volume,
    VolumeMount,
};

/// Volumes and mounts for the secrets, config maps and claims attached to a container.
pub struct VolumeBuilder<'a> {
    container: &'a ContainerModel,
}

impl<'a> VolumeBuilder<'a> {
    pub fn new(container: &'a ContainerModel) -> Self {
        Self { container }
    }

    pub fn build_volumes(&self) -> Vec<Volume> {
        let secrets = self.container.secrets.iter().map(|secret| Volume {
            name: secret.volume_name(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret.name.clone()),
                default_mode: secret.default_mode,
                ..Default::default()
            }),
            ..Default::default()
        });
        let config_maps = self.container.config_maps.iter().map(|config_map| Volume {
            name: config_map.volume_name(),
            config_map: Some(ConfigMapVolumeSource {
                name: config_map.name.clone(),
                default_mode: config_map.default_mode,
                ..Default::default()
            }),
            ..Default::default()
        });
        let claims = self.container.volume_claims.iter().map(|claim| Volume {
            name: claim.volume_name(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: claim.name.clone(),
                read_only: Some(claim.read_only),
            }),
            ..Default::default()
        });
        secrets.chain(config_maps).chain(claims).collect()
    }

    pub fn build_volume_mounts(&self) -> Vec<VolumeMount> {
        let secrets = self
            .container
            .secrets
            .iter()
            .map(|s| mount(s.volume_name(), &s.mount_path, s.read_only));
        let config_maps = self
            .container
            .config_maps
            .iter()
            .map(|c| mount(c.volume_name(), &c.mount_path, c.read_only));
        let claims = self
            .container
            .volume_claims
            .iter()
            .map(|c| mount(c.volume_name(), &c.mount_path, c.read_only));
        secrets.chain(config_maps).chain(claims).collect()
    }
}

fn mount(name: String, mount_path: &str, read_only: bool) -> VolumeMount {
    VolumeMount {
        name,
        mount_path: mount_path.to_string(),
        read_only: Some(read_only),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ConfigMapModel, SecretModel, VolumeClaimModel};

    #[test]
    fn test_volumes_match_mounts() {
        let container = ContainerModel {
            secrets: vec![SecretModel::new("hello-secret", "/home/ballerina/certs")],
            config_maps: vec![ConfigMapModel::config_file("hello-conf", String::new())],
            volume_claims: vec![VolumeClaimModel::new("hello-pvc", "/home/ballerina/tmp")],
            ..Default::default()
        };
        let builder = VolumeBuilder::new(&container);
        let volumes = builder.build_volumes();
        let mounts = builder.build_volume_mounts();

        assert_eq!(volumes.len(), 3);
        assert_eq!(
            volumes.iter().map(|v| v.name.clone()).collect::<Vec<_>>(),
            mounts.iter().map(|m| m.name.clone()).collect::<Vec<_>>()
        );
        assert_eq!(mounts[0].read_only, Some(true));
        assert_eq!(mounts[1].mount_path, "/home/ballerina/conf/");
        assert_eq!(mounts[1].read_only, Some(false));
    }
}
