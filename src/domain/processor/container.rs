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

//! Container and image keys shared by the Deployment and Job annotations

use super::annotation_keys;
use crate::domain::annotation::{AnnotationValue, ValueResolver};
use crate::domain::model::{ContainerModel, CopyFileModel};
use crate::infrastructure::constants::IMAGE_PULL_POLICIES;
use crate::shared::error::{KubeError, Result};

annotation_keys! {
    pub(super) enum ContainerKey {
        Image => "image",
        ImagePullPolicy => "imagePullPolicy",
        Env => "env",
        BuildImage => "buildImage",
        Push => "push",
        DockerHost => "dockerHost",
        DockerCertPath => "dockerCertPath",
        Username => "username",
        Password => "password",
        Registry => "registry",
        BaseImage => "baseImage",
        CopyFiles => "copyFiles",
        ImagePullSecrets => "imagePullSecrets",
    }
}

pub(super) fn apply_container_key(
    resolver: &ValueResolver<'_>,
    container: &mut ContainerModel,
    key: ContainerKey,
    field: &str,
    value: &AnnotationValue,
) -> Result<()> {
    match key {
        ContainerKey::Image => container.image = resolver.string(field, value)?,
        ContainerKey::ImagePullPolicy => {
            let policy = resolver.string(field, value)?;
            if !IMAGE_PULL_POLICIES.contains(&policy.as_str()) {
                return Err(KubeError::malformed(
                    field,
                    format!("one of {}", IMAGE_PULL_POLICIES.join(", ")),
                ));
            }
            container.image_pull_policy = policy;
        }
        ContainerKey::Env => container.env = resolver.string_map(field, value)?,
        ContainerKey::BuildImage => container.build_image = resolver.bool(field, value)?,
        ContainerKey::Push => container.push_image = resolver.bool(field, value)?,
        ContainerKey::DockerHost => container.docker_host = Some(resolver.string(field, value)?),
        ContainerKey::DockerCertPath => {
            container.docker_cert_path = Some(resolver.string(field, value)?)
        }
        ContainerKey::Username => container.username = Some(resolver.string(field, value)?),
        ContainerKey::Password => container.password = Some(resolver.string(field, value)?),
        ContainerKey::Registry => container.registry = Some(resolver.string(field, value)?),
        ContainerKey::BaseImage => container.base_image = resolver.string(field, value)?,
        ContainerKey::CopyFiles => {
            container.copy_files = resolver.decode::<Vec<CopyFileModel>>(
                field,
                value,
                "list of {sourceFile, target} records",
            )?
        }
        ContainerKey::ImagePullSecrets => {
            container.image_pull_secrets = resolver.string_set(field, value)?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::Placeholders;

    #[test]
    fn test_image_pull_policy_is_validated() {
        let placeholders = Placeholders::default();
        let resolver = ValueResolver::new(&placeholders);
        let mut container = ContainerModel::default();

        apply_container_key(
            &resolver,
            &mut container,
            ContainerKey::ImagePullPolicy,
            "imagePullPolicy",
            &AnnotationValue::from("Always"),
        )
        .unwrap();
        assert_eq!(container.image_pull_policy, "Always");

        assert!(apply_container_key(
            &resolver,
            &mut container,
            ContainerKey::ImagePullPolicy,
            "imagePullPolicy",
            &AnnotationValue::from("Sometimes"),
        )
        .is_err());
    }

    #[test]
    fn test_copy_files_decoded() {
        let placeholders = Placeholders::default();
        let resolver = ValueResolver::new(&placeholders);
        let mut container = ContainerModel::default();
        let value = AnnotationValue::List(vec![AnnotationValue::record([
            ("sourceFile", "./data/data.txt"),
            ("target", "/home/ballerina/data/data.txt"),
        ])]);

        apply_container_key(&resolver, &mut container, ContainerKey::CopyFiles, "copyFiles", &value)
            .unwrap();
        assert_eq!(container.copy_files.len(), 1);
        assert_eq!(container.copy_files[0].target, "/home/ballerina/data/data.txt");
    }
}
