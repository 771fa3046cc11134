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

//! Secret, ConfigMap and PersistentVolumeClaim processors
//!
//! All three mount something into the workload container, so they share the
//! mount path guard. Secret and ConfigMap also accept the reserved `conf` key that
//! mounts the runtime config file.

use super::secure_socket::{file_name, read_data_file};
use super::{annotation_keys, recognized, AnnotationProcessor, ProcessorContext};
use crate::domain::annotation::{
    Annotation, AnnotationKind, AnnotationValue, FunctionDecl, ListenerDecl, ServiceDecl,
};
use crate::domain::model::naming::{derived_name, ensure_valid_name};
use crate::domain::model::{ConfigMapModel, SecretModel, VolumeClaimModel};
use crate::infrastructure::constants::*;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;

/// Rejects blank mount paths and paths that would shadow the runtime.
pub(crate) fn check_mount_path(resource_type: &str, name: &str, field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(KubeError::malformed(field, "non-empty mount path"));
    }
    let normalized = path.trim_end_matches('/');
    if RESERVED_MOUNT_PATHS
        .iter()
        .any(|reserved| reserved.trim_end_matches('/') == normalized)
    {
        return Err(KubeError::reserved_mount_path(resource_type, name, path));
    }
    Ok(())
}

annotation_keys! {
    enum SecretKey {
        Secrets => "secrets",
        Conf => "conf",
    }
}

annotation_keys! {
    enum ConfigMapKey {
        ConfigMaps => "configMaps",
        Conf => "conf",
    }
}

annotation_keys! {
    enum MountEntryKey {
        Name => "name",
        MountPath => "mountPath",
        ReadOnly => "readOnly",
        DefaultMode => "defaultMode",
        Data => "data",
    }
}

annotation_keys! {
    enum VolumeClaimAnnotationKey {
        VolumeClaims => "volumeClaims",
    }
}

annotation_keys! {
    enum VolumeClaimKey {
        Name => "name",
        Namespace => "namespace",
        Annotations => "annotations",
        MountPath => "mountPath",
        ReadOnly => "readOnly",
        AccessMode => "accessMode",
        VolumeClaimSize => "volumeClaimSize",
    }
}

/// One `secrets` / `configMaps` entry before its files are loaded.
struct MountEntry {
    name: String,
    mount_path: String,
    read_only: bool,
    default_mode: Option<i32>,
    files: Vec<String>,
}

fn parse_mount_entry(
    ctx: &ProcessorContext<'_>,
    context: &str,
    default_name: String,
    entry: &AnnotationValue,
) -> Result<MountEntry> {
    let resolver = ctx.resolver;
    let record = resolver.record(context, entry)?;
    let mut parsed = MountEntry {
        name: default_name,
        mount_path: String::new(),
        read_only: true,
        default_mode: None,
        files: Vec::new(),
    };

    for (key, field, value) in recognized::<MountEntryKey>(context, record) {
        match key {
            MountEntryKey::Name => parsed.name = resolver.string(field, value)?,
            MountEntryKey::MountPath => parsed.mount_path = resolver.string(field, value)?,
            MountEntryKey::ReadOnly => parsed.read_only = resolver.bool(field, value)?,
            MountEntryKey::DefaultMode => parsed.default_mode = Some(resolver.i32(field, value)?),
            MountEntryKey::Data => parsed.files = resolver.string_list(field, value)?,
        }
    }
    Ok(parsed)
}

fn load_files(ctx: &ProcessorContext<'_>, files: &[String]) -> Result<BTreeMap<String, Vec<u8>>> {
    files
        .iter()
        .map(|path| Ok((file_name("data", path)?, read_data_file(ctx, "data", path)?)))
        .collect()
}

fn config_file_content(ctx: &ProcessorContext<'_>, value: &AnnotationValue) -> Result<Vec<u8>> {
    let path = ctx.resolver.string("conf", value)?;
    read_data_file(ctx, "conf", &path)
}

pub struct SecretProcessor;

impl SecretProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let mut secrets = Vec::new();
        for (key, field, value) in recognized::<SecretKey>(self.kind().as_str(), &annotation.fields) {
            match key {
                SecretKey::Secrets => {
                    for entry in ctx.resolver.list(field, value)? {
                        let entry = parse_mount_entry(
                            ctx,
                            field,
                            derived_name(identifier, SUFFIX_SECRET),
                            entry,
                        )?;
                        check_mount_path("Secret", &entry.name, "mountPath", &entry.mount_path)?;
                        secrets.push(SecretModel {
                            read_only: entry.read_only,
                            default_mode: entry.default_mode,
                            data: load_files(ctx, &entry.files)?,
                            ..SecretModel::new(entry.name, entry.mount_path)
                        });
                    }
                }
                SecretKey::Conf => {
                    let content = config_file_content(ctx, value)?;
                    secrets.push(SecretModel::config_file(
                        derived_name(identifier, &format!("{}{}", SUFFIX_CONFIG_FILE, SUFFIX_SECRET)),
                        content,
                    ));
                }
            }
        }

        for secret in secrets {
            ensure_valid_name("Secret", &secret.name)?;
            ctx.holder.add_secret(secret)?;
        }
        Ok(())
    }
}

impl AnnotationProcessor for SecretProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Secret
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, annotation)
    }

    fn process_function(
        &self,
        ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &function.name, annotation)
    }

    fn process_listener(
        &self,
        ctx: &mut ProcessorContext<'_>,
        listener: &ListenerDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &listener.name, annotation)
    }
}

pub struct ConfigMapProcessor;

impl ConfigMapProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let mut config_maps = Vec::new();
        for (key, field, value) in recognized::<ConfigMapKey>(self.kind().as_str(), &annotation.fields)
        {
            match key {
                ConfigMapKey::ConfigMaps => {
                    for entry in ctx.resolver.list(field, value)? {
                        let entry = parse_mount_entry(
                            ctx,
                            field,
                            derived_name(identifier, SUFFIX_CONFIG_MAP),
                            entry,
                        )?;
                        check_mount_path("ConfigMap", &entry.name, "mountPath", &entry.mount_path)?;
                        let data = load_files(ctx, &entry.files)?
                            .into_iter()
                            .map(|(name, bytes)| {
                                String::from_utf8(bytes)
                                    .map(|text| (name.clone(), text))
                                    .map_err(|_| {
                                        KubeError::malformed("data", format!("UTF-8 text file '{}'", name))
                                    })
                            })
                            .collect::<Result<BTreeMap<_, _>>>()?;
                        config_maps.push(ConfigMapModel {
                            read_only: entry.read_only,
                            default_mode: entry.default_mode,
                            data,
                            ..ConfigMapModel::new(entry.name, entry.mount_path)
                        });
                    }
                }
                ConfigMapKey::Conf => {
                    let content = String::from_utf8(config_file_content(ctx, value)?)
                        .map_err(|_| KubeError::malformed("conf", "UTF-8 text file"))?;
                    config_maps.push(ConfigMapModel::config_file(
                        derived_name(
                            identifier,
                            &format!("{}{}", SUFFIX_CONFIG_FILE, SUFFIX_CONFIG_MAP),
                        ),
                        content,
                    ));
                }
            }
        }

        for config_map in config_maps {
            ensure_valid_name("ConfigMap", &config_map.name)?;
            ctx.holder.add_config_map(config_map)?;
        }
        Ok(())
    }
}

impl AnnotationProcessor for ConfigMapProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::ConfigMap
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, annotation)
    }

    fn process_function(
        &self,
        ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &function.name, annotation)
    }
}

pub struct VolumeClaimProcessor;

impl VolumeClaimProcessor {
    fn register(
        &self,
        ctx: &mut ProcessorContext<'_>,
        identifier: &str,
        annotation: &Annotation,
    ) -> Result<()> {
        let resolver = ctx.resolver;
        let mut claims = Vec::new();
        for (_, field, value) in
            recognized::<VolumeClaimAnnotationKey>(self.kind().as_str(), &annotation.fields)
        {
            for entry in resolver.list(field, value)? {
                let record = resolver.record(field, entry)?;
                let mut claim =
                    VolumeClaimModel::new(derived_name(identifier, SUFFIX_VOLUME_CLAIM), "");
                for (key, field, value) in recognized::<VolumeClaimKey>(field, record) {
                    match key {
                        VolumeClaimKey::Name => claim.name = resolver.string(field, value)?,
                        VolumeClaimKey::Namespace => {
                            claim.namespace = Some(resolver.string(field, value)?)
                        }
                        VolumeClaimKey::Annotations => {
                            claim.annotations = resolver.string_map(field, value)?
                        }
                        VolumeClaimKey::MountPath => claim.mount_path = resolver.string(field, value)?,
                        VolumeClaimKey::ReadOnly => claim.read_only = resolver.bool(field, value)?,
                        VolumeClaimKey::AccessMode => claim.access_mode = resolver.string(field, value)?,
                        VolumeClaimKey::VolumeClaimSize => claim.size = resolver.string(field, value)?,
                    }
                }
                check_mount_path("PersistentVolumeClaim", &claim.name, "mountPath", &claim.mount_path)?;
                ensure_valid_name("PersistentVolumeClaim", &claim.name)?;
                claims.push(claim);
            }
        }

        for claim in claims {
            ctx.holder.add_volume_claim(claim)?;
        }
        Ok(())
    }
}

impl AnnotationProcessor for VolumeClaimProcessor {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::PersistentVolumeClaim
    }

    fn process_service(
        &self,
        ctx: &mut ProcessorContext<'_>,
        service: &ServiceDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &service.name, annotation)
    }

    fn process_function(
        &self,
        ctx: &mut ProcessorContext<'_>,
        function: &FunctionDecl,
        annotation: &Annotation,
    ) -> Result<()> {
        self.register(ctx, &function.name, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::annotation::{Placeholders, ValueResolver};
    use crate::domain::context::DataHolder;
    use std::path::Path;

    fn secret_entry(mount_path: &str) -> AnnotationValue {
        AnnotationValue::List(vec![AnnotationValue::record([
            ("mountPath", AnnotationValue::from(mount_path)),
            ("data", AnnotationValue::from(vec!["cert.pem"])),
        ])])
    }

    fn listener(name: &str) -> ListenerDecl {
        ListenerDecl {
            name: name.to_string(),
            port: 9090,
            secure_socket: None,
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_reserved_mount_paths() {
        for path in ["/ballerina", "/ballerina/runtime", "/home/ballerina/conf/", "/home/ballerina/conf"] {
            assert!(matches!(
                check_mount_path("Secret", "s", "mountPath", path),
                Err(KubeError::ReservedMountPath { .. })
            ));
        }
        assert!(matches!(
            check_mount_path("Secret", "s", "mountPath", "  "),
            Err(KubeError::MalformedAnnotationValue { .. })
        ));
        assert!(check_mount_path("Secret", "s", "mountPath", "/home/ballerina/certs").is_ok());
    }

    #[test]
    fn test_secret_on_listener() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cert.pem"), b"-----BEGIN CERTIFICATE-----").unwrap();

        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: dir.path(),
        };
        let annotation =
            Annotation::new(AnnotationKind::Secret).with("secrets", secret_entry("/home/ballerina/certs"));

        SecretProcessor
            .process_listener(&mut ctx, &listener("helloWorld"), &annotation)
            .unwrap();

        let secret = &holder.secrets()[0];
        assert_eq!(secret.name, "helloworld-secret");
        assert!(secret.read_only);
        assert_eq!(secret.data["cert.pem"], b"-----BEGIN CERTIFICATE-----".to_vec());
    }

    #[test]
    fn test_secret_on_reserved_path() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let annotation =
            Annotation::new(AnnotationKind::Secret).with("secrets", secret_entry("/ballerina/runtime"));
        let err = SecretProcessor
            .process_listener(&mut ctx, &listener("ep"), &annotation)
            .unwrap_err();
        assert!(matches!(err, KubeError::ReservedMountPath { .. }));
    }

    #[test]
    fn test_reserved_path_with_many_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<String> = (0..5).map(|i| format!("file{}.txt", i)).collect();
        for file in &files {
            std::fs::write(dir.path().join(file), file.as_bytes()).unwrap();
        }
        let entry = |mount_path: &str| {
            AnnotationValue::record([
                ("mountPath", AnnotationValue::from(mount_path)),
                ("data", AnnotationValue::from(files.clone())),
            ])
        };

        for path in ["/ballerina", "/ballerina/runtime", "/home/ballerina/conf/"] {
            let placeholders = Placeholders::default();
            let mut holder = DataHolder::new("hello");
            let mut ctx = ProcessorContext {
                holder: &mut holder,
                resolver: ValueResolver::new(&placeholders),
                source_root: dir.path(),
            };
            let entries = AnnotationValue::List(vec![entry("/home/ballerina/data"), entry(path)]);

            let secret = Annotation::new(AnnotationKind::Secret).with("secrets", entries.clone());
            let err = SecretProcessor
                .process_listener(&mut ctx, &listener("ep"), &secret)
                .unwrap_err();
            assert!(matches!(err, KubeError::ReservedMountPath { .. }), "{}", path);

            let config_map = Annotation::new(AnnotationKind::ConfigMap).with("configMaps", entries);
            let err = ConfigMapProcessor
                .process_function(
                    &mut ctx,
                    &FunctionDecl {
                        name: "main".to_string(),
                        annotations: Vec::new(),
                    },
                    &config_map,
                )
                .unwrap_err();
            assert!(matches!(err, KubeError::ReservedMountPath { .. }), "{}", path);

            assert!(holder.secrets().is_empty());
            assert!(holder.config_maps().is_empty());
        }
    }

    #[test]
    fn test_conf_config_map() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ballerina.conf"), "[hello]\nuser=\"alice\"\n").unwrap();

        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: dir.path(),
        };
        let service = ServiceDecl {
            name: "hello".to_string(),
            listener: crate::domain::annotation::ListenerBinding::Named("ep".to_string()),
            annotations: Vec::new(),
        };
        let annotation = Annotation::new(AnnotationKind::ConfigMap).with("conf", "ballerina.conf");

        ConfigMapProcessor
            .process_service(&mut ctx, &service, &annotation)
            .unwrap();

        let config_map = &holder.config_maps()[0];
        assert!(config_map.config_file);
        assert!(!config_map.read_only);
        assert_eq!(config_map.mount_path, "/home/ballerina/conf/");
        assert!(config_map.data.contains_key("ballerina.conf"));
    }

    #[test]
    fn test_config_map_on_listener_is_unsupported() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let err = ConfigMapProcessor
            .process_listener(&mut ctx, &listener("ep"), &Annotation::new(AnnotationKind::ConfigMap))
            .unwrap_err();
        assert!(matches!(err, KubeError::UnsupportedAttachment { .. }));
    }

    #[test]
    fn test_volume_claim_defaults() {
        let placeholders = Placeholders::default();
        let mut holder = DataHolder::new("hello");
        let mut ctx = ProcessorContext {
            holder: &mut holder,
            resolver: ValueResolver::new(&placeholders),
            source_root: Path::new("."),
        };
        let function = FunctionDecl {
            name: "main".to_string(),
            annotations: Vec::new(),
        };
        let annotation = Annotation::new(AnnotationKind::PersistentVolumeClaim).with(
            "volumeClaims",
            AnnotationValue::List(vec![AnnotationValue::record([
                ("mountPath", AnnotationValue::from("/home/ballerina/tmp")),
                ("volumeClaimSize", AnnotationValue::from("2Gi")),
            ])]),
        );

        VolumeClaimProcessor
            .process_function(&mut ctx, &function, &annotation)
            .unwrap();

        let claim = &holder.volume_claims()[0];
        assert_eq!(claim.name, "main-pvc");
        assert_eq!(claim.access_mode, "ReadWriteOnce");
        assert_eq!(claim.size, "2Gi");
        assert!(!claim.read_only);
    }
}
