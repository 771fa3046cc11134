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

use super::writer::ArtifactWriter;
use crate::domain::context::DataHolder;
use crate::domain::model::naming::{derived_name, ensure_valid_label, valid_name};
use crate::domain::model::istio::{Destination, PortSelector, RouteDestination};
use crate::domain::model::{DeploymentModel, DockerModel, HttpRoute, ServiceModel, WorkloadModel};
use crate::infrastructure::constants::*;
use crate::infrastructure::docker::dockerfile::copied_file_name;
use crate::infrastructure::docker::{DockerfileRenderer, ImageBuilder};
use crate::infrastructure::kubernetes::resources::*;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where generation reads from and writes to.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub output_dir: PathBuf,
    pub artifact_path: PathBuf,
    /// Base for relative copy-file sources
    pub source_root: PathBuf,
    pub docker_host: Option<String>,
    pub docker_cert_path: Option<String>,
}

impl GenerationConfig {
    pub fn new(output_dir: impl Into<PathBuf>, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            artifact_path: artifact_path.into(),
            source_root: PathBuf::from("."),
            docker_host: None,
            docker_cert_path: None,
        }
    }

    pub fn with_source_root(mut self, source_root: impl Into<PathBuf>) -> Self {
        self.source_root = source_root.into();
        self
    }

    /// `DOCKER_HOST` / `DOCKER_CERT_PATH` win over annotation values.
    pub fn with_process_env(mut self) -> Self {
        self.docker_host = std::env::var(ENV_DOCKER_HOST).ok().filter(|v| !v.is_empty());
        self.docker_cert_path = std::env::var(ENV_DOCKER_CERT_PATH)
            .ok()
            .filter(|v| !v.is_empty());
        self
    }

    pub fn artifact_file_name(&self) -> Result<String> {
        self.artifact_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                KubeError::config_error(format!(
                    "Artifact path {} has no file name",
                    self.artifact_path.display()
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: String,
    pub name: String,
    pub file: PathBuf,
}

/// Outcome of one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub artifacts: Vec<GeneratedArtifact>,
    pub image: String,
    pub image_id: Option<String>,
    pub pushed: bool,
    pub apply_commands: Vec<String>,
}

impl GenerationReport {
    fn record(&mut self, kind: &str, name: &str, file: &Path) {
        info!("Generated {} '{}'", kind, name);
        self.artifacts.push(GeneratedArtifact {
            kind: kind.to_string(),
            name: name.to_string(),
            file: file.to_path_buf(),
        });
    }

    pub fn count(&self, kind: &str) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}

/// Turns the models collected in a [`DataHolder`] into files and an image.
pub struct ArtifactManager {
    holder: DataHolder,
    config: GenerationConfig,
    image_builder: Box<dyn ImageBuilder>,
}

impl ArtifactManager {
    pub fn new(
        holder: DataHolder,
        config: GenerationConfig,
        image_builder: Box<dyn ImageBuilder>,
    ) -> Self {
        Self {
            holder,
            config,
            image_builder,
        }
    }

    pub async fn generate(mut self) -> Result<GenerationReport> {
        let base = self.holder.output_name().to_string();
        let artifact_file_name = self.config.artifact_file_name()?;
        let writer = ArtifactWriter::new(&self.config.output_dir);
        let mut report = GenerationReport {
            output_dir: self.config.output_dir.clone(),
            ..Default::default()
        };

        let mut workload = self.resolve_workload(&base);
        ensure_valid_label(workload.kind(), workload.name())?;
        let namespace = workload.namespace().to_string();
        let app = workload
            .labels_mut()
            .get(LABEL_APP)
            .cloned()
            .unwrap_or_else(|| valid_name(&base));

        let container = workload.container_mut();
        container.secrets = self.holder.secrets.clone();
        container.config_maps = self.holder.config_maps.clone();
        container.volume_claims = self.holder.volume_claims.clone();

        self.write_services(&writer, &mut report, &mut workload, &namespace, &app, &base)?;
        self.write_ingresses(&writer, &mut report, &namespace, &base)?;
        self.write_volumes(&writer, &mut report, &mut workload, &namespace, &base)?;
        self.write_workload(&writer, &mut report, &workload, &base)?;
        self.write_autoscaler(&writer, &mut report, &workload, &namespace, &base)?;
        self.write_istio(&writer, &mut report, &namespace, &base)?;
        self.write_openshift(&writer, &mut report, &workload, &namespace, &base)?;

        let docker = DockerModel::from_container(workload.container(), artifact_file_name);
        self.write_docker(&writer, &mut report, &docker).await?;

        report
            .apply_commands
            .push(format!("kubectl apply -f {}", writer.root().display()));
        if report.count("BuildConfig") + report.count("Route") > 0 {
            report.apply_commands.push(format!(
                "oc apply -f {}",
                writer.root().join(OPENSHIFT_DIR).display()
            ));
        }
        for command in &report.apply_commands {
            info!("Run the following command to deploy artifacts: {}", command);
        }
        Ok(report)
    }

    fn resolve_workload(&mut self, base: &str) -> WorkloadModel {
        let mut workload = self.holder.workload.take().unwrap_or_else(|| {
            debug!("No workload annotation found, using a default Deployment");
            WorkloadModel::Deployment(DeploymentModel::new(derived_name(base, SUFFIX_DEPLOYMENT)))
        });

        workload
            .labels_mut()
            .entry(LABEL_APP.to_string())
            .or_insert_with(|| valid_name(base));

        let openshift_builds = self
            .holder
            .build_config
            .as_ref()
            .is_some_and(|bc| !bc.build_docker_image);
        let container = workload.container_mut();
        container.resolve_image(&valid_name(base));
        container.apply_docker_env(
            self.config.docker_host.clone(),
            self.config.docker_cert_path.clone(),
        );
        if openshift_builds {
            container.build_image = false;
        }
        workload
    }

    fn write_services(
        &mut self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        workload: &mut WorkloadModel,
        namespace: &str,
        app: &str,
        base: &str,
    ) -> Result<()> {
        let mut documents = Vec::new();
        for service in self.holder.services.values_mut() {
            service.selector = BTreeMap::from([(LABEL_APP.to_string(), app.to_string())]);
            service
                .labels
                .entry(LABEL_APP.to_string())
                .or_insert_with(|| app.to_string());
            workload.container_mut().add_port(service.target_port);
            documents.push(ServiceBuilder::new(service, namespace).build()?);
        }
        if documents.is_empty() {
            return Ok(());
        }

        let path = writer.write(&format!("{}{}", base, FILE_SERVICE), &render_documents(&documents)?)?;
        for service in self.holder.services.values() {
            report.record("Service", &service.name, &path);
        }
        Ok(())
    }

    fn listener_service(&self, listener: &str, kind: &str, name: &str) -> Result<&ServiceModel> {
        self.holder.service_for_listener(listener).ok_or_else(|| {
            KubeError::validation(format!(
                "{} '{}' needs a Service for listener '{}'",
                kind, name, listener
            ))
        })
    }

    fn write_ingresses(
        &mut self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        namespace: &str,
        base: &str,
    ) -> Result<()> {
        let mut ingresses = std::mem::take(&mut self.holder.ingresses);
        let mut documents = Vec::new();
        for ingress in &mut ingresses {
            let service = self.listener_service(&ingress.listener_name, "Ingress", &ingress.name)?;
            ingress.service_name = Some(service.name.clone());
            ingress.service_port = Some(service.port);
            if !self.holder.secrets_for_listener(&ingress.listener_name).is_empty() {
                ingress.enable_tls = true;
            }
            documents.push(IngressBuilder::new(ingress, namespace).build()?);
        }
        if documents.is_empty() {
            return Ok(());
        }

        let path = writer.write(&format!("{}{}", base, FILE_INGRESS), &render_documents(&documents)?)?;
        for ingress in &ingresses {
            report.record("Ingress", &ingress.name, &path);
        }
        self.holder.ingresses = ingresses;
        Ok(())
    }

    fn write_volumes(
        &self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        workload: &mut WorkloadModel,
        namespace: &str,
        base: &str,
    ) -> Result<()> {
        let config_files: Vec<String> = self
            .holder
            .secrets
            .iter()
            .filter(|s| s.config_file)
            .map(|s| s.name.clone())
            .chain(
                self.holder
                    .config_maps
                    .iter()
                    .filter(|c| c.config_file)
                    .map(|c| c.name.clone()),
            )
            .collect();
        if config_files.len() > 1 {
            return Err(KubeError::MultipleConfigFile {
                names: config_files,
            });
        }
        if !config_files.is_empty() {
            let container = workload.container_mut();
            container
                .env
                .insert(CONFIG_FILE_ENV.to_string(), CONFIG_FILE_PATH.to_string());
            if !container.command_args.iter().any(|a| a == CONFIG_FILE_ARG) {
                container.command_args.push(CONFIG_FILE_ARG.to_string());
            }
        }

        let secrets = self
            .holder
            .secrets
            .iter()
            .map(|s| SecretBuilder::new(s, namespace).build())
            .collect::<Result<Vec<_>>>()?;
        if !secrets.is_empty() {
            let path = writer.write(&format!("{}{}", base, FILE_SECRET), &render_documents(&secrets)?)?;
            for secret in &self.holder.secrets {
                report.record("Secret", &secret.name, &path);
            }
        }

        let config_maps = self
            .holder
            .config_maps
            .iter()
            .map(|c| ConfigMapBuilder::new(c, namespace).build())
            .collect::<Result<Vec<_>>>()?;
        if !config_maps.is_empty() {
            let path = writer.write(
                &format!("{}{}", base, FILE_CONFIG_MAP),
                &render_documents(&config_maps)?,
            )?;
            for config_map in &self.holder.config_maps {
                report.record("ConfigMap", &config_map.name, &path);
            }
        }

        let claims = self
            .holder
            .volume_claims
            .iter()
            .map(|c| VolumeClaimBuilder::new(c, namespace).build())
            .collect::<Result<Vec<_>>>()?;
        if !claims.is_empty() {
            let path = writer.write(
                &format!("{}{}", base, FILE_VOLUME_CLAIM),
                &render_documents(&claims)?,
            )?;
            for claim in &self.holder.volume_claims {
                report.record("PersistentVolumeClaim", &claim.name, &path);
            }
        }

        let quotas = self
            .holder
            .resource_quotas
            .iter()
            .map(|q| ResourceQuotaBuilder::new(q, namespace).build())
            .collect::<Result<Vec<_>>>()?;
        if !quotas.is_empty() {
            let path = writer.write(
                &format!("{}{}", base, FILE_RESOURCE_QUOTA),
                &render_documents(&quotas)?,
            )?;
            for quota in &self.holder.resource_quotas {
                report.record("ResourceQuota", &quota.name, &path);
            }
        }
        Ok(())
    }

    fn write_workload(
        &self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        workload: &WorkloadModel,
        base: &str,
    ) -> Result<()> {
        let path = match workload {
            WorkloadModel::Deployment(deployment) => {
                let document = DeploymentBuilder::new(deployment).build()?;
                writer.write(
                    &format!("{}{}", base, FILE_DEPLOYMENT),
                    &render_documents(&[document])?,
                )?
            }
            WorkloadModel::Job(job) => {
                let document = JobBuilder::new(job).build()?;
                writer.write(&format!("{}{}", base, FILE_JOB), &render_documents(&[document])?)?
            }
        };
        report.record(workload.kind(), workload.name(), &path);
        Ok(())
    }

    fn write_autoscaler(
        &self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        workload: &WorkloadModel,
        namespace: &str,
        base: &str,
    ) -> Result<()> {
        let Some(hpa) = &self.holder.pod_autoscaler else {
            return Ok(());
        };
        let deployment = workload.as_deployment().ok_or_else(|| {
            KubeError::validation(format!(
                "HPA '{}' requires a Deployment, found {} '{}'",
                hpa.name,
                workload.kind(),
                workload.name()
            ))
        })?;

        let mut hpa = hpa.clone();
        hpa.deployment_name = deployment.name.clone();
        hpa.resolve_replicas(deployment.replicas);
        hpa.check_bounds()?;
        if hpa.labels.is_empty() {
            hpa.labels = deployment.labels.clone();
        }
        let document = PodAutoscalerBuilder::new(&hpa, namespace).build()?;
        let path = writer.write(&format!("{}{}", base, FILE_HPA), &render_documents(&[document])?)?;
        report.record("HorizontalPodAutoscaler", &hpa.name, &path);
        Ok(())
    }

    fn write_istio(
        &mut self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        namespace: &str,
        base: &str,
    ) -> Result<()> {
        let mut gateways = Vec::new();
        for gateway in &mut self.holder.gateways {
            gateway.namespace.get_or_insert_with(|| namespace.to_string());
            gateways.push(GatewayBuilder::new(gateway).build()?);
        }
        if !gateways.is_empty() {
            let path = writer.write(
                &format!("{}{}", base, FILE_ISTIO_GATEWAY),
                &render_documents(&gateways)?,
            )?;
            for gateway in &self.holder.gateways {
                report.record("Gateway", &gateway.name, &path);
            }
        }

        let mut virtual_services = std::mem::take(&mut self.holder.virtual_services);
        let mut documents = Vec::new();
        for virtual_service in &mut virtual_services {
            virtual_service
                .namespace
                .get_or_insert_with(|| namespace.to_string());
            if virtual_service.http.is_empty() {
                let service = self.listener_service(
                    &virtual_service.listener_name,
                    "VirtualService",
                    &virtual_service.name,
                )?;
                virtual_service.http.push(default_http_route(service));
            }
            documents.push(VirtualServiceBuilder::new(virtual_service).build()?);
        }
        if !documents.is_empty() {
            let path = writer.write(
                &format!("{}{}", base, FILE_ISTIO_VIRTUAL_SERVICE),
                &render_documents(&documents)?,
            )?;
            for virtual_service in &virtual_services {
                report.record("VirtualService", &virtual_service.name, &path);
            }
        }
        self.holder.virtual_services = virtual_services;
        Ok(())
    }

    fn write_openshift(
        &mut self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        workload: &WorkloadModel,
        namespace: &str,
        base: &str,
    ) -> Result<()> {
        let mut sections = Vec::new();
        let mut generated = Vec::new();

        if let Some(build_config) = &self.holder.build_config {
            let mut build_config = build_config.clone();
            build_config
                .namespace
                .get_or_insert_with(|| namespace.to_string());
            let image = &workload.container().image;
            let (document, image_stream) = BuildConfigBuilder::new(&build_config, image).build()?;
            sections.push(render_documents(&[document])?);
            sections.push(render_documents(&[image_stream])?);
            generated.push(("BuildConfig", build_config.name.clone()));
            generated.push(("ImageStream", image_stream_name(image)));
        }

        let mut routes = std::mem::take(&mut self.holder.routes);
        for route in &mut routes {
            let service = self.listener_service(&route.listener_name, "Route", &route.name)?;
            route.service_name = Some(service.name.clone());
            route.target_port = Some(service.target_port);
            route.namespace.get_or_insert_with(|| namespace.to_string());
            sections.push(render_documents(&[RouteBuilder::new(route).build()?])?);
            generated.push(("Route", route.name.clone()));
        }
        self.holder.routes = routes;

        if sections.is_empty() {
            return Ok(());
        }
        let path = writer
            .child(OPENSHIFT_DIR)
            .write(&format!("{}.yaml", base), &sections.join("---\n"))?;
        for (kind, name) in generated {
            report.record(kind, &name, &path);
        }
        Ok(())
    }

    async fn write_docker(
        &self,
        writer: &ArtifactWriter,
        report: &mut GenerationReport,
        docker: &DockerModel,
    ) -> Result<()> {
        check_copied_names(docker)?;
        let docker_writer = writer.child(DOCKER_DIR);
        let dockerfile = DockerfileRenderer::new(docker).render();
        let path = docker_writer.write(DOCKERFILE_NAME, &dockerfile)?;
        report.record("Dockerfile", DOCKERFILE_NAME, &path);

        docker_writer.copy(&self.config.artifact_path, &docker.artifact_file_name)?;
        for copy in &docker.copy_files {
            let source = Path::new(&copy.source_file);
            let source = if source.is_absolute() {
                source.to_path_buf()
            } else {
                self.config.source_root.join(source)
            };
            docker_writer.copy(&source, &copied_file_name(&copy.source_file))?;
        }

        report.image = docker.image.clone();
        if !docker.build {
            debug!("Image build disabled for {}", docker.image);
            return Ok(());
        }

        let image_id = self
            .image_builder
            .build(docker_writer.root(), docker)
            .await?;
        info!("Built image {}", docker.image);
        report.image_id = Some(image_id);

        if docker.push {
            self.image_builder
                .push(docker, docker.credentials())
                .await?;
            info!("Pushed image {}", docker.image);
            report.pushed = true;
        }
        Ok(())
    }
}

/// Copied files share the docker directory with the artifact, flattened to their file name.
fn check_copied_names(docker: &DockerModel) -> Result<()> {
    let mut taken = BTreeMap::from([(docker.artifact_file_name.clone(), "the program artifact".to_string())]);
    for copy in &docker.copy_files {
        let name = copied_file_name(&copy.source_file);
        if let Some(previous) = taken.insert(name.clone(), format!("'{}'", copy.source_file)) {
            return Err(KubeError::validation(format!(
                "Copy file '{}' collides with {} as {}/{}",
                copy.source_file, previous, DOCKER_DIR, name
            )));
        }
    }
    Ok(())
}

fn default_http_route(service: &ServiceModel) -> HttpRoute {
    HttpRoute {
        route: vec![RouteDestination {
            destination: Destination {
                host: service.name.clone(),
                subset: None,
                port: Some(PortSelector {
                    number: service.port,
                }),
            },
            weight: Some(100),
        }],
        ..Default::default()
    }
}
