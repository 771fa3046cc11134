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

use crate::domain::model::DockerModel;
use crate::infrastructure::constants::{DOCKER_MAINTAINER, RUNTIME_COMMAND, RUNTIME_WORK_DIR};
use std::fmt::Write;
use std::path::Path;

/// Renders the Dockerfile for a [`DockerModel`]
pub struct DockerfileRenderer<'a> {
    model: &'a DockerModel,
}

impl<'a> DockerfileRenderer<'a> {
    pub fn new(model: &'a DockerModel) -> Self {
        Self { model }
    }

    pub fn render(&self) -> String {
        let model = self.model;
        let mut out = String::new();

        let _ = writeln!(out, "# Auto Generated Dockerfile");
        let _ = writeln!(out, "FROM {}", model.base_image);
        let _ = writeln!(out, "LABEL maintainer=\"{}\"", DOCKER_MAINTAINER);
        out.push('\n');
        let _ = writeln!(out, "WORKDIR {}", RUNTIME_WORK_DIR);
        let _ = writeln!(out, "COPY {} {}", model.artifact_file_name, RUNTIME_WORK_DIR);

        for copy in &model.copy_files {
            let _ = writeln!(out, "COPY {} {}", copied_file_name(&copy.source_file), copy.target);
        }
        for (key, value) in &model.env {
            let _ = writeln!(out, "ENV {}=\"{}\"", key, quoted_env_value(value));
        }

        if !model.ports.is_empty() {
            let ports: Vec<String> = model.ports.iter().map(i32::to_string).collect();
            out.push('\n');
            let _ = writeln!(out, "EXPOSE {}", ports.join(" "));
        }

        out.push('\n');
        let mut command = vec![RUNTIME_COMMAND.to_string()];
        command.extend(model.command_args.iter().cloned());
        command.push(model.artifact_file_name.clone());
        let _ = writeln!(out, "CMD {}", command.join(" "));
        out
    }
}

/// Escapes backslashes and double quotes for a double-quoted `ENV` value
fn quoted_env_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Name a copied file takes inside the docker directory
pub fn copied_file_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ContainerModel, CopyFileModel};

    #[test]
    fn test_render_dockerfile() {
        let mut container = ContainerModel {
            image: "hello:latest".to_string(),
            ..Default::default()
        };
        container.add_port(9090);
        container.env.insert("CONFIG_FILE".to_string(), "/home/ballerina/conf/ballerina.conf".to_string());
        container.command_args.push("--config ${CONFIG_FILE}".to_string());
        container.copy_files.push(CopyFileModel {
            source_file: "./conf/data.txt".to_string(),
            target: "/home/ballerina/data/data.txt".to_string(),
        });

        let model = DockerModel::from_container(&container, "hello.balx");
        let dockerfile = DockerfileRenderer::new(&model).render();

        assert!(dockerfile.starts_with("# Auto Generated Dockerfile\nFROM ballerina/ballerina-runtime:latest\n"));
        assert!(dockerfile.contains("COPY hello.balx /home/ballerina\n"));
        assert!(dockerfile.contains("COPY data.txt /home/ballerina/data/data.txt\n"));
        assert!(dockerfile.contains("ENV CONFIG_FILE=\"/home/ballerina/conf/ballerina.conf\"\n"));
        assert!(dockerfile.contains("EXPOSE 9090\n"));
        assert!(dockerfile.ends_with("CMD ballerina run --config ${CONFIG_FILE} hello.balx\n"));
    }

    #[test]
    fn test_no_expose_without_ports() {
        let container = ContainerModel::default();
        let model = DockerModel::from_container(&container, "task.balx");
        let dockerfile = DockerfileRenderer::new(&model).render();
        assert!(!dockerfile.contains("EXPOSE"));
        assert!(dockerfile.ends_with("CMD ballerina run task.balx\n"));
    }

    #[test]
    fn test_env_values_with_spaces_are_quoted() {
        let mut container = ContainerModel::default();
        container.env.insert("JAVA_OPTS".to_string(), "-Xms1g -Xmx2g".to_string());
        container.env.insert("GREETING".to_string(), r#"say "hi" C:\tmp"#.to_string());

        let model = DockerModel::from_container(&container, "hello.balx");
        let dockerfile = DockerfileRenderer::new(&model).render();

        assert!(dockerfile.contains("ENV JAVA_OPTS=\"-Xms1g -Xmx2g\"\n"));
        assert!(dockerfile.contains(r#"ENV GREETING="say \"hi\" C:\\tmp""#));
    }
}
