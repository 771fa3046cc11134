//! Artifact generation command

use crate::cli::display::{StatusIcon, TableRenderer};
use crate::domain::annotation::{CompilationUnit, Placeholders};
use crate::domain::artifact::{ArtifactManager, GenerationConfig};
use crate::domain::context::DataHolder;
use crate::domain::processor::process_unit;
use crate::infrastructure::docker::DockerCliBuilder;
use clap::Parser;
use colored::Colorize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
pub struct GenerateCommand {
    /// Compilation unit with the annotated declarations (TOML)
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: PathBuf,

    /// Executable artifact packaged into the image; its file stem names every resource
    #[arg(long, short = 'a', value_name = "PATH")]
    pub artifact: PathBuf,

    /// Generation root
    /// If not specified, uses `kubernetes/` next to the artifact
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory relative data files and copy-file sources are read from
    /// If not specified, uses the directory of the input file
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Build-time properties for `${key}` placeholders (-D key=value)
    ///
    /// Example: -Dregistry=docker.example.com -Dversion=1.0.2
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl GenerateCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let properties = parse_dynamic_configs(&self.properties)
            .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;

        let output_name = self
            .artifact
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("Artifact path has no file name: {}", self.artifact.display()))?;
        let source_root = self.source_root.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        });
        let output_dir = self.output.clone().unwrap_or_else(|| {
            self.artifact
                .parent()
                .map(|dir| dir.join("kubernetes"))
                .unwrap_or_else(|| PathBuf::from("kubernetes"))
        });

        let unit = CompilationUnit::from_toml_file(&self.input)?;
        println!(
            "{} Loaded {} declarations from {}",
            StatusIcon::SUCCESS.green(),
            unit.declarations.len(),
            self.input.display()
        );

        let placeholders = Placeholders::from_process_env(properties);
        let renderer = TableRenderer::new();
        let mut holder = DataHolder::new(output_name);
        if let Err(e) = process_unit(&unit, &mut holder, &placeholders, &source_root) {
            eprintln!("{}", renderer.render_failure("Annotation processing", &e));
            return Err(e.into());
        }

        let config = GenerationConfig::new(&output_dir, &self.artifact)
            .with_source_root(&source_root)
            .with_process_env();
        let manager = ArtifactManager::new(holder, config, Box::new(DockerCliBuilder::default()));
        let report = match manager.generate().await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{}", renderer.render_failure("Artifact generation", &e));
                return Err(e.into());
            }
        };

        println!("{}", renderer.render_artifacts(&report));
        println!("{}", renderer.render_image_status(&report));
        println!("{}", renderer.render_apply_commands(&report));
        Ok(())
    }
}

/// Parse dynamic configuration properties from -D key=value format
fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in config: '{}'", config));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dynamic_configs() {
        let configs = vec!["registry=docker.example.com".to_string(), " tag = a=b ".to_string()];
        let map = parse_dynamic_configs(&configs).unwrap();
        assert_eq!(map.get("registry").map(String::as_str), Some("docker.example.com"));
        assert_eq!(map.get("tag").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_parse_dynamic_configs_rejects_missing_value() {
        assert!(parse_dynamic_configs(&["registry".to_string()]).is_err());
        assert!(parse_dynamic_configs(&["=x".to_string()]).is_err());
    }
}
