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

use std::path::PathBuf;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, KubeError>;

#[derive(Error, Debug)]
pub enum KubeError {
    #[error("Malformed annotation value for '{field}': expected {expected}")]
    MalformedAnnotationValue { field: String, expected: String },

    #[error("Mount path '{path}' of {resource_type} '{name}' collides with a reserved runtime path")]
    ReservedMountPath {
        resource_type: String,
        name: String,
        path: String,
    },

    #[error("Namespace is required to derive the host of {resource_type} '{name}' from a domain")]
    MissingNamespace { resource_type: String, name: String },

    #[error("Annotation '{annotation}' is not supported on {target}")]
    UnsupportedAttachment { annotation: String, target: String },

    #[error("Annotation '{annotation}' cannot be attached to '{target}': {reason}")]
    InvalidAttachment {
        annotation: String,
        target: String,
        reason: String,
    },

    #[error("Duplicate {resource_type} '{name}': only one definition is allowed")]
    DuplicateArtifact { resource_type: String, name: String },

    #[error("Only one config file may be mounted, found: {}", names.join(", "))]
    MultipleConfigFile { names: Vec<String> },

    #[error("Failed to write artifact {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image build failed for '{image}': {message}")]
    ImageBuild { image: String, message: String },

    #[error("Image push failed for '{image}': {message}")]
    ImagePush { image: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl KubeError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn validation(context: impl Into<String>) -> Self {
        Self::ValidationError(context.into())
    }

    pub fn malformed(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MalformedAnnotationValue {
            field: field.into(),
            expected: expected.into(),
        }
    }

    pub fn reserved_mount_path(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::ReservedMountPath {
            resource_type: resource_type.into(),
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn missing_namespace(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingNamespace {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn unsupported_attachment(annotation: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedAttachment {
            annotation: annotation.into(),
            target: target.into(),
        }
    }

    pub fn invalid_attachment(
        annotation: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAttachment {
            annotation: annotation.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateArtifact {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn artifact_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            source,
        }
    }
}
