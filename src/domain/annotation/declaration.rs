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

//! Declarations of one compilation unit and the annotations attached to them

use super::value::Annotation;
use crate::shared::error::{KubeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENTRY_POINT: &str = "main";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub path: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// TLS material configured on a listener.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureSocket {
    #[serde(default)]
    pub key_store: Option<StoreConfig>,
    #[serde(default)]
    pub trust_store: Option<StoreConfig>,
}

/// Inline listener expression of a service, e.g. `service on new Listener(9090)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineListener {
    pub port: i32,
    #[serde(default)]
    pub secure_socket: Option<SecureSocket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListenerBinding {
    /// Reference to a separately declared listener variable
    Named(String),
    Anonymous(InlineListener),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerDecl {
    pub name: String,
    pub port: i32,
    #[serde(default)]
    pub secure_socket: Option<SecureSocket>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDecl {
    pub name: String,
    pub listener: ListenerBinding,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FunctionDecl {
    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Declaration {
    Listener(ListenerDecl),
    Service(ServiceDecl),
    Function(FunctionDecl),
}

impl Declaration {
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Declaration::Listener(l) => &l.annotations,
            Declaration::Service(s) => &s.annotations,
            Declaration::Function(f) => &f.annotations,
        }
    }

    pub fn attachment_point(&self) -> AttachmentPoint<'_> {
        match self {
            Declaration::Listener(l) => AttachmentPoint::Listener(l),
            Declaration::Service(s) => AttachmentPoint::Service(s),
            Declaration::Function(f) => AttachmentPoint::Function(f),
        }
    }
}

/// Everything the host compiler hands over for one compilation run, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl CompilationUnit {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KubeError::config_error(format!(
                "Failed to read compilation unit {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn listener(&self, name: &str) -> Option<&ListenerDecl> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Listener(l) if l.name == name => Some(l),
            _ => None,
        })
    }
}

/// The declaration an annotation is attached to.
#[derive(Debug, Clone, Copy)]
pub enum AttachmentPoint<'a> {
    Service(&'a ServiceDecl),
    Function(&'a FunctionDecl),
    Listener(&'a ListenerDecl),
}

impl AttachmentPoint<'_> {
    pub fn describe(&self) -> String {
        match self {
            AttachmentPoint::Service(s) => format!("service '{}'", s.name),
            AttachmentPoint::Function(f) => format!("function '{}'", f.name),
            AttachmentPoint::Listener(l) => format!("listener '{}'", l.name),
        }
    }
}

/// Listener view shared by service and listener attachment points.
///
/// An anonymous listener is keyed by the name of the service that declares it.
#[derive(Debug, Clone, Copy)]
pub struct ListenerInfo<'a> {
    pub name: &'a str,
    pub port: i32,
    pub secure_socket: Option<&'a SecureSocket>,
}

impl<'a> ListenerInfo<'a> {
    pub fn of_listener(listener: &'a ListenerDecl) -> Self {
        Self {
            name: &listener.name,
            port: listener.port,
            secure_socket: listener.secure_socket.as_ref(),
        }
    }

    /// Returns `None` when the service refers to a named listener variable.
    pub fn of_service(service: &'a ServiceDecl) -> Option<Self> {
        match &service.listener {
            ListenerBinding::Anonymous(inline) => Some(Self {
                name: &service.name,
                port: inline.port,
                secure_socket: inline.secure_socket.as_ref(),
            }),
            ListenerBinding::Named(_) => None,
        }
    }
}
