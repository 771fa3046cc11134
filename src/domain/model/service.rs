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

use crate::infrastructure::constants::PROTOCOL_TCP;
use crate::shared::error::KubeError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIP => "ClusterIP",
            ServiceType::NodePort => "NodePort",
            ServiceType::LoadBalancer => "LoadBalancer",
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClusterIP" => Ok(ServiceType::ClusterIP),
            "NodePort" => Ok(ServiceType::NodePort),
            "LoadBalancer" => Ok(ServiceType::LoadBalancer),
            _ => Err(KubeError::malformed(
                "serviceType",
                "one of ClusterIP, NodePort, LoadBalancer",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAffinity {
    None,
    ClientIP,
}

impl SessionAffinity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionAffinity::None => "None",
            SessionAffinity::ClientIP => "ClientIP",
        }
    }
}

impl std::str::FromStr for SessionAffinity {
    type Err = KubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(SessionAffinity::None),
            "ClientIP" => Ok(SessionAffinity::ClientIP),
            _ => Err(KubeError::malformed("sessionAffinity", "one of None, ClientIP")),
        }
    }
}

/// One Kubernetes Service per network listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceModel {
    pub name: String,
    pub listener_name: String,
    /// Port exposed by the Service
    pub port: i32,
    /// Port the program binds inside the container
    pub target_port: i32,
    pub port_name: Option<String>,
    pub protocol: String,
    pub service_type: ServiceType,
    pub session_affinity: Option<SessionAffinity>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub selector: BTreeMap<String, String>,
}

impl ServiceModel {
    /// Without an annotation port both ports are the listener port. With one, the
    /// annotation port is exposed and traffic is forwarded to the listener port.
    pub fn new(
        name: impl Into<String>,
        listener_name: impl Into<String>,
        listener_port: i32,
        annotation_port: Option<i32>,
    ) -> Self {
        Self {
            name: name.into(),
            listener_name: listener_name.into(),
            port: annotation_port.unwrap_or(listener_port),
            target_port: listener_port,
            port_name: None,
            protocol: PROTOCOL_TCP.to_string(),
            service_type: ServiceType::ClusterIP,
            session_affinity: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            selector: BTreeMap::new(),
        }
    }
}
