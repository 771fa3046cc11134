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

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteModel {
    pub name: String,
    pub namespace: Option<String>,
    pub listener_name: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub host: String,
    /// Filled in from the listener's Service during generation
    pub service_name: Option<String>,
    pub target_port: Option<i32>,
}

/// Host of a route, either literal or synthesized from a cluster domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteHost {
    Host(String),
    Domain(String),
}

impl RouteHost {
    /// `<route-name>-<namespace>.<domain>` for domain hosts.
    pub fn resolve(&self, route_name: &str, namespace: Option<&str>) -> Option<String> {
        match self {
            RouteHost::Host(host) => Some(host.clone()),
            RouteHost::Domain(domain) => {
                namespace.map(|ns| format!("{}-{}.{}", route_name, ns, domain))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfigModel {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub force_pull_docker_image: bool,
    pub build_docker_image: bool,
}

impl BuildConfigModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            force_pull_docker_image: false,
            build_docker_image: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_host() {
        let host = RouteHost::Domain("example.com".to_string());
        assert_eq!(
            host.resolve("foo-openshift-route", Some("ns")).as_deref(),
            Some("foo-openshift-route-ns.example.com")
        );
        assert!(host.resolve("foo-openshift-route", None).is_none());
    }

    #[test]
    fn test_literal_host_ignores_namespace() {
        let host = RouteHost::Host("www.example.com".to_string());
        assert_eq!(host.resolve("r", None).as_deref(), Some("www.example.com"));
    }
}
