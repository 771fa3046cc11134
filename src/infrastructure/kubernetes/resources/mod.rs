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

//! Model to document renderers for every generated kind

pub mod configmap;
pub mod deployment;
pub mod hpa;
pub mod ingress;
pub mod istio;
pub mod job;
pub mod openshift;
pub mod pod;
pub mod resource_quota;
pub mod secret;
pub mod service;
pub mod volume_claim;

pub use configmap::ConfigMapBuilder;
pub use deployment::DeploymentBuilder;
pub use hpa::PodAutoscalerBuilder;
pub use ingress::IngressBuilder;
pub use istio::{CustomResource, GatewayBuilder, VirtualServiceBuilder};
pub use job::{JobBuilder, JobDocument};
pub use openshift::{image_stream_name, BuildConfigBuilder, RouteBuilder};
pub use resource_quota::ResourceQuotaBuilder;
pub use secret::SecretBuilder;
pub use service::ServiceBuilder;
pub use volume_claim::VolumeClaimBuilder;

use crate::shared::error::Result;
use serde::Serialize;

/// Serialize documents into one YAML stream separated by `---`.
pub fn render_documents<T: Serialize>(documents: &[T]) -> Result<String> {
    let mut rendered = Vec::with_capacity(documents.len());
    for document in documents {
        rendered.push(serde_yaml::to_string(document)?);
    }
    Ok(rendered.join("---\n"))
}
