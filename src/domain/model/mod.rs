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

//! Typed artifact models populated by the annotation processors

pub mod autoscaler;
pub mod deployment;
pub mod docker;
pub mod ingress;
pub mod istio;
pub mod job;
pub mod naming;
pub mod openshift;
pub mod resource_quota;
pub mod service;
pub mod volume;
pub mod workload;

pub use self::autoscaler::PodAutoscalerModel;
pub use self::deployment::{ContainerModel, CopyFileModel, DeploymentModel, LivenessProbeModel};
pub use self::docker::{DockerModel, RegistryCredentials};
pub use self::ingress::IngressModel;
pub use self::istio::{GatewayModel, GatewayServer, HttpRoute, VirtualServiceModel};
pub use self::job::{JobModel, RestartPolicy};
pub use self::openshift::{BuildConfigModel, RouteHost, RouteModel};
pub use self::resource_quota::ResourceQuotaModel;
pub use self::service::{ServiceModel, ServiceType, SessionAffinity};
pub use self::volume::{ConfigMapModel, SecretModel, VolumeClaimModel};
pub use self::workload::WorkloadModel;
