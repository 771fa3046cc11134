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

/// Runtime paths inside the container
pub const RUNTIME_INSTALL_DIR: &str = "/ballerina";
pub const RUNTIME_MOUNT_ALIAS: &str = "/ballerina/runtime";
pub const RUNTIME_WORK_DIR: &str = "/home/ballerina";
pub const CONFIG_MOUNT_PATH: &str = "/home/ballerina/conf/";
pub const CONFIG_FILE_NAME: &str = "ballerina.conf";
pub const CONFIG_FILE_PATH: &str = "/home/ballerina/conf/ballerina.conf";

/// Mount paths no volume may claim
pub const RESERVED_MOUNT_PATHS: &[&str] = &[RUNTIME_INSTALL_DIR, RUNTIME_MOUNT_ALIAS, CONFIG_MOUNT_PATH];

/// Config file injection
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const CONFIG_FILE_ARG: &str = "--config ${CONFIG_FILE}";

/// Docker image defaults
pub const DEFAULT_BASE_IMAGE: &str = "ballerina/ballerina-runtime:latest";
pub const DEFAULT_IMAGE_TAG: &str = "latest";
pub const DOCKER_DIR: &str = "docker";
pub const DOCKERFILE_NAME: &str = "Dockerfile";
pub const DOCKER_MAINTAINER: &str = "dev@ballerina.io";
pub const RUNTIME_COMMAND: &str = "ballerina run";

/// Environment overrides
pub const ENV_DOCKER_HOST: &str = "DOCKER_HOST";
pub const ENV_DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// Workload defaults
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";
pub const DEFAULT_REPLICAS: i32 = 1;
pub const LIVENESS_INITIAL_DELAY: i32 = 10;
pub const LIVENESS_PERIOD: i32 = 5;
pub const IMAGE_PULL_POLICIES: &[&str] = &["Always", "IfNotPresent", "Never"];

/// Job defaults
pub const DEFAULT_JOB_BACKOFF_LIMIT: i32 = 3;
pub const DEFAULT_JOB_ACTIVE_DEADLINE: i64 = 20;

/// Autoscaler defaults
pub const DEFAULT_CPU_PERCENTAGE: i32 = 50;

/// Ingress defaults
pub const DEFAULT_INGRESS_CLASS: &str = "nginx";
pub const DEFAULT_INGRESS_PATH: &str = "/";
pub const DEFAULT_HOSTNAME_SUFFIX: &str = ".com";
pub const ANNOTATION_INGRESS_CLASS: &str = "kubernetes.io/ingress.class";
pub const ANNOTATION_NGINX_SSL_PASSTHROUGH: &str = "nginx.ingress.kubernetes.io/ssl-passthrough";
pub const ANNOTATION_NGINX_REWRITE_TARGET: &str = "nginx.ingress.kubernetes.io/rewrite-target";

/// Volume defaults
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";
pub const DEFAULT_VOLUME_CLAIM_SIZE: &str = "1Gi";
pub const VOLUME_SUFFIX: &str = "-volume";

/// Init container used to wait for dependencies
pub const INIT_CONTAINER_IMAGE: &str = "busybox:latest";
pub const INIT_CONTAINER_PREFIX: &str = "wait-for-";

/// Resource labels
pub const LABEL_APP: &str = "app";

/// Name suffixes
pub const SUFFIX_DEPLOYMENT: &str = "-deployment";
pub const SUFFIX_SERVICE: &str = "-svc";
pub const SUFFIX_INGRESS: &str = "-ingress";
pub const SUFFIX_HPA: &str = "-hpa";
pub const SUFFIX_JOB: &str = "-job";
pub const SUFFIX_SECRET: &str = "-secret";
pub const SUFFIX_CONFIG_MAP: &str = "-config-map";
pub const SUFFIX_VOLUME_CLAIM: &str = "-pvc";
pub const SUFFIX_RESOURCE_QUOTA: &str = "-resource-quota";
pub const SUFFIX_ISTIO_GATEWAY: &str = "-istio-gw";
pub const SUFFIX_ISTIO_VIRTUAL_SERVICE: &str = "-istio-vs";
pub const SUFFIX_OPENSHIFT_BUILD_CONFIG: &str = "-openshift-bc";
pub const SUFFIX_OPENSHIFT_ROUTE: &str = "-openshift-route";
pub const SUFFIX_KEYSTORE: &str = "-keystore";
pub const SUFFIX_TRUSTSTORE: &str = "-truststore";
pub const SUFFIX_SECURE_SOCKET: &str = "-secure-socket";
pub const SUFFIX_CONFIG_FILE: &str = "-ballerina-conf";

/// Output file suffixes
pub const FILE_DEPLOYMENT: &str = "_deployment.yaml";
pub const FILE_JOB: &str = "_job.yaml";
pub const FILE_SERVICE: &str = "_svc.yaml";
pub const FILE_INGRESS: &str = "_ingress.yaml";
pub const FILE_SECRET: &str = "_secret.yaml";
pub const FILE_CONFIG_MAP: &str = "_config_map.yaml";
pub const FILE_VOLUME_CLAIM: &str = "_volume_claim.yaml";
pub const FILE_HPA: &str = "_hpa.yaml";
pub const FILE_RESOURCE_QUOTA: &str = "_resource_quota.yaml";
pub const FILE_ISTIO_GATEWAY: &str = "_istio_gateway.yaml";
pub const FILE_ISTIO_VIRTUAL_SERVICE: &str = "_istio_virtual_service.yaml";
pub const OPENSHIFT_DIR: &str = "openshift";

/// Istio defaults
pub const ISTIO_API_VERSION: &str = "networking.istio.io/v1alpha3";
pub const ISTIO_DEFAULT_SELECTOR: (&str, &str) = ("istio", "ingressgateway");
pub const ISTIO_DEFAULT_PORT: i32 = 80;
pub const ISTIO_DEFAULT_PORT_NAME: &str = "http";
pub const ISTIO_DEFAULT_PROTOCOL: &str = "HTTP";

/// OpenShift API groups
pub const OPENSHIFT_BUILD_API_VERSION: &str = "build.openshift.io/v1";
pub const OPENSHIFT_IMAGE_API_VERSION: &str = "image.openshift.io/v1";
pub const OPENSHIFT_ROUTE_API_VERSION: &str = "route.openshift.io/v1";

/// Port protocol
pub const PROTOCOL_TCP: &str = "TCP";
