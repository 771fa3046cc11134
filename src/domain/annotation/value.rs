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

//! Raw annotation data as handed over by the host compiler

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A literal, list or record value attached to an annotation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<AnnotationValue>),
    Record(BTreeMap<String, AnnotationValue>),
}

impl AnnotationValue {
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<AnnotationValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        AnnotationValue::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationValue::Bool(_) => "boolean",
            AnnotationValue::Int(_) => "integer",
            AnnotationValue::Float(_) => "float",
            AnnotationValue::Str(_) => "string",
            AnnotationValue::List(_) => "list",
            AnnotationValue::Record(_) => "record",
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Str(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Str(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        AnnotationValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Annotation kinds understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationKind {
    #[serde(rename = "kubernetes:Deployment")]
    Deployment,
    #[serde(rename = "kubernetes:Service")]
    Service,
    #[serde(rename = "kubernetes:Ingress")]
    Ingress,
    #[serde(rename = "kubernetes:Secret")]
    Secret,
    #[serde(rename = "kubernetes:ConfigMap")]
    ConfigMap,
    #[serde(rename = "kubernetes:PersistentVolumeClaim")]
    PersistentVolumeClaim,
    #[serde(rename = "kubernetes:ResourceQuota")]
    ResourceQuota,
    #[serde(rename = "kubernetes:HPA")]
    PodAutoscaler,
    #[serde(rename = "kubernetes:Job")]
    Job,
    #[serde(rename = "istio:Gateway")]
    IstioGateway,
    #[serde(rename = "istio:VirtualService")]
    IstioVirtualService,
    #[serde(rename = "openshift:Route")]
    OpenShiftRoute,
    #[serde(rename = "openshift:BuildConfig")]
    OpenShiftBuildConfig,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Deployment => "kubernetes:Deployment",
            AnnotationKind::Service => "kubernetes:Service",
            AnnotationKind::Ingress => "kubernetes:Ingress",
            AnnotationKind::Secret => "kubernetes:Secret",
            AnnotationKind::ConfigMap => "kubernetes:ConfigMap",
            AnnotationKind::PersistentVolumeClaim => "kubernetes:PersistentVolumeClaim",
            AnnotationKind::ResourceQuota => "kubernetes:ResourceQuota",
            AnnotationKind::PodAutoscaler => "kubernetes:HPA",
            AnnotationKind::Job => "kubernetes:Job",
            AnnotationKind::IstioGateway => "istio:Gateway",
            AnnotationKind::IstioVirtualService => "istio:VirtualService",
            AnnotationKind::OpenShiftRoute => "openshift:Route",
            AnnotationKind::OpenShiftBuildConfig => "openshift:BuildConfig",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotation attachment: a kind plus its key-value record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    #[serde(default)]
    pub fields: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<AnnotationValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}
