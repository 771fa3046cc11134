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

//! Value resolvers
//!
//! Converts raw annotation values into typed values. String values go through
//! placeholder substitution first:
//! - `$env{NAME}` is replaced by the environment variable `NAME`
//! - `${property}` is replaced by a build-time property such as `user.home`
//!
//! The environment is captured once per run in [`Placeholders`], so every
//! resolver call is a pure function of its input.

use super::value::AnnotationValue;
use crate::shared::error::{KubeError, Result};
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

pub const PROPERTY_USER_HOME: &str = "user.home";

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$env\{([^}]+)\}").expect("valid env placeholder pattern"))
}

fn property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid property placeholder pattern"))
}

/// Snapshot of the environment and build-time properties for one run.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    env: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl Placeholders {
    pub fn new(env: HashMap<String, String>, properties: HashMap<String, String>) -> Self {
        Self { env, properties }
    }

    /// Captures the process environment. `user.home` falls back to `$HOME`.
    pub fn from_process_env(mut properties: HashMap<String, String>) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        if !properties.contains_key(PROPERTY_USER_HOME) {
            if let Some(home) = env.get("HOME") {
                properties.insert(PROPERTY_USER_HOME.to_string(), home.clone());
            }
        }
        Self { env, properties }
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    /// Unknown `${...}` properties are left untouched, they may be shell
    /// variables meant for the container (e.g. `${CONFIG_FILE}`).
    pub fn substitute(&self, field: &str, raw: &str) -> Result<String> {
        let mut missing = None;
        let replaced = env_pattern().replace_all(raw, |caps: &Captures| {
            let name = &caps[1];
            match self.env.get(name) {
                Some(value) => value.clone(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        if let Some(name) = missing {
            return Err(KubeError::malformed(
                field,
                format!("environment variable '{}' to be set", name),
            ));
        }

        let replaced = property_pattern().replace_all(&replaced, |caps: &Captures| {
            self.properties
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(replaced.into_owned())
    }
}

/// Typed views over raw annotation values.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    placeholders: &'a Placeholders,
}

impl<'a> ValueResolver<'a> {
    pub fn new(placeholders: &'a Placeholders) -> Self {
        Self { placeholders }
    }

    pub fn string(&self, field: &str, value: &AnnotationValue) -> Result<String> {
        match value {
            AnnotationValue::Str(s) => self.placeholders.substitute(field, s),
            AnnotationValue::Int(i) => Ok(i.to_string()),
            AnnotationValue::Float(f) => Ok(f.to_string()),
            AnnotationValue::Bool(b) => Ok(b.to_string()),
            _ => Err(KubeError::malformed(field, "string")),
        }
    }

    pub fn int(&self, field: &str, value: &AnnotationValue) -> Result<i64> {
        match value {
            AnnotationValue::Int(i) => Ok(*i),
            AnnotationValue::Str(s) => self
                .placeholders
                .substitute(field, s)?
                .trim()
                .parse::<i64>()
                .map_err(|_| KubeError::malformed(field, "integer")),
            _ => Err(KubeError::malformed(field, "integer")),
        }
    }

    pub fn i32(&self, field: &str, value: &AnnotationValue) -> Result<i32> {
        let v = self.int(field, value)?;
        i32::try_from(v).map_err(|_| KubeError::malformed(field, "32-bit integer"))
    }

    pub fn bool(&self, field: &str, value: &AnnotationValue) -> Result<bool> {
        match value {
            AnnotationValue::Bool(b) => Ok(*b),
            AnnotationValue::Str(s) => match self.placeholders.substitute(field, s)?.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(KubeError::malformed(field, "boolean")),
            },
            _ => Err(KubeError::malformed(field, "boolean")),
        }
    }

    pub fn list<'v>(&self, field: &str, value: &'v AnnotationValue) -> Result<&'v [AnnotationValue]> {
        match value {
            AnnotationValue::List(items) => Ok(items),
            _ => Err(KubeError::malformed(field, "list")),
        }
    }

    pub fn record<'v>(
        &self,
        field: &str,
        value: &'v AnnotationValue,
    ) -> Result<&'v BTreeMap<String, AnnotationValue>> {
        match value {
            AnnotationValue::Record(map) => Ok(map),
            _ => Err(KubeError::malformed(field, "record")),
        }
    }

    pub fn string_list(&self, field: &str, value: &AnnotationValue) -> Result<Vec<String>> {
        match value {
            AnnotationValue::List(items) => items
                .iter()
                .map(|item| self.string(field, item))
                .collect(),
            _ => Err(KubeError::malformed(field, "list of strings")),
        }
    }

    pub fn string_set(&self, field: &str, value: &AnnotationValue) -> Result<BTreeSet<String>> {
        Ok(self.string_list(field, value)?.into_iter().collect())
    }

    pub fn string_map(
        &self,
        field: &str,
        value: &AnnotationValue,
    ) -> Result<BTreeMap<String, String>> {
        match value {
            AnnotationValue::Record(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), self.string(&format!("{}.{}", field, k), v)?)))
                .collect(),
            _ => Err(KubeError::malformed(field, "map of strings")),
        }
    }

    /// Decodes a nested record into a schema type, substituting placeholders in
    /// every string on the way.
    pub fn decode<T: DeserializeOwned>(
        &self,
        field: &str,
        value: &AnnotationValue,
        expected: &str,
    ) -> Result<T> {
        let json = self.to_json(field, value)?;
        serde_json::from_value(json)
            .map_err(|e| KubeError::malformed(field, format!("{} ({})", expected, e)))
    }

    fn to_json(&self, field: &str, value: &AnnotationValue) -> Result<serde_json::Value> {
        Ok(match value {
            AnnotationValue::Bool(b) => serde_json::Value::Bool(*b),
            AnnotationValue::Int(i) => serde_json::Value::from(*i),
            AnnotationValue::Float(f) => serde_json::Value::from(*f),
            AnnotationValue::Str(s) => serde_json::Value::String(self.placeholders.substitute(field, s)?),
            AnnotationValue::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.to_json(field, item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            AnnotationValue::Record(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.to_json(&format!("{}.{}", field, k), v)?)))
                    .collect::<Result<serde_json::Map<_, _>>>()?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders() -> Placeholders {
        let mut env = HashMap::new();
        env.insert("DOCKER_USERNAME".to_string(), "alice".to_string());
        let mut properties = HashMap::new();
        properties.insert(PROPERTY_USER_HOME.to_string(), "/home/alice".to_string());
        Placeholders::new(env, properties)
    }

    #[test]
    fn test_substitutes_env_and_home() {
        let p = placeholders();
        let resolver = ValueResolver::new(&p);
        let value = AnnotationValue::from("$env{DOCKER_USERNAME}@${user.home}/certs");
        assert_eq!(
            resolver.string("username", &value).unwrap(),
            "alice@/home/alice/certs"
        );
    }

    #[test]
    fn test_missing_env_is_malformed() {
        let p = placeholders();
        let resolver = ValueResolver::new(&p);
        let err = resolver
            .string("password", &AnnotationValue::from("$env{NOT_SET}"))
            .unwrap_err();
        assert!(matches!(err, KubeError::MalformedAnnotationValue { ref field, .. } if field == "password"));
    }

    #[test]
    fn test_unknown_property_is_kept() {
        let p = placeholders();
        let resolver = ValueResolver::new(&p);
        let value = AnnotationValue::from("--config ${CONFIG_FILE}");
        assert_eq!(resolver.string("args", &value).unwrap(), "--config ${CONFIG_FILE}");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let p = placeholders();
        let resolver = ValueResolver::new(&p);
        let value = AnnotationValue::record([
            ("b", AnnotationValue::from("$env{DOCKER_USERNAME}")),
            ("a", AnnotationValue::from("plain")),
        ]);
        let first = resolver.string_map("labels", &value).unwrap();
        let second = resolver.string_map("labels", &value).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.get("b").map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_type_mismatches() {
        let p = placeholders();
        let resolver = ValueResolver::new(&p);
        assert!(resolver.int("replicas", &AnnotationValue::from("three")).is_err());
        assert_eq!(resolver.int("replicas", &AnnotationValue::from("3")).unwrap(), 3);
        assert!(resolver.bool("push", &AnnotationValue::Int(1)).is_err());
        assert!(resolver
            .string_map("labels", &AnnotationValue::from(vec!["a"]))
            .is_err());
        assert!(resolver
            .i32("port", &AnnotationValue::Int(i64::from(i32::MAX) + 1))
            .is_err());
    }
}
