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

//! TLS secrets derived from a listener's key store and trust store

use super::ProcessorContext;
use crate::domain::annotation::{AnnotationValue, ListenerInfo, StoreConfig};
use crate::domain::model::naming::derived_name;
use crate::domain::model::SecretModel;
use crate::infrastructure::constants::*;
use crate::shared::error::{KubeError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

struct StoreFile {
    mount_path: String,
    file_name: String,
    content: Vec<u8>,
}

/// Reads a file named by an annotation, relative paths resolve against the source root.
pub(super) fn read_data_file(ctx: &ProcessorContext<'_>, field: &str, path: &str) -> Result<Vec<u8>> {
    let full_path = if Path::new(path).is_absolute() {
        Path::new(path).to_path_buf()
    } else {
        ctx.source_root.join(path)
    };
    std::fs::read(&full_path).map_err(|e| {
        KubeError::malformed(
            field,
            format!("readable file at {} ({})", full_path.display(), e),
        )
    })
}

/// Final path component, used as the data key of a mounted file.
pub(super) fn file_name(field: &str, path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| KubeError::malformed(field, "path to a file"))
}

fn load_store(ctx: &ProcessorContext<'_>, field: &str, store: &StoreConfig) -> Result<StoreFile> {
    let path = ctx
        .resolver
        .string(field, &AnnotationValue::Str(store.path.clone()))?;
    let parent = Path::new(&path)
        .parent()
        .and_then(|p| p.to_str())
        .unwrap_or_default();
    let mount_path = if parent.starts_with('/') {
        parent.to_string()
    } else if parent.is_empty() {
        RUNTIME_WORK_DIR.to_string()
    } else {
        format!("{}/{}", RUNTIME_WORK_DIR, parent.trim_start_matches("./"))
    };

    Ok(StoreFile {
        mount_path,
        file_name: file_name(field, &path)?,
        content: read_data_file(ctx, field, &path)?,
    })
}

fn secret_from(name: String, files: Vec<StoreFile>) -> SecretModel {
    let mount_path = files
        .first()
        .map(|f| f.mount_path.clone())
        .unwrap_or_default();
    let data: BTreeMap<String, Vec<u8>> = files
        .into_iter()
        .map(|f| (f.file_name, f.content))
        .collect();
    SecretModel {
        data,
        ..SecretModel::new(name, mount_path)
    }
}

/// Secrets holding the listener's TLS stores.
///
/// Stores sharing a parent directory are combined into one `-secure-socket` secret,
/// otherwise each store gets its own `-keystore` / `-truststore` secret.
pub fn tls_secrets(ctx: &ProcessorContext<'_>, listener: &ListenerInfo<'_>) -> Result<Vec<SecretModel>> {
    let Some(secure_socket) = listener.secure_socket else {
        return Ok(Vec::new());
    };

    let key_store = secure_socket
        .key_store
        .as_ref()
        .map(|s| load_store(ctx, "secureSocket.keyStore.path", s))
        .transpose()?;
    let trust_store = secure_socket
        .trust_store
        .as_ref()
        .map(|s| load_store(ctx, "secureSocket.trustStore.path", s))
        .transpose()?;

    let secrets = match (key_store, trust_store) {
        (Some(key), Some(trust)) if key.mount_path == trust.mount_path => {
            vec![secret_from(
                derived_name(listener.name, SUFFIX_SECURE_SOCKET),
                vec![key, trust],
            )]
        }
        (key, trust) => {
            let mut secrets = Vec::new();
            if let Some(key) = key {
                secrets.push(secret_from(derived_name(listener.name, SUFFIX_KEYSTORE), vec![key]));
            }
            if let Some(trust) = trust {
                secrets.push(secret_from(
                    derived_name(listener.name, SUFFIX_TRUSTSTORE),
                    vec![trust],
                ));
            }
            secrets
        }
    };
    debug!(
        "Listener '{}' yields {} TLS secret(s)",
        listener.name,
        secrets.len()
    );
    Ok(secrets)
}

/// Registers the listener's TLS secrets, if any.
pub(super) fn register_tls_secrets(
    ctx: &mut ProcessorContext<'_>,
    listener: &ListenerInfo<'_>,
) -> Result<()> {
    let secrets = tls_secrets(ctx, listener)?;
    if secrets.is_empty() {
        return Ok(());
    }
    ctx.holder.add_listener_secrets(listener.name, secrets)
}
