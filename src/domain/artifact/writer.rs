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

use crate::shared::error::{KubeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes generated files below a generation root.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writer rooted at a sub directory of this one.
    pub fn child(&self, dir: &str) -> Self {
        Self::new(self.root.join(dir))
    }

    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        self.ensure_root()?;
        let path = self.root.join(file_name);
        fs::write(&path, content).map_err(|e| KubeError::artifact_write(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    pub fn copy(&self, source: &Path, file_name: &str) -> Result<PathBuf> {
        self.ensure_root()?;
        let target = self.root.join(file_name);
        fs::copy(source, &target).map_err(|e| KubeError::artifact_write(&target, e))?;
        debug!("Copied {} to {}", source.display(), target.display());
        Ok(target)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| KubeError::artifact_write(&self.root, e))
    }
}
