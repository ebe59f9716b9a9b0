use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::export::Exporter;

/// Serialises a value to a single JSON file, creating parent directories.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    /// Compact output, as the module and lecturer files are consumed by tools.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pretty: false,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + ?Sized> Exporter<T> for JsonExporter {
    fn export(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        log::info!("wrote {}", self.path.display());
        Ok(())
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}
