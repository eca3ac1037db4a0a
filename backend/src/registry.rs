//! Widget registry loaded from a JSON file.
//!
//! The file is an object keyed by widget id. Each entry holds the public
//! widget fields (camelCase, as the widget receives them) plus the
//! server-only `autoReply` and `systemPrompt`:
//!
//! ```json
//! { "demo": { "productName": "Acme", "isActive": true, "autoReply": "Thanks!" } }
//! ```

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use supportdesk_shared::{validate_widget_id, ContractError, PartialWidgetConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid registry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    #[serde(flatten)]
    pub config: PartialWidgetConfig,
    #[serde(default)]
    pub auto_reply: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl WidgetRecord {
    /// Widgets are active unless the file says otherwise.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.config.is_active.unwrap_or(true)
    }

    /// Config as served to the widget: id and activity always present.
    #[must_use]
    pub fn public_config(&self, widget_id: &str) -> PartialWidgetConfig {
        PartialWidgetConfig {
            widget_id: Some(widget_id.to_string()),
            is_active: Some(self.is_active()),
            ..self.config.clone()
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    widgets: HashMap<String, WidgetRecord>,
}

impl Registry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate every id.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let widgets: HashMap<String, WidgetRecord> = serde_json::from_str(json)?;
        for id in widgets.keys() {
            validate_widget_id(id)?;
        }
        Ok(Self { widgets })
    }

    #[must_use]
    pub fn get(&self, widget_id: &str) -> Option<&WidgetRecord> {
        self.widgets.get(widget_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
