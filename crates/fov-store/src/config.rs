//! Optional `layer.toml` next to the settings database.
//!
//! ```toml
//! namespace = "CustomizedFOV"
//!
//! [bypass]
//! applications = ["hello_xr"]
//! engines = ["SomeEngine"]
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use fov_core::xr::InstanceCreateInfo;
use fov_core::{LayerHooks, SETTINGS_NAMESPACE};

use crate::error::Result;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    pub namespace: String,
    pub bypass: BypassRules,
}

/// Applications and engines the layer stays out of, matched by name
/// ignoring ASCII case.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BypassRules {
    pub applications: Vec<String>,
    pub engines: Vec<String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            namespace: SETTINGS_NAMESPACE.to_string(),
            bypass: BypassRules::default(),
        }
    }
}

impl LayerConfig {
    /// A missing file is the default config.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no layer config at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl BypassRules {
    pub fn matches(&self, application_name: &str, engine_name: &str) -> bool {
        let listed = |names: &[String], name: &str| {
            !name.is_empty() && names.iter().any(|n| n.eq_ignore_ascii_case(name))
        };
        listed(&self.applications, application_name) || listed(&self.engines, engine_name)
    }
}

impl LayerHooks for LayerConfig {
    fn bypass(&self, create_info: &InstanceCreateInfo) -> bool {
        let app = &create_info.application_info;
        self.bypass.matches(&app.application_name, &app.engine_name)
    }
}
