//! The compile input snapshot and naming options.
//!
//! A [`CssConfig`] bundles everything one compile reads. It can be built in
//! code with the fluent methods below, or loaded from a JSON/YAML snapshot
//! exported by the authoring layer:
//!
//! ```rust
//! use cascade_css::{Breakpoint, CssConfig, Instance, StyleDecl, StyleValue};
//!
//! let config = CssConfig::new()
//!     .instance(Instance::new("box", "Box"))
//!     .breakpoint("base", Breakpoint::base())
//!     .select("box", ["local"])
//!     .style("local:base:color", StyleDecl::new("local", "base", "color", StyleValue::keyword("red")));
//!
//! let css = cascade_css::generate_css(&config);
//! assert!(css.css_text.contains("color: red"));
//! ```

mod error;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Asset, Breakpoint, ComponentMeta, Instance, StyleDecl};

pub use error::ConfigError;

/// Names and prefixes used in generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NamingOptions {
    /// Prefix of human-readable class names.
    pub class_prefix: String,
    /// Prefix of content-addressed class names.
    pub atomic_prefix: String,
    /// Name of the cascade layer holding component presets.
    pub preset_layer: String,
    /// Tag assumed when nothing else names one.
    pub fallback_tag: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            class_prefix: "w-".to_string(),
            atomic_prefix: "c".to_string(),
            preset_layer: "presets".to_string(),
            fallback_tag: "div".to_string(),
        }
    }
}

/// Everything a single compile reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssConfig {
    /// Root instances of the tree, in render order.
    pub instances: Vec<Instance>,
    pub breakpoints: IndexMap<String, Breakpoint>,
    /// Ordered style source ids per instance id (or [`ROOT_INSTANCE_ID`](crate::ROOT_INSTANCE_ID)).
    pub style_source_selections: HashMap<String, Vec<String>>,
    /// Declarations under opaque storage keys. Only the embedded fields are read.
    pub styles: IndexMap<String, StyleDecl>,
    pub component_metas: HashMap<String, ComponentMeta>,
    pub assets: HashMap<String, Asset>,
    pub asset_base_url: String,
    /// Emit one class per declaration instead of one per instance.
    pub atomic: bool,
    pub naming: NamingOptions,
}

impl CssConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON snapshot.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a YAML snapshot.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a snapshot file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFormat`] for extensions other than
    /// `json`, `yaml` and `yml`, and I/O or parse errors otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&content)
    }

    /// Appends a root instance.
    pub fn instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn breakpoint(mut self, id: impl Into<String>, breakpoint: Breakpoint) -> Self {
        self.breakpoints.insert(id.into(), breakpoint);
        self
    }

    /// Sets the ordered style source selection of an instance.
    pub fn select<I, S>(mut self, instance_id: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_source_selections.insert(
            instance_id.into(),
            sources.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn style(mut self, key: impl Into<String>, decl: StyleDecl) -> Self {
        self.styles.insert(key.into(), decl);
        self
    }

    pub fn component(mut self, component: impl Into<String>, meta: ComponentMeta) -> Self {
        self.component_metas.insert(component.into(), meta);
        self
    }

    pub fn asset(mut self, id: impl Into<String>, asset: Asset) -> Self {
        self.assets.insert(id.into(), asset);
        self
    }

    pub fn asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = url.into();
        self
    }

    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn naming(mut self, naming: NamingOptions) -> Self {
        self.naming = naming;
        self
    }
}
