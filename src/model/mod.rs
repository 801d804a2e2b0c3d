//! Input data shapes read by the compiler.
//!
//! Everything here is produced by collaborators outside this crate (the
//! authoring layer builds the instance tree, the style storage layer produces
//! declarations and breakpoints) and is treated as read-only:
//!
//! - [`Instance`] / [`InstanceChild`]: the authored component tree
//! - [`Breakpoint`]: media conditions keyed by breakpoint id
//! - [`StyleDecl`]: one declaration owned by a style source
//! - [`ComponentMeta`]: per-component defaults ("presets") keyed by tag
//! - [`StyleValue`]: the typed declaration value
//!
//! Field names serialize in camelCase to match the JSON produced upstream.

mod error;
mod value;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use error::ValueError;
pub use value::{is_safe_selector_suffix, ImageValue, StyleValue, ValueContext};

/// Selection key of the document root pseudo-instance.
pub const ROOT_INSTANCE_ID: &str = ":root";

/// Component identity whose preset styles target the document root.
pub const ROOT_COMPONENT: &str = "ws:root";

/// Id of the unconditional breakpoint.
pub const BASE_BREAKPOINT_ID: &str = "base";

/// A node of the authored component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    /// Qualified component name, optionally prefixed by a namespace
    /// (`@scope/pkg:Name`).
    pub component: String,
    /// Explicit tag override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Tag carried by the older `tag` property; loses to [`Instance::tag`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_tag: Option<String>,
    /// Human label given by the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InstanceChild>,
}

impl Instance {
    pub fn new(id: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component: component.into(),
            tag: None,
            legacy_tag: None,
            label: None,
            children: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_legacy_tag(mut self, tag: impl Into<String>) -> Self {
        self.legacy_tag = Some(tag.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a child instance.
    pub fn child(mut self, child: Instance) -> Self {
        self.children.push(InstanceChild::Instance(child));
        self
    }

    /// Appends a virtual descendant selector node.
    pub fn descendant(mut self, id: impl Into<String>, selector: impl Into<String>) -> Self {
        self.children.push(InstanceChild::Descendant {
            id: id.into(),
            selector: selector.into(),
        });
        self
    }
}

/// A child slot of an [`Instance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InstanceChild {
    Instance(Instance),
    /// A virtual node that never renders. Its styles apply to the enclosing
    /// instance's selector followed by `selector` (e.g. `" a"`).
    Descendant { id: String, selector: String },
    Text { value: String },
}

/// A media breakpoint. A breakpoint without widths is unconditional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl Breakpoint {
    /// The unconditional breakpoint.
    pub fn base() -> Self {
        Self::default()
    }

    pub fn min_width(label: impl Into<String>, width: u32) -> Self {
        Self {
            label: label.into(),
            min_width: Some(width),
            max_width: None,
        }
    }

    pub fn max_width(label: impl Into<String>, width: u32) -> Self {
        Self {
            label: label.into(),
            min_width: None,
            max_width: Some(width),
        }
    }

    /// Media query text used in `@media <query>`.
    pub fn media_query(&self) -> String {
        let mut query = String::from("all");
        if let Some(min) = self.min_width {
            query.push_str(&format!(" and (min-width: {min}px)"));
        }
        if let Some(max) = self.max_width {
            query.push_str(&format!(" and (max-width: {max}px)"));
        }
        query
    }

    /// Sort key for media blocks: unconditional first, then max-width
    /// queries widest first, then min-width queries narrowest first.
    pub(crate) fn cascade_key(&self) -> (u8, i64) {
        match (self.min_width, self.max_width) {
            (None, None) => (0, 0),
            (None, Some(max)) => (1, -i64::from(max)),
            (Some(min), _) => (2, i64::from(min)),
        }
    }
}

/// A single declaration stored under a style source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDecl {
    pub style_source_id: String,
    pub breakpoint_id: String,
    /// Pseudo-class suffix such as `:hover`; `None` targets the plain selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Property name, camelCase (`fontSize`) or a custom property (`--gap`).
    pub property: String,
    pub value: StyleValue,
}

impl StyleDecl {
    pub fn new(
        style_source_id: impl Into<String>,
        breakpoint_id: impl Into<String>,
        property: impl Into<String>,
        value: StyleValue,
    ) -> Self {
        Self {
            style_source_id: style_source_id.into(),
            breakpoint_id: breakpoint_id.into(),
            state: None,
            property: property.into(),
            value,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// A default declaration of a component preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDecl {
    pub property: String,
    pub value: StyleValue,
}

impl PresetDecl {
    pub fn new(property: impl Into<String>, value: StyleValue) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

/// Metadata the compiler reads from a component definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Default declarations per tag. Order is significant: the first tag is
    /// the component's default tag and preset rules render in this order.
    #[serde(default)]
    pub preset_style: IndexMap<String, Vec<PresetDecl>>,
}

impl ComponentMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds (or replaces) the preset declarations for `tag`.
    pub fn preset(mut self, tag: impl Into<String>, decls: Vec<PresetDecl>) -> Self {
        self.preset_style.insert(tag.into(), decls);
        self
    }

    /// First tag declared by the preset map.
    pub fn default_tag(&self) -> Option<&str> {
        self.preset_style.keys().next().map(String::as_str)
    }
}

/// An uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name under the asset base url.
    pub name: String,
}

/// Strips the namespace prefix from a qualified component name.
///
/// `@webstudio/radix:ListItem` becomes `ListItem`; names without a namespace
/// are returned unchanged.
pub fn short_component_name(component: &str) -> &str {
    component
        .rsplit_once(':')
        .map_or(component, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_component_name() {
        assert_eq!(short_component_name("Box"), "Box");
        assert_eq!(short_component_name("@webstudio/radix:ListItem"), "ListItem");
        assert_eq!(short_component_name("ws:root"), "root");
    }

    #[test]
    fn test_media_query() {
        assert_eq!(Breakpoint::base().media_query(), "all");
        assert_eq!(
            Breakpoint::min_width("tablet", 768).media_query(),
            "all and (min-width: 768px)"
        );
        assert_eq!(
            Breakpoint::max_width("mobile", 479).media_query(),
            "all and (max-width: 479px)"
        );
    }

    #[test]
    fn test_cascade_key_order() {
        let mut breakpoints = [
            Breakpoint::min_width("desktop", 1280),
            Breakpoint::max_width("mobile", 479),
            Breakpoint::min_width("tablet", 768),
            Breakpoint::base(),
            Breakpoint::max_width("landscape", 767),
        ];
        breakpoints.sort_by_key(Breakpoint::cascade_key);
        let labels: Vec<_> = breakpoints.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["", "landscape", "mobile", "tablet", "desktop"]);
    }

    #[test]
    fn test_default_tag_follows_insertion_order() {
        let meta = ComponentMeta::new()
            .preset("section", vec![])
            .preset("div", vec![]);
        assert_eq!(meta.default_tag(), Some("section"));
    }

    #[test]
    fn test_instance_child_deserialize() {
        let json = r#"{
            "id": "body",
            "component": "Body",
            "children": [
                {"type": "instance", "id": "box", "component": "Box", "legacyTag": "span"},
                {"type": "descendant", "id": "d", "selector": " a"},
                {"type": "text", "value": "hello"}
            ]
        }"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.children.len(), 3);
        match &instance.children[0] {
            InstanceChild::Instance(child) => {
                assert_eq!(child.legacy_tag.as_deref(), Some("span"));
            }
            other => panic!("expected instance, got {other:?}"),
        }
        assert_eq!(
            instance.children[1],
            InstanceChild::Descendant {
                id: "d".to_string(),
                selector: " a".to_string()
            }
        );
    }

    #[test]
    fn test_component_meta_type_field() {
        let json = r#"{"type": "container", "icon": "", "presetStyle": {"div": [
            {"property": "display", "value": {"type": "keyword", "value": "block"}}
        ]}}"#;
        let meta: ComponentMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.kind, "container");
        assert_eq!(meta.default_tag(), Some("div"));
    }
}
