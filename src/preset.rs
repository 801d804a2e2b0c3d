//! Component preset collection.
//!
//! A component's metadata may declare default declarations per tag. Only the
//! (component, tag) pairs that some instance actually renders are emitted.
//! Each qualified component identity gets one class, claimed the first time
//! one of its instances is seen; every used tag becomes a `tag.class` rule.
//! Components from different namespaces never share a class even when their
//! short names match; the shared [`ClassNamer`] gives the later ones numeric
//! suffixes.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::model::{short_component_name, ComponentMeta, PresetDecl, ROOT_COMPONENT};
use crate::naming::ClassNamer;

/// A preset rule ready for emission.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRule<'a> {
    pub selector: String,
    pub declarations: &'a [PresetDecl],
}

#[derive(Debug)]
struct UsedComponent<'a> {
    class: String,
    tags: IndexSet<&'a str>,
}

/// Accumulates preset usage over one tree walk.
#[derive(Debug)]
pub struct PresetCollector<'a> {
    metas: &'a HashMap<String, ComponentMeta>,
    used: IndexMap<&'a str, UsedComponent<'a>>,
}

impl<'a> PresetCollector<'a> {
    pub fn new(metas: &'a HashMap<String, ComponentMeta>) -> Self {
        Self {
            metas,
            used: IndexMap::new(),
        }
    }

    /// Label used for human class names of `component`: the meta label, or
    /// the component name without its namespace.
    pub fn display_label(&self, component: &'a str) -> &'a str {
        self.metas
            .get(component)
            .and_then(|meta| meta.label.as_deref())
            .unwrap_or_else(|| short_component_name(component))
    }

    /// Records that an instance of `component` renders as `tag`.
    ///
    /// Returns the component's preset class when it declares presets for
    /// `tag`. The document root component is excluded; its preset renders
    /// under `:root` (see [`PresetCollector::finish`]).
    pub fn use_preset(
        &mut self,
        component: &'a str,
        tag: &'a str,
        namer: &mut ClassNamer,
    ) -> Option<String> {
        if component == ROOT_COMPONENT {
            return None;
        }
        let has_preset = self
            .metas
            .get(component)
            .and_then(|meta| meta.preset_style.get(tag))
            .is_some_and(|decls| !decls.is_empty());
        if !has_preset {
            return None;
        }

        if !self.used.contains_key(component) {
            let class = namer.claim(self.display_label(component));
            self.used.insert(
                component,
                UsedComponent {
                    class,
                    tags: IndexSet::new(),
                },
            );
        }
        let used = self.used.get_mut(component)?;
        used.tags.insert(tag);
        Some(used.class.clone())
    }

    /// Produces the preset rules: the document root first (when its meta
    /// declares a preset), then components in first-use order, each with its
    /// used tags in the order the meta declares them.
    pub fn finish(self) -> Vec<PresetRule<'a>> {
        let mut rules = Vec::new();

        let root = self
            .metas
            .get(ROOT_COMPONENT)
            .and_then(|meta| meta.preset_style.first());
        if let Some((_, declarations)) = root {
            rules.push(PresetRule {
                selector: ":root".to_string(),
                declarations,
            });
        }

        for (component, used) in &self.used {
            let Some(meta) = self.metas.get(*component) else {
                continue;
            };
            for (tag, declarations) in &meta.preset_style {
                if used.tags.contains(tag.as_str()) {
                    rules.push(PresetRule {
                        selector: format!("{tag}.{}", used.class),
                        declarations,
                    });
                }
            }
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleValue;

    fn display(value: &str) -> Vec<PresetDecl> {
        vec![PresetDecl::new("display", StyleValue::keyword(value))]
    }

    fn selectors(rules: &[PresetRule<'_>]) -> Vec<String> {
        rules.iter().map(|rule| rule.selector.clone()).collect()
    }

    #[test]
    fn test_only_used_tags_in_declared_order() {
        let metas = HashMap::from([(
            "Box".to_string(),
            ComponentMeta::new()
                .preset("div", display("block"))
                .preset("span", display("block"))
                .preset("article", display("block"))
                .preset("section", display("block"))
                .preset("main", display("block")),
        )]);
        let mut namer = ClassNamer::new("w-");
        let mut presets = PresetCollector::new(&metas);

        // Use order differs from declaration order.
        for tag in ["article", "div", "span", "div"] {
            assert_eq!(presets.use_preset("Box", tag, &mut namer).as_deref(), Some("w-box"));
        }

        assert_eq!(
            selectors(&presets.finish()),
            ["div.w-box", "span.w-box", "article.w-box"]
        );
    }

    #[test]
    fn test_namespaces_get_distinct_classes() {
        let metas = HashMap::from([
            ("ListItem".to_string(), ComponentMeta::new().preset("div", display("block"))),
            (
                "@webstudio/radix:ListItem".to_string(),
                ComponentMeta::new().preset("div", display("flex")),
            ),
            (
                "@webstudio/aria:ListItem".to_string(),
                ComponentMeta::new().preset("div", display("grid")),
            ),
        ]);
        let mut namer = ClassNamer::new("w-");
        let mut presets = PresetCollector::new(&metas);

        let classes: Vec<_> = [
            "ListItem",
            "@webstudio/radix:ListItem",
            "@webstudio/aria:ListItem",
            "@webstudio/radix:ListItem",
        ]
        .into_iter()
        .map(|component| presets.use_preset(component, "div", &mut namer))
        .collect();

        assert_eq!(
            classes,
            [
                Some("w-list-item".to_string()),
                Some("w-list-item-1".to_string()),
                Some("w-list-item-2".to_string()),
                Some("w-list-item-1".to_string()),
            ]
        );
        assert_eq!(presets.finish().len(), 3);
    }

    #[test]
    fn test_unknown_component_or_tag_has_no_preset() {
        let metas = HashMap::from([("Box".to_string(), ComponentMeta::new().preset("div", display("block")))]);
        let mut namer = ClassNamer::new("w-");
        let mut presets = PresetCollector::new(&metas);

        assert_eq!(presets.use_preset("Missing", "div", &mut namer), None);
        assert_eq!(presets.use_preset("Box", "span", &mut namer), None);
        assert!(presets.finish().is_empty());
        // Nothing was claimed, so the first real claim is bare.
        assert_eq!(namer.claim("Box"), "w-box");
    }

    #[test]
    fn test_meta_label_names_the_class() {
        let metas = HashMap::from([(
            "Body".to_string(),
            ComponentMeta::new()
                .with_label("body meta label")
                .preset("div", display("block")),
        )]);
        let mut namer = ClassNamer::new("w-");
        let mut presets = PresetCollector::new(&metas);
        assert_eq!(
            presets.use_preset("Body", "div", &mut namer).as_deref(),
            Some("w-body-meta-label")
        );
    }

    #[test]
    fn test_root_preset_targets_root_selector() {
        let metas = HashMap::from([(
            ROOT_COMPONENT.to_string(),
            ComponentMeta::new()
                .with_label("Global Root")
                .preset("html", display("grid")),
        )]);
        let mut namer = ClassNamer::new("w-");
        let mut presets = PresetCollector::new(&metas);

        assert_eq!(presets.use_preset(ROOT_COMPONENT, "html", &mut namer), None);
        let rules = presets.finish();
        assert_eq!(selectors(&rules), [":root"]);
        assert_eq!(rules[0].declarations, display("grid").as_slice());
    }
}
