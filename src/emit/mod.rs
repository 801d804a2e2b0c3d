//! CSS emission.
//!
//! The emitter receives resolved declaration blocks in canonical order and
//! turns them into rules and class lists:
//!
//! - **Human mode**: one class per instance; all properties of a
//!   (selector variant, breakpoint) pair merge into one rule.
//! - **Atomic mode**: one content-addressed class per declaration; a rule is
//!   written once no matter how many instances share it.
//!
//! Presets always go to the preset layer, and the document root always renders
//! under `:root`, in both modes. Declarations within a rule are sorted by their
//! CSS property name.

mod prefix;
mod sheet;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use crate::cascade::{ResolvedBlock, SelectorVariant};
use crate::config::NamingOptions;
use crate::model::{StyleValue, ValueContext};
use crate::naming::{atomic_class_name, ClassNamer};
use crate::preset::PresetRule;

pub use prefix::{vendor_prefix, VENDOR_PREFIXES, VENDOR_PREFIX_TABLE_VERSION};
pub use sheet::{Rule, StyleSheet};

/// A rendered `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// Result of one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCss {
    pub css_text: String,
    /// Class lists keyed by instance id, in tree order. Instances without any
    /// class are absent.
    pub classes: IndexMap<String, Vec<String>>,
}

/// Converts a stored property name to its CSS form.
///
/// `fontSize` becomes `font-size`, `WebkitLineClamp` becomes
/// `-webkit-line-clamp`, `msFlex` becomes `-ms-flex`. Custom properties are
/// returned unchanged.
pub fn hyphenate_property(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    if property.starts_with("ms") && property[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_valid_property(property: &str) -> bool {
    let body = property.strip_prefix("--").unwrap_or(property);
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Renders declarations, dropping the ones that cannot be written safely,
/// and sorts the result by property name.
pub fn render_declarations<'v>(
    declarations: impl IntoIterator<Item = (&'v str, &'v StyleValue)>,
    values: &ValueContext<'_>,
) -> Vec<Declaration> {
    let mut rendered: Vec<Declaration> = declarations
        .into_iter()
        .filter_map(|(property, value)| {
            let property = hyphenate_property(property);
            if !is_valid_property(&property) {
                warn!("dropping declaration with invalid property name '{property}'");
                return None;
            }
            match value.to_css(values) {
                Ok(value) => Some(Declaration { property, value }),
                Err(err) => {
                    warn!("dropping declaration '{property}': {err}");
                    None
                }
            }
        })
        .collect();
    rendered.sort_by(|a, b| a.property.cmp(&b.property));
    rendered
}

/// Builds the stylesheet and class lists of one compile.
#[derive(Debug)]
pub struct Emitter<'a> {
    naming: &'a NamingOptions,
    atomic: bool,
    values: ValueContext<'a>,
    sheet: StyleSheet,
    atomic_rules: HashSet<String>,
    classes: IndexMap<String, Vec<String>>,
}

impl<'a> Emitter<'a> {
    /// `breakpoints` lists `(id, media query)` in output order.
    pub fn new<'b>(
        naming: &'a NamingOptions,
        atomic: bool,
        values: ValueContext<'a>,
        breakpoints: impl IntoIterator<Item = (&'b str, String)>,
    ) -> Self {
        Self {
            naming,
            atomic,
            values,
            sheet: StyleSheet::new(naming.preset_layer.as_str(), breakpoints),
            atomic_rules: HashSet::new(),
            classes: IndexMap::new(),
        }
    }

    /// Writes preset rules into the preset layer.
    pub fn emit_presets(&mut self, rules: &[PresetRule<'_>]) {
        for rule in rules {
            let declarations = render_declarations(
                rule.declarations
                    .iter()
                    .map(|decl| (decl.property.as_str(), &decl.value)),
                &self.values,
            );
            if !declarations.is_empty() {
                self.sheet.add_layer_rule(Rule {
                    selector: rule.selector.clone(),
                    declarations,
                });
            }
        }
    }

    /// Writes the document root's rules. They always merge under `:root` and
    /// never produce classes.
    pub fn emit_root(&mut self, blocks: &[ResolvedBlock<'_>]) {
        for block in blocks {
            let declarations = self.render_block(block);
            if !declarations.is_empty() {
                self.sheet.add_media_rule(
                    block.breakpoint_id,
                    Rule {
                        selector: format!(":root{}", block.variant.suffix()),
                        declarations,
                    },
                );
            }
        }
    }

    /// Writes one instance's rules and records its class list: the preset
    /// class first, then its style classes.
    ///
    /// In human mode the style class is claimed from `namer` using `label`,
    /// and only when at least one declaration survives rendering.
    pub fn emit_instance(
        &mut self,
        instance_id: &str,
        preset_class: Option<String>,
        blocks: &[ResolvedBlock<'_>],
        namer: &mut ClassNamer,
        label: &str,
    ) {
        let rendered: Vec<(&ResolvedBlock<'_>, Vec<Declaration>)> = blocks
            .iter()
            .map(|block| (block, self.render_block(block)))
            .filter(|(_, declarations)| !declarations.is_empty())
            .collect();

        let mut classes: Vec<String> = preset_class.into_iter().collect();
        if !rendered.is_empty() {
            if self.atomic {
                self.emit_atomic(rendered, &mut classes);
            } else {
                let class = namer.claim(label);
                for (block, declarations) in rendered {
                    self.sheet.add_media_rule(
                        block.breakpoint_id,
                        Rule {
                            selector: format!(".{class}{}", block.variant.suffix()),
                            declarations,
                        },
                    );
                }
                classes.push(class);
            }
        }

        if !classes.is_empty() {
            self.classes.insert(instance_id.to_string(), classes);
        }
    }

    fn emit_atomic(
        &mut self,
        rendered: Vec<(&ResolvedBlock<'_>, Vec<Declaration>)>,
        classes: &mut Vec<String>,
    ) {
        for (block, declarations) in rendered {
            for declaration in declarations {
                let class = self.atomic_class(&block.variant, block.breakpoint_id, &declaration);
                if self.atomic_rules.insert(class.clone()) {
                    self.sheet.add_media_rule(
                        block.breakpoint_id,
                        Rule {
                            selector: format!(".{class}{}", block.variant.suffix()),
                            declarations: vec![declaration],
                        },
                    );
                }
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
        }
    }

    fn atomic_class(
        &self,
        variant: &SelectorVariant<'_>,
        breakpoint_id: &str,
        declaration: &Declaration,
    ) -> String {
        atomic_class_name(
            &self.naming.atomic_prefix,
            variant,
            breakpoint_id,
            &declaration.property,
            &declaration.value,
        )
    }

    fn render_block(&self, block: &ResolvedBlock<'_>) -> Vec<Declaration> {
        render_declarations(
            block
                .declarations
                .iter()
                .map(|(property, value)| (*property, *value)),
            &self.values,
        )
    }

    pub fn finish(self) -> GeneratedCss {
        GeneratedCss {
            css_text: self.sheet.to_css_text(),
            classes: self.classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_hyphenate_property() {
        assert_eq!(hyphenate_property("color"), "color");
        assert_eq!(hyphenate_property("fontSize"), "font-size");
        assert_eq!(hyphenate_property("WebkitLineClamp"), "-webkit-line-clamp");
        assert_eq!(hyphenate_property("msFlex"), "-ms-flex");
        assert_eq!(hyphenate_property("--brandColor"), "--brandColor");
        assert_eq!(hyphenate_property("user-select"), "user-select");
    }

    #[test]
    fn test_render_declarations_sorts_by_css_name() {
        let assets = HashMap::new();
        let values = ValueContext {
            assets: &assets,
            asset_base_url: "",
        };
        let size = StyleValue::keyword("medium");
        let family = StyleValue::keyword("serif");
        let color = StyleValue::keyword("blue");
        let rendered = render_declarations(
            [("fontSize", &size), ("color", &color), ("fontFamily", &family)],
            &values,
        );
        let properties: Vec<_> = rendered.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(properties, ["color", "font-family", "font-size"]);
    }

    #[test]
    fn test_render_declarations_drops_bad_entries() {
        let assets = HashMap::new();
        let values = ValueContext {
            assets: &assets,
            asset_base_url: "",
        };
        let ok = StyleValue::keyword("red");
        let invalid = StyleValue::Invalid {
            value: "nope".to_string(),
        };
        let rendered = render_declarations(
            [("color", &ok), ("margin", &invalid), ("color;x", &ok)],
            &values,
        );
        assert_eq!(
            rendered,
            vec![Declaration {
                property: "color".to_string(),
                value: "red".to_string()
            }]
        );
    }
}
