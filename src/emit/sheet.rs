//! Stylesheet assembly and text output.

use std::collections::HashMap;

use super::prefix::vendor_prefix;
use super::Declaration;

/// A selector and its declarations, already sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    fn write_to(&self, out: &mut String) {
        out.push_str("  ");
        out.push_str(&self.selector);
        out.push_str(" {\n");
        let mut first = true;
        for decl in &self.declarations {
            let prefixed = vendor_prefix(&decl.property)
                .map(|prefix| format!("{prefix}{}", decl.property));
            for property in prefixed.iter().chain(std::iter::once(&decl.property)) {
                if !first {
                    out.push_str(";\n");
                }
                first = false;
                out.push_str("    ");
                out.push_str(property);
                out.push_str(": ");
                out.push_str(&decl.value);
            }
        }
        out.push_str("\n  }");
    }
}

#[derive(Debug)]
struct MediaBlock {
    query: String,
    rules: Vec<Rule>,
}

/// Rules grouped into the preset layer and one media block per breakpoint.
#[derive(Debug)]
pub struct StyleSheet {
    layer_name: String,
    layer: Vec<Rule>,
    media: Vec<MediaBlock>,
    media_index: HashMap<String, usize>,
}

impl StyleSheet {
    /// Creates an empty sheet. `breakpoints` lists `(id, media query)` in
    /// output order.
    pub fn new<'b>(
        layer_name: impl Into<String>,
        breakpoints: impl IntoIterator<Item = (&'b str, String)>,
    ) -> Self {
        let mut media = Vec::new();
        let mut media_index = HashMap::new();
        for (id, query) in breakpoints {
            media_index.insert(id.to_string(), media.len());
            media.push(MediaBlock {
                query,
                rules: Vec::new(),
            });
        }
        Self {
            layer_name: layer_name.into(),
            layer: Vec::new(),
            media,
            media_index,
        }
    }

    pub fn add_layer_rule(&mut self, rule: Rule) {
        self.layer.push(rule);
    }

    /// Appends a rule to a breakpoint's block; unknown breakpoints are ignored.
    pub fn add_media_rule(&mut self, breakpoint_id: &str, rule: Rule) {
        if let Some(&index) = self.media_index.get(breakpoint_id) {
            self.media[index].rules.push(rule);
        }
    }

    /// Renders the sheet. Empty layers and media blocks produce no output at
    /// all, so a sheet without rules renders as an empty string.
    ///
    /// Every block is preceded by a line break except the layer, which comes
    /// first; a layer with nothing after it ends with one instead.
    pub fn to_css_text(&self) -> String {
        let mut out = String::new();
        let has_layer = !self.layer.is_empty();
        if has_layer {
            out.push_str("@layer ");
            out.push_str(&self.layer_name);
            out.push_str(" {\n");
            write_rules(&self.layer, &mut out);
            out.push_str("\n}");
        }
        let mut has_media = false;
        for block in self.media.iter().filter(|block| !block.rules.is_empty()) {
            has_media = true;
            out.push_str("\n@media ");
            out.push_str(&block.query);
            out.push_str(" {\n");
            write_rules(&block.rules, &mut out);
            out.push_str("\n}");
        }
        if has_layer && !has_media {
            out.push('\n');
        }
        out
    }
}

fn write_rules(rules: &[Rule], out: &mut String) {
    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        rule.write_to(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(property: &str, value: &str) -> Declaration {
        Declaration {
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_empty_sheet_renders_nothing() {
        let sheet = StyleSheet::new("presets", [("base", "all".to_string())]);
        assert_eq!(sheet.to_css_text(), "");
    }

    #[test]
    fn test_layer_then_media() {
        let mut sheet = StyleSheet::new(
            "presets",
            [
                ("base", "all".to_string()),
                ("tablet", "all and (min-width: 768px)".to_string()),
            ],
        );
        sheet.add_layer_rule(Rule {
            selector: "div.w-box".to_string(),
            declarations: vec![decl("display", "block")],
        });
        sheet.add_media_rule(
            "tablet",
            Rule {
                selector: ".w-box".to_string(),
                declarations: vec![decl("color", "red"), decl("margin", "0")],
            },
        );
        assert_eq!(
            sheet.to_css_text(),
            "@layer presets {\n  div.w-box {\n    display: block\n  }\n}\
             \n@media all and (min-width: 768px) {\n  .w-box {\n    color: red;\n    margin: 0\n  }\n}"
        );
    }

    #[test]
    fn test_layer_alone_ends_with_newline() {
        let mut sheet = StyleSheet::new("presets", [("base", "all".to_string())]);
        sheet.add_layer_rule(Rule {
            selector: "div.w-box".to_string(),
            declarations: vec![decl("display", "block")],
        });
        assert_eq!(
            sheet.to_css_text(),
            "@layer presets {\n  div.w-box {\n    display: block\n  }\n}\n"
        );
    }

    #[test]
    fn test_media_blocks_are_not_separated_by_blank_lines() {
        let mut sheet = StyleSheet::new(
            "presets",
            [
                ("base", "all".to_string()),
                ("tablet", "all and (min-width: 768px)".to_string()),
            ],
        );
        sheet.add_layer_rule(Rule {
            selector: "div.w-box".to_string(),
            declarations: vec![decl("display", "block")],
        });
        for id in ["base", "tablet"] {
            sheet.add_media_rule(
                id,
                Rule {
                    selector: ".w-box".to_string(),
                    declarations: vec![decl("color", "red")],
                },
            );
        }
        let css = sheet.to_css_text();
        assert!(css.contains("}\n@media all {"));
        assert!(css.contains("}\n@media all and (min-width: 768px) {"));
        assert!(!css.contains("\n\n"));
    }

    #[test]
    fn test_prefixed_line_precedes_standard() {
        let mut sheet = StyleSheet::new("presets", [("base", "all".to_string())]);
        sheet.add_media_rule(
            "base",
            Rule {
                selector: ".c1".to_string(),
                declarations: vec![decl("user-select", "none")],
            },
        );
        assert_eq!(
            sheet.to_css_text(),
            "\n@media all {\n  .c1 {\n    -webkit-user-select: none;\n    user-select: none\n  }\n}"
        );
    }

    #[test]
    fn test_unknown_breakpoint_rule_is_ignored() {
        let mut sheet = StyleSheet::new("presets", [("base", "all".to_string())]);
        sheet.add_media_rule(
            "wide",
            Rule {
                selector: ".w-box".to_string(),
                declarations: vec![decl("color", "red")],
            },
        );
        assert_eq!(sheet.to_css_text(), "");
    }
}
