//! # cascade-css - style data to layered CSS
//!
//! `cascade-css` compiles a normalized style snapshot (an instance tree,
//! per-instance style source selections, declarations, breakpoints and
//! component presets) into CSS text plus the class list each instance must
//! carry.
//!
//! ## Pipeline
//!
//! Each compile is a pure function of its input and runs four stages:
//!
//! 1. **Walk** ([`walker`]): flatten the tree, resolve each instance's tag and
//!    the selector scopes it compiles for (itself plus virtual descendants).
//! 2. **Resolve** ([`cascade`]): apply style sources in selection order; the
//!    last source providing a (state, breakpoint, property) wins.
//! 3. **Collect presets** ([`preset`]): one class per used component, one
//!    rule per used tag, emitted in a dedicated cascade layer.
//! 4. **Emit** ([`emit`]): render rules into the preset layer and one media
//!    block per breakpoint, and build the class lists.
//!
//! ## Modes
//!
//! In human mode every styled instance gets a readable class (`w-box`). In
//! atomic mode every declaration gets a content-addressed class (`c1x9…`) that
//! is shared by all instances with an identical declaration.
//!
//! ## Example
//!
//! ```rust
//! use cascade_css::{generate_css, Breakpoint, CssConfig, Instance, StyleDecl, StyleValue};
//!
//! let config = CssConfig::new()
//!     .instance(Instance::new("box", "Box"))
//!     .breakpoint("base", Breakpoint::base())
//!     .select("box", ["token", "local"])
//!     .style("a", StyleDecl::new("local", "base", "color", StyleValue::keyword("red")))
//!     .style("b", StyleDecl::new("token", "base", "color", StyleValue::keyword("blue")));
//!
//! let out = generate_css(&config);
//! assert_eq!(out.css_text, "\n@media all {\n  .w-box {\n    color: red\n  }\n}");
//! assert_eq!(out.classes["box"], ["w-box"]);
//! ```

pub mod cascade;
pub mod config;
pub mod emit;
pub mod model;
pub mod naming;
pub mod preset;
pub mod walker;

use std::collections::HashMap;

use crate::cascade::Resolver;
use crate::emit::Emitter;
use crate::naming::ClassNamer;
use crate::preset::PresetCollector;
use crate::walker::{SelectorScope, WalkedInstance};

pub use config::{ConfigError, CssConfig, NamingOptions};
pub use emit::{GeneratedCss, VENDOR_PREFIXES, VENDOR_PREFIX_TABLE_VERSION};
pub use model::{
    Asset, Breakpoint, ComponentMeta, ImageValue, Instance, InstanceChild, PresetDecl,
    StyleDecl, StyleValue, ValueContext, ValueError, BASE_BREAKPOINT_ID, ROOT_COMPONENT,
    ROOT_INSTANCE_ID,
};

/// Compiles a full snapshot into CSS text and per-instance class lists.
///
/// Never fails: unknown sources, breakpoints and components contribute
/// nothing, and declarations that cannot be rendered are dropped one by one.
pub fn generate_css(config: &CssConfig) -> GeneratedCss {
    let naming = &config.naming;
    let walked = walker::walk(
        &config.instances,
        &config.component_metas,
        &naming.fallback_tag,
    );
    let resolver = Resolver::new(
        config.styles.values(),
        &config.style_source_selections,
        &config.breakpoints,
    );
    let media: Vec<(&str, String)> = resolver
        .breakpoint_order()
        .iter()
        .filter_map(|id| {
            config
                .breakpoints
                .get(*id)
                .map(|breakpoint| (*id, breakpoint.media_query()))
        })
        .collect();
    let values = ValueContext {
        assets: &config.assets,
        asset_base_url: &config.asset_base_url,
    };

    let mut emitter = Emitter::new(naming, config.atomic, values, media);
    let root_blocks = resolver.resolve_scope(SelectorScope {
        selection_id: ROOT_INSTANCE_ID,
        descendant: None,
    });
    emitter.emit_root(&root_blocks);

    compile_instances(
        &walked,
        &config.component_metas,
        naming,
        Some(&resolver),
        emitter,
    )
}

/// A component rendered without tree context, for preset-only compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetUsage<'a> {
    pub component: &'a str,
    /// Explicit tag; `None` uses the component's first preset tag.
    pub tag: Option<&'a str>,
}

impl<'a> PresetUsage<'a> {
    pub fn new(component: &'a str) -> Self {
        Self {
            component,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: &'a str) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Compiles component presets alone.
///
/// Usages are keyed `"0"`, `"1"`, … in the order given. The output has the
/// same shape as [`generate_css`]: a preset layer and a class map.
pub fn generate_preset_css(
    usages: &[PresetUsage<'_>],
    component_metas: &HashMap<String, ComponentMeta>,
    naming: &NamingOptions,
) -> GeneratedCss {
    let ids: Vec<String> = (0..usages.len()).map(|index| index.to_string()).collect();
    let walked: Vec<WalkedInstance<'_>> = usages
        .iter()
        .zip(&ids)
        .map(|(usage, id)| WalkedInstance {
            id,
            component: usage.component,
            tag: usage
                .tag
                .or_else(|| {
                    component_metas
                        .get(usage.component)
                        .and_then(ComponentMeta::default_tag)
                })
                .unwrap_or(naming.fallback_tag.as_str()),
            label: None,
            scopes: Vec::new(),
        })
        .collect();

    let assets = HashMap::new();
    let values = ValueContext {
        assets: &assets,
        asset_base_url: "",
    };
    let emitter = Emitter::new(naming, false, values, std::iter::empty::<(&str, String)>());
    compile_instances(&walked, component_metas, naming, None, emitter)
}

fn compile_instances<'a>(
    walked: &[WalkedInstance<'a>],
    component_metas: &'a HashMap<String, ComponentMeta>,
    naming: &NamingOptions,
    resolver: Option<&Resolver<'a>>,
    mut emitter: Emitter<'_>,
) -> GeneratedCss {
    let mut namer = ClassNamer::new(naming.class_prefix.as_str());
    let mut presets = PresetCollector::new(component_metas);

    for instance in walked {
        let preset_class = presets.use_preset(instance.component, instance.tag, &mut namer);
        let blocks = resolver
            .map(|resolver| resolver.resolve_scopes(&instance.scopes))
            .unwrap_or_default();
        let label = instance
            .label
            .unwrap_or_else(|| presets.display_label(instance.component));
        emitter.emit_instance(instance.id, preset_class, &blocks, &mut namer, label);
    }

    emitter.emit_presets(&presets.finish());
    emitter.finish()
}
