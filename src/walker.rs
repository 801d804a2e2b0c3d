//! Instance tree traversal.
//!
//! The walker flattens the authored tree into render order and, for every real
//! instance, records:
//!
//! - the tag it renders as (see [`resolve_tag`])
//! - the selector scopes it must be compiled for: itself, plus one scope per
//!   virtual descendant node attached to it
//!
//! Pseudo-state variants are not known here; they come from the declarations
//! themselves and are expanded by the resolver.

use std::collections::HashMap;

use log::{debug, warn};

use crate::model::{is_safe_selector_suffix, ComponentMeta, Instance, InstanceChild};

/// A selection list to resolve, and the descendant suffix its rules carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorScope<'a> {
    /// Key into the style source selections (instance or descendant node id).
    pub selection_id: &'a str,
    /// Descendant combinator suffix such as `" a"`; `None` for the instance itself.
    pub descendant: Option<&'a str>,
}

/// A real instance in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedInstance<'a> {
    pub id: &'a str,
    pub component: &'a str,
    pub tag: &'a str,
    pub label: Option<&'a str>,
    pub scopes: Vec<SelectorScope<'a>>,
}

/// Resolves the tag an instance renders as.
///
/// Precedence: explicit tag, then the legacy tag property, then the first tag
/// declared in the component's preset map, then `fallback`.
pub fn resolve_tag<'a>(
    instance: &'a Instance,
    meta: Option<&'a ComponentMeta>,
    fallback: &'a str,
) -> &'a str {
    instance
        .tag
        .as_deref()
        .or(instance.legacy_tag.as_deref())
        .or_else(|| meta.and_then(ComponentMeta::default_tag))
        .unwrap_or(fallback)
}

/// Walks the tree depth-first, parents before children.
pub fn walk<'a>(
    roots: &'a [Instance],
    metas: &'a HashMap<String, ComponentMeta>,
    fallback_tag: &'a str,
) -> Vec<WalkedInstance<'a>> {
    let mut walked = Vec::new();
    for root in roots {
        visit(root, metas, fallback_tag, &mut walked);
    }
    walked
}

fn visit<'a>(
    instance: &'a Instance,
    metas: &'a HashMap<String, ComponentMeta>,
    fallback_tag: &'a str,
    walked: &mut Vec<WalkedInstance<'a>>,
) {
    let meta = metas.get(&instance.component);
    if meta.is_none() {
        debug!(
            "instance '{}' uses unknown component '{}'",
            instance.id, instance.component
        );
    }

    let mut scopes = vec![SelectorScope {
        selection_id: &instance.id,
        descendant: None,
    }];
    scopes.extend(instance.children.iter().filter_map(|child| match child {
        InstanceChild::Descendant { id, selector } if is_safe_selector_suffix(selector) => {
            Some(SelectorScope {
                selection_id: id,
                descendant: Some(selector.as_str()),
            })
        }
        InstanceChild::Descendant { id, selector } => {
            warn!("dropping descendant '{id}' of '{}': unsafe selector {selector:?}", instance.id);
            None
        }
        _ => None,
    }));

    walked.push(WalkedInstance {
        id: &instance.id,
        component: &instance.component,
        tag: resolve_tag(instance, meta, fallback_tag),
        label: instance.label.as_deref(),
        scopes,
    });

    for child in &instance.children {
        if let InstanceChild::Instance(child) = child {
            visit(child, metas, fallback_tag, walked);
        }
    }
}
