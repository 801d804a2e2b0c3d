//! Style resolution: which declaration wins for every selector and breakpoint.
//!
//! An instance's style source selection is an ordered list of source ids.
//! Declarations are applied source by source, in that order, into a working
//! map keyed by (state, breakpoint, property); a later source simply
//! overwrites an earlier one. Whatever remains after the last source is the
//! winning value. Storage keys of the declarations are never consulted.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::model::{is_safe_selector_suffix, Breakpoint, StyleDecl, StyleValue};
use crate::walker::SelectorScope;

/// The rendered selector a declaration targets, relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectorVariant<'a> {
    /// Descendant combinator suffix, e.g. `" a"`.
    pub descendant: Option<&'a str>,
    /// Pseudo-class suffix, e.g. `":hover"`.
    pub state: Option<&'a str>,
}

impl<'a> SelectorVariant<'a> {
    pub const PLAIN: SelectorVariant<'static> = SelectorVariant {
        descendant: None,
        state: None,
    };

    /// Text appended to the owner's selector.
    pub fn suffix(&self) -> String {
        let mut suffix = String::new();
        suffix.push_str(self.descendant.unwrap_or_default());
        suffix.push_str(self.state.unwrap_or_default());
        suffix
    }
}

/// Winning declarations of one selector variant in one breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock<'a> {
    pub variant: SelectorVariant<'a>,
    pub breakpoint_id: &'a str,
    /// Property (as stored) to winning value, in first-written order.
    pub declarations: IndexMap<&'a str, &'a StyleValue>,
}

/// Resolves selection lists against the declaration store.
#[derive(Debug)]
pub struct Resolver<'a> {
    by_source: HashMap<&'a str, Vec<&'a StyleDecl>>,
    selections: &'a HashMap<String, Vec<String>>,
    breakpoint_order: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        styles: impl IntoIterator<Item = &'a StyleDecl>,
        selections: &'a HashMap<String, Vec<String>>,
        breakpoints: &'a IndexMap<String, Breakpoint>,
    ) -> Self {
        let mut by_source: HashMap<&'a str, Vec<&'a StyleDecl>> = HashMap::new();
        for decl in styles {
            if !breakpoints.contains_key(&decl.breakpoint_id) {
                debug!(
                    "dropping '{}' from source '{}': unknown breakpoint '{}'",
                    decl.property, decl.style_source_id, decl.breakpoint_id
                );
                continue;
            }
            if let Some(state) = decl.state.as_deref().filter(|s| !is_safe_selector_suffix(s)) {
                warn!(
                    "dropping '{}' from source '{}': unsafe state {state:?}",
                    decl.property, decl.style_source_id
                );
                continue;
            }
            by_source
                .entry(decl.style_source_id.as_str())
                .or_default()
                .push(decl);
        }

        let mut breakpoint_order: Vec<(&'a str, &'a Breakpoint)> = breakpoints
            .iter()
            .map(|(id, breakpoint)| (id.as_str(), breakpoint))
            .collect();
        breakpoint_order.sort_by_key(|(_, breakpoint)| breakpoint.cascade_key());

        Self {
            by_source,
            selections,
            breakpoint_order: breakpoint_order.into_iter().map(|(id, _)| id).collect(),
        }
    }

    /// Breakpoint ids, narrowest condition first.
    pub fn breakpoint_order(&self) -> &[&'a str] {
        &self.breakpoint_order
    }

    /// Resolves one scope. Blocks come out grouped by state (plain first,
    /// then states in first-seen order) and by breakpoint within a state.
    pub fn resolve_scope(&self, scope: SelectorScope<'a>) -> Vec<ResolvedBlock<'a>> {
        self.resolve_selections(&[scope.selection_id], scope.descendant)
    }

    /// Resolves every scope of an instance and orders the result canonically:
    /// by breakpoint, then by scope, then by state.
    ///
    /// Scopes sharing a descendant suffix target the same selector, so their
    /// selections are chained in scope order and resolved together; a later
    /// scope wins over an earlier one.
    pub fn resolve_scopes(&self, scopes: &[SelectorScope<'a>]) -> Vec<ResolvedBlock<'a>> {
        let mut grouped: IndexMap<Option<&'a str>, Vec<&'a str>> = IndexMap::new();
        for scope in scopes {
            grouped
                .entry(scope.descendant)
                .or_default()
                .push(scope.selection_id);
        }
        let mut blocks: Vec<ResolvedBlock<'a>> = grouped
            .iter()
            .flat_map(|(descendant, selection_ids)| {
                self.resolve_selections(selection_ids, *descendant)
            })
            .collect();
        blocks.sort_by_key(|block| self.breakpoint_position(block.breakpoint_id));
        blocks
    }

    fn resolve_selections(
        &self,
        selection_ids: &[&'a str],
        descendant: Option<&'a str>,
    ) -> Vec<ResolvedBlock<'a>> {
        let mut winners: IndexMap<Option<&'a str>, IndexMap<(&'a str, &'a str), &'a StyleValue>> =
            IndexMap::new();
        for &selection_id in selection_ids {
            let Some(selection) = self.selections.get(selection_id) else {
                continue;
            };
            for source_id in selection {
                let Some(decls) = self.by_source.get(source_id.as_str()) else {
                    debug!(
                        "selection of '{}' references unknown style source '{}'",
                        selection_id, source_id
                    );
                    continue;
                };
                for &decl in decls {
                    winners
                        .entry(decl.state.as_deref())
                        .or_default()
                        .insert((decl.breakpoint_id.as_str(), decl.property.as_str()), &decl.value);
                }
            }
        }
        winners.sort_by(|a, _, b, _| a.is_some().cmp(&b.is_some()));

        let mut blocks = Vec::new();
        for (state, entries) in &winners {
            let variant = SelectorVariant {
                descendant,
                state: *state,
            };
            for &breakpoint_id in &self.breakpoint_order {
                let declarations: IndexMap<&'a str, &'a StyleValue> = entries
                    .iter()
                    .filter(|((bp, _), _)| *bp == breakpoint_id)
                    .map(|((_, property), value)| (*property, *value))
                    .collect();
                if !declarations.is_empty() {
                    blocks.push(ResolvedBlock {
                        variant,
                        breakpoint_id,
                        declarations,
                    });
                }
            }
        }
        blocks
    }

    fn breakpoint_position(&self, breakpoint_id: &str) -> usize {
        self.breakpoint_order
            .iter()
            .position(|id| *id == breakpoint_id)
            .unwrap_or(usize::MAX)
    }
}
