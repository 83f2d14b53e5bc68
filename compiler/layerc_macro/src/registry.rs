//! The macro registry.

use rustc_hash::FxHashMap;
use tracing::debug;

use layerc_parse::Statement;

use crate::expand::{Expander, MacroExpansion};
use crate::MacroParts;

/// Macro definitions by name.
///
/// Expansion borrows the registry immutably; concurrent expansions over one
/// registry are independent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Macros {
    macros: FxHashMap<String, MacroParts>,
}

impl Macros {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&MacroParts> {
        self.macros.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroParts)> {
        self.macros.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert or replace a definition. Returns the replaced one.
    pub fn add(&mut self, parts: MacroParts) -> Option<MacroParts> {
        self.macros.insert(parts.name.text.clone(), parts)
    }

    /// Register the `#define` in `statement`, if it is one.
    pub fn add_from_statement(&mut self, statement: &Statement) -> bool {
        match MacroParts::from_statement(statement) {
            Some(parts) => {
                self.add(parts);
                true
            }
            None => false,
        }
    }

    /// Register a macro that has no source location.
    pub fn define(&mut self, name: &str, args: Option<&[&str]>, body: &str) {
        self.add(MacroParts::new(name, args, body));
    }

    /// Keep the first definition of a name; a later one only fills in
    /// missing comments. Returns the differences between the two.
    pub fn upsert(&mut self, parts: MacroParts) -> Vec<String> {
        match self.macros.get_mut(&parts.name.text) {
            Some(existing) => {
                let conflicts = existing.update(&parts);
                if !conflicts.is_empty() {
                    debug!(name = %parts.name, ?conflicts, "macro redefined");
                }
                conflicts
            }
            None => {
                self.add(parts);
                Vec::new()
            }
        }
    }

    /// Upsert every definition of `other`, in name order.
    pub fn merge(&mut self, other: Macros) -> Vec<String> {
        let mut incoming: Vec<MacroParts> = other.macros.into_values().collect();
        incoming.sort_by(|a, b| a.name.text.cmp(&b.name.text));
        incoming
            .into_iter()
            .flat_map(|parts| self.upsert(parts))
            .collect()
    }

    /// Expand all macro invocations in `text`.
    pub fn expand(&self, text: &str) -> MacroExpansion {
        if self.macros.is_empty() {
            return MacroExpansion {
                text: text.to_owned(),
                errors: Vec::new(),
            };
        }
        let mut expander = Expander::new(&self.macros);
        let expanded = expander.expand(text);
        expander.finish(expanded)
    }
}

#[cfg(test)]
mod tests;
