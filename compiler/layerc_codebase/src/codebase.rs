//! The accumulated symbol table.
//!
//! A [`Codebase`] is filled file by file with [`Codebase::update_from_file`]
//! (or [`Codebase::update_from_text`]), and partial codebases built by
//! separate workers are folded together with [`Codebase::merge`]. Once the
//! scan is over it is only read.

use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use layerc_diagnostic::{DiagnosticSink, WarningKind};
use layerc_lexer::{Delim, TokenList};
use layerc_macro::{MacroParts, Macros};
use layerc_parse::{
    get_base_type, statements, statements_of, FunctionParts, RecordParts, Statement,
    StatementKind, TypeCarry, Variable,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::visibility::resolve;
use crate::{Definition, Details, ModuleConfig, ScanContext, ScanError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Codebase {
    /// Records (structs, unions, enums) by tag.
    pub types: FxHashMap<String, Definition>,
    /// Names of the private records.
    pub types_restricted: FxHashSet<String>,
    /// Record name to field name to field.
    pub fields: FxHashMap<String, FxHashMap<String, Definition>>,
    /// Functions by name.
    pub names: FxHashMap<String, Definition>,
    /// Names of the private functions.
    pub names_restricted: FxHashSet<String>,
    /// Typedef name to the type it names, one hop at a time.
    pub typedefs: FxHashMap<String, String>,
    pub macros: Macros,
}

/// Insert `def`, or fold it into the existing entry of the same name.
fn upsert<'a>(
    map: &'a mut FxHashMap<String, Definition>,
    def: Definition,
    sink: &DiagnosticSink,
) -> &'a Definition {
    match map.entry(def.name.clone()) {
        Entry::Occupied(entry) => {
            let existing = entry.into_mut();
            existing.update(def, sink);
            existing
        }
        Entry::Vacant(entry) => entry.insert(def),
    }
}

/// Map entries in name order, so merges report in a stable order.
fn sorted<V>(map: FxHashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

impl Codebase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and scan one file.
    pub fn update_from_file(
        &mut self,
        path: &Path,
        sink: &DiagnosticSink,
        config: &Arc<ModuleConfig>,
    ) -> Result<(), ScanError> {
        let text = fs::read_to_string(path).map_err(|err| ScanError::read(path, err))?;
        let ctx = ScanContext::for_file(path, &text, sink.clone(), Arc::clone(config));
        trace!(path = %path.display(), module = ctx.module(), "scanning file");
        self.update_from_text(&text, 0, &ctx);
        Ok(())
    }

    /// Scan `text`, which starts at byte `base` of the context's file.
    pub fn update_from_text(&mut self, text: &str, base: usize, ctx: &ScanContext) {
        self.update_from_statements(statements(text, base), ctx);
    }

    fn update_from_statements(&mut self, statements: impl IntoIterator<Item = Statement>, ctx: &ScanContext) {
        let mut carry = TypeCarry::new();
        for statement in statements {
            let kind = statement.kind();
            if kind.contains(StatementKind::PREPROC) {
                self.add_macro(&statement);
                continue;
            }
            if carry.is_carrying()
                || (kind.contains(StatementKind::TYPEDEF) && !kind.contains(StatementKind::RECORD))
            {
                match carry.parse(&statement.tokens) {
                    Some(var) => self.add_typedef(&var),
                    None => carry.reset(),
                }
                continue;
            }

            if kind.contains(StatementKind::FUNCTION_DEF)
                || kind.contains(StatementKind::FUNCTION | StatementKind::DECL)
            {
                let ignored = ctx.config.ignored_annotations();
                if let Some(func) = FunctionParts::from_tokens(&statement.tokens, &ignored) {
                    self.add_function(func, ctx);
                }
            } else if kind.contains(StatementKind::RECORD) {
                if let Some(record) = RecordParts::from_statement(&statement) {
                    if kind.contains(StatementKind::TYPEDEF) && statement.terminator() == Some(",") {
                        if let Some(name) = &record.name {
                            carry.carry(TokenList::from_vec(vec![record.kind.clone(), name.clone()]));
                        }
                    }
                    self.add_record(record, ctx);
                }
            } else if kind.contains(StatementKind::EXTERN_C) {
                self.add_extern_c(&statement.tokens, ctx);
            }
        }
    }

    fn add_macro(&mut self, statement: &Statement) {
        let Some(parts) = MacroParts::from_statement(statement) else {
            return;
        };
        for conflict in self.macros.upsert(parts) {
            debug!("{conflict}");
        }
    }

    /// First definition of a typedef name wins.
    fn add_typedef(&mut self, var: &Variable) {
        let target = get_base_type(&var.typename);
        if target.is_empty() || target == var.name.text {
            return;
        }
        self.typedefs.entry(var.name.text.clone()).or_insert(target);
    }

    fn add_function(&mut self, func: FunctionParts, ctx: &ScanContext) {
        let offset = func.name.span.start;
        let visibility = resolve(
            func.pre_comment.as_ref(),
            func.post_comment.as_ref(),
            &func.name.text,
            offset,
            false,
            ctx,
        );
        let def = Definition::new(
            func.name.text.clone(),
            ctx.scope.clone(),
            offset,
            visibility,
            Details::Function(func),
        );
        self.add_name(def, &ctx.sink);
    }

    fn add_name(&mut self, def: Definition, sink: &DiagnosticSink) {
        let def = upsert(&mut self.names, def, sink);
        if def.is_private() {
            self.names_restricted.insert(def.name.clone());
        }
    }

    fn add_type(&mut self, def: Definition, sink: &DiagnosticSink) {
        let def = upsert(&mut self.types, def, sink);
        if def.is_private() {
            self.types_restricted.insert(def.name.clone());
        }
    }

    fn add_field(&mut self, record: &str, def: Definition, sink: &DiagnosticSink) {
        upsert(self.fields.entry(record.to_owned()).or_default(), def, sink);
    }

    /// Record, its members, the typedef names bound to it and its nested
    /// records. Variables declared with the record are not modeled.
    fn add_record(&mut self, mut record: RecordParts, ctx: &ScanContext) {
        let Some(name) = record.name.clone() else {
            trace!("skipping anonymous record");
            return;
        };
        let visibility = resolve(
            record.pre_comment.as_ref(),
            record.post_comment.as_ref(),
            &name.text,
            name.span.start,
            true,
            ctx,
        );

        for member in &record.members {
            let offset = member.name.span.start;
            let visibility = resolve(
                member.pre_comment.as_ref(),
                member.post_comment.as_ref(),
                &member.name.text,
                offset,
                true,
                ctx,
            );
            let def = Definition::new(
                member.name.text.clone(),
                ctx.scope.clone(),
                offset,
                visibility,
                Details::Field(member.clone()),
            );
            self.add_field(&name.text, def, &ctx.sink);
        }
        for typedef in &record.typedefs {
            if typedef.name.text != name.text {
                self.typedefs
                    .entry(typedef.name.text.clone())
                    .or_insert_with(|| name.text.clone());
            }
        }

        let nested = std::mem::take(&mut record.nested);
        let def = Definition::new(
            name.text.clone(),
            ctx.scope.clone(),
            name.span.start,
            visibility,
            Details::Record(record),
        );
        self.add_type(def, &ctx.sink);
        for inner in nested {
            self.add_record(inner, ctx);
        }
    }

    /// Re-scan the body of an `extern "C" { ... }` block in place.
    fn add_extern_c(&mut self, tokens: &TokenList, ctx: &ScanContext) {
        let Some(body) = tokens.iter().find(|t| t.is_group(Delim::Brace)) else {
            return;
        };
        let Some(interior) = body.interior() else {
            return;
        };
        let inner = ctx.nested(interior.span.start);
        self.update_from_statements(statements_of(&interior), &inner);
    }

    /// Fold a partial codebase built from later files into this one.
    pub fn merge(&mut self, other: Codebase, sink: &DiagnosticSink) {
        for (_, def) in sorted(other.types) {
            self.add_type(def, sink);
        }
        for (_, def) in sorted(other.names) {
            self.add_name(def, sink);
        }
        for (record, fields) in sorted(other.fields) {
            for (_, def) in sorted(fields) {
                self.add_field(&record, def, sink);
            }
        }
        self.types_restricted.extend(other.types_restricted);
        self.names_restricted.extend(other.names_restricted);
        for (name, target) in other.typedefs {
            self.typedefs.entry(name).or_insert(target);
        }
        for conflict in self.macros.merge(other.macros) {
            debug!("{conflict}");
        }
    }

    /// Follow the typedef chain from `name`. Prefers the first target that
    /// is a known record, then the first with known fields, then wherever
    /// the chain ends.
    pub fn untypedef(&self, name: &str) -> String {
        let mut current = name;
        let mut seen = FxHashSet::default();
        let mut record = None;
        let mut with_fields = None;
        while let Some(target) = self.typedefs.get(current) {
            if !seen.insert(current) {
                break;
            }
            let target = target.as_str();
            if record.is_none() && self.types.contains_key(target) {
                record = Some(target);
            }
            if with_fields.is_none() && self.fields.contains_key(target) {
                with_fields = Some(target);
            }
            current = target;
        }
        record.or(with_fields).unwrap_or(current).to_owned()
    }

    /// The resolved type name of `record.field`. `record` may be a typedef
    /// name.
    pub fn get_field_type(&self, record: &str, field: &str) -> Option<String> {
        let def = self
            .get_field(record, field)
            .or_else(|| self.get_field(&self.untypedef(record), field))?;
        let Details::Field(var) = &def.details else {
            return None;
        };
        let base = get_base_type(&var.typename);
        (!base.is_empty()).then(|| self.untypedef(&base))
    }

    /// Expand the registered macros in `text`, which sits at `offset` of
    /// the context's file. Calls that cannot be expanded are kept as
    /// written and reported as errors.
    pub fn expand_macros(&self, text: &str, offset: usize, ctx: &ScanContext) -> String {
        let expansion = self.macros.expand(text);
        for error in &expansion.errors {
            ctx.sink.error(
                WarningKind::MACRO_EXPANSION,
                Some(ctx.location(offset)),
                error.to_string(),
            );
        }
        expansion.text
    }

    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&Definition> {
        self.types.get(name)
    }

    #[inline]
    pub fn get_name(&self, name: &str) -> Option<&Definition> {
        self.names.get(name)
    }

    pub fn get_field(&self, record: &str, field: &str) -> Option<&Definition> {
        self.fields.get(record)?.get(field)
    }

    #[inline]
    pub fn is_restricted_type(&self, name: &str) -> bool {
        self.types_restricted.contains(name)
    }

    #[inline]
    pub fn is_restricted_name(&self, name: &str) -> bool {
        self.names_restricted.contains(name)
    }

    /// Total number of types, functions and fields.
    pub fn definition_count(&self) -> usize {
        self.types.len() + self.names.len() + self.fields.values().map(FxHashMap::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests;
