//! Workspace layout: where the sources live, which module owns each file,
//! and the project-wide knobs that shape a scan.

use std::fs;
use std::path::{Path, PathBuf};

use layerc_macro::Macros;
use layerc_parse::DEFAULT_IGNORED_ANNOTATIONS;

use crate::ScanError;

/// A logical ownership unit: the module `name` owns every file under
/// `<root>/src/<dir>/`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Module {
    pub name: String,
    pub dir: String,
}

impl Module {
    /// A module whose directory has the module's own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Module {
            dir: name.clone(),
            name,
        }
    }

    pub fn with_dir(name: impl Into<String>, dir: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            dir: dir.into(),
        }
    }
}

/// A macro defined outside the sources, registered before any file is
/// scanned.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExtraMacro {
    pub name: String,
    pub args: Option<Vec<String>>,
    pub body: String,
}

impl ExtraMacro {
    pub fn object(name: impl Into<String>, body: impl Into<String>) -> Self {
        ExtraMacro {
            name: name.into(),
            args: None,
            body: body.into(),
        }
    }

    pub fn function(name: impl Into<String>, args: &[&str], body: impl Into<String>) -> Self {
        ExtraMacro {
            name: name.into(),
            args: Some(args.iter().map(|arg| (*arg).to_owned()).collect()),
            body: body.into(),
        }
    }

    /// Parse `NAME`, `NAME=body` or `NAME(a, b)=body`.
    pub fn parse(definition: &str) -> Option<ExtraMacro> {
        let (head, body) = definition.split_once('=').unwrap_or((definition, ""));
        let head = head.trim();
        let (name, args) = match head.split_once('(') {
            Some((name, rest)) => {
                let params = rest.strip_suffix(')')?;
                let args: Vec<String> = params
                    .split(',')
                    .map(str::trim)
                    .filter(|param| !param.is_empty())
                    .map(str::to_owned)
                    .collect();
                (name, Some(args))
            }
            None => (head, None),
        };
        let is_ident = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        is_ident.then(|| ExtraMacro {
            name: name.to_owned(),
            args,
            body: body.to_owned(),
        })
    }
}

/// Identifier prefixes that imply visibility for names in the record
/// namespace (record tags and members).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NamingConvention {
    pub private_prefixes: Vec<String>,
    pub public_prefixes: Vec<String>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention {
            private_prefixes: vec!["__wti_".into(), "__wt_".into()],
            public_prefixes: vec!["WT_".into(), "wiredtiger_".into()],
        }
    }
}

impl NamingConvention {
    /// Visibility implied by `name`: `Some((is_private, module))` when a
    /// prefix matches. The module is set when a known module name directly
    /// follows the prefix and ends at `_` or at the end of `name`.
    pub fn classify<'m>(&self, name: &str, modules: &'m [Module]) -> Option<(bool, Option<&'m str>)> {
        let private = self.private_prefixes.iter().map(|prefix| (prefix, true));
        let public = self.public_prefixes.iter().map(|prefix| (prefix, false));
        let (prefix, is_private) = private
            .chain(public)
            .filter(|(prefix, _)| name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())?;
        let rest = &name[prefix.len()..];
        let module = modules
            .iter()
            .filter(|module| {
                rest.strip_prefix(module.name.as_str())
                    .is_some_and(|tail| tail.is_empty() || tail.starts_with('_'))
            })
            .max_by_key(|module| module.name.len())
            .map(|module| module.name.as_str());
        Some((is_private, module))
    }
}

/// Project configuration for a scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleConfig {
    /// Project root; sources are discovered under `<root>/src`.
    pub root: PathBuf,
    pub modules: Vec<Module>,
    /// Scanned before the discovered sources. Relative paths are taken
    /// from `root`.
    pub extra_files: Vec<PathBuf>,
    pub extra_macros: Vec<ExtraMacro>,
    pub naming: NamingConvention,
    /// Annotation macros stripped from function signatures.
    pub ignored_annotations: Vec<String>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        ModuleConfig {
            root: PathBuf::from("."),
            modules: Vec::new(),
            extra_files: Vec::new(),
            extra_macros: Vec::new(),
            naming: NamingConvention::default(),
            ignored_annotations: DEFAULT_IGNORED_ANNOTATIONS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }
}

impl ModuleConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ModuleConfig {
            root: root.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    #[must_use]
    pub fn with_extra_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_files.push(path.into());
        self
    }

    #[must_use]
    pub fn with_extra_macro(mut self, extra: ExtraMacro) -> Self {
        self.extra_macros.push(extra);
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// The module owning `path`: the configured module whose directory
    /// is the longest match at the start of `path` relative to the source
    /// directory. Files elsewhere belong to the empty module.
    pub fn module_of(&self, path: &Path) -> &str {
        let source_dir = self.source_dir();
        let Ok(relative) = path.strip_prefix(&source_dir) else {
            return "";
        };
        self.modules
            .iter()
            .filter(|module| !module.dir.is_empty() && relative.starts_with(&module.dir))
            .max_by_key(|module| module.dir.len())
            .map_or("", |module| module.name.as_str())
    }

    /// Tiebreak between two sightings of a name: sources inside a module
    /// directory outrank headers there, which outrank everything else.
    pub fn file_priority(&self, path: &Path) -> u8 {
        if self.module_of(path).is_empty() {
            return 0;
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("c") => 2,
            Some("h") => 1,
            _ => 0,
        }
    }

    /// Extra files followed by every `*.c` and `*.h` file under the source
    /// directory, in path order.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>, ScanError> {
        let mut found = Vec::new();
        walk(&self.source_dir(), &mut found)?;
        found.sort();
        let mut files: Vec<PathBuf> = self
            .extra_files
            .iter()
            .map(|path| self.root.join(path))
            .collect();
        files.extend(found);
        Ok(files)
    }

    pub fn register_extra_macros(&self, macros: &mut Macros) {
        for extra in &self.extra_macros {
            let args: Option<Vec<&str>> = extra
                .args
                .as_ref()
                .map(|args| args.iter().map(String::as_str).collect());
            macros.define(&extra.name, args.as_deref(), &extra.body);
        }
    }

    pub fn ignored_annotations(&self) -> Vec<&str> {
        self.ignored_annotations.iter().map(String::as_str).collect()
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let entries = fs::read_dir(dir).map_err(|err| ScanError::read(dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| ScanError::read(dir, err))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|err| ScanError::read(&path, err))?;
        if file_type.is_dir() {
            walk(&path, out)?;
        } else if matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("c" | "h")
        ) {
            out.push(path);
        }
    }
    Ok(())
}
