//! Command-line options of `layerc check`.

use std::path::PathBuf;

use layerc_codebase::{ExtraMacro, Module};

/// Options of `layerc check <root>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    pub root: PathBuf,
    /// Empty means every directory under `<root>/src` is a module.
    pub modules: Vec<Module>,
    pub extra_files: Vec<PathBuf>,
    pub extra_macros: Vec<ExtraMacro>,
    pub parallel: bool,
    pub threads: usize,
    pub cache: bool,
    pub clear_cache: bool,
    pub warn_module_mismatch: bool,
    pub verbose: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            root: PathBuf::new(),
            modules: Vec::new(),
            extra_files: Vec::new(),
            extra_macros: Vec::new(),
            parallel: true,
            threads: 0,
            cache: false,
            clear_cache: false,
            warn_module_mismatch: false,
            verbose: false,
        }
    }
}

/// Invalid command line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing project root")]
    MissingRoot,
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid value '{value}' for {option}")]
    InvalidValue { option: &'static str, value: String },
}

fn invalid(option: &'static str, value: &str) -> UsageError {
    UsageError::InvalidValue {
        option,
        value: value.to_owned(),
    }
}

/// Parse the arguments following `check`.
pub fn parse_check_options(args: &[String]) -> Result<CheckOptions, UsageError> {
    let mut options = CheckOptions::default();
    let mut root = None;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--module=") {
            let module = match value.split_once(':') {
                Some((name, dir)) if !name.is_empty() && !dir.is_empty() => Module::with_dir(name, dir),
                None if !value.is_empty() => Module::new(value),
                _ => return Err(invalid("--module", value)),
            };
            options.modules.push(module);
        } else if let Some(path) = arg.strip_prefix("--extra-file=") {
            if path.is_empty() {
                return Err(invalid("--extra-file", path));
            }
            options.extra_files.push(PathBuf::from(path));
        } else if let Some(definition) = arg.strip_prefix("--define=") {
            let extra = ExtraMacro::parse(definition).ok_or_else(|| invalid("--define", definition))?;
            options.extra_macros.push(extra);
        } else if let Some(count) = arg.strip_prefix("--threads=") {
            options.threads = count.parse().map_err(|_| invalid("--threads", count))?;
        } else if arg == "--no-parallel" {
            options.parallel = false;
        } else if arg == "--cache" {
            options.cache = true;
        } else if arg == "--clear-cache" {
            options.clear_cache = true;
        } else if arg == "--warn-module-mismatch" {
            options.warn_module_mismatch = true;
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else if arg.starts_with('-') {
            return Err(UsageError::UnknownOption(arg.clone()));
        } else if root.is_none() {
            root = Some(PathBuf::from(arg));
        } else {
            return Err(UsageError::UnexpectedArgument(arg.clone()));
        }
    }

    options.root = root.ok_or(UsageError::MissingRoot)?;
    Ok(options)
}

#[cfg(test)]
mod tests;
