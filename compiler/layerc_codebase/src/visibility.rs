//! Visibility and module resolution for a declaration.
//!
//! Precedence: an explicit `#public` / `#private` annotation in the leading
//! or trailing comment, then (for names in the record namespace) the naming
//! convention, then the defaults of the file being scanned.

use layerc_diagnostic::WarningKind;
use layerc_lexer::Token;

use crate::ScanContext;

/// Resolved visibility. `is_private == None` means unspecified, which
/// reads as public.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Visibility {
    pub is_private: Option<bool>,
    pub module: String,
}

/// Explicit annotation found in a comment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Annotation<'a> {
    pub is_private: bool,
    pub module: Option<&'a str>,
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Find the first `#public` or `#private` marker in `comment`, with an
/// optional `(MODULE)` right after it.
pub fn parse_annotation(comment: &str) -> Option<Annotation<'_>> {
    let bytes = comment.as_bytes();
    for (hash, _) in comment.match_indices('#') {
        let rest = &comment[hash + 1..];
        let (is_private, len) = if rest.starts_with("public") {
            (false, "public".len())
        } else if rest.starts_with("private") {
            (true, "private".len())
        } else {
            continue;
        };
        let end = hash + 1 + len;
        if bytes.get(end).is_some_and(|&b| is_word_byte(b)) {
            continue;
        }
        let module = comment[end..].strip_prefix('(').and_then(|inner| {
            let len = inner.bytes().take_while(|&b| is_word_byte(b)).count();
            (len > 0 && inner[len..].starts_with(')')).then(|| &inner[..len])
        });
        return Some(Annotation { is_private, module });
    }
    None
}

/// Resolve the visibility of `name`, declared at `offset` with the given
/// comments. `use_naming` enables the naming-convention fallback.
///
/// An annotation always decides privacy. When it names a module and the
/// naming convention names a different one, the annotation wins and an
/// [`WarningKind::AMBIGUOUS_VISIBILITY`] warning is recorded.
pub fn resolve(
    pre_comment: Option<&Token>,
    post_comment: Option<&Token>,
    name: &str,
    offset: usize,
    use_naming: bool,
    ctx: &ScanContext,
) -> Visibility {
    let annotation = pre_comment
        .and_then(|comment| parse_annotation(&comment.text))
        .or_else(|| post_comment.and_then(|comment| parse_annotation(&comment.text)));
    let naming = if use_naming {
        ctx.config.naming.classify(name, &ctx.config.modules)
    } else {
        None
    };
    let naming_module = naming.and_then(|(_, module)| module);

    if let Some(annotation) = annotation {
        if let (Some(explicit), Some(implied)) = (annotation.module, naming_module) {
            if explicit != implied {
                ctx.sink.warn(
                    WarningKind::AMBIGUOUS_VISIBILITY,
                    Some(ctx.location(offset)),
                    format!(
                        "'{name}' is annotated for module '{explicit}' but its name implies module '{implied}'"
                    ),
                );
            }
        }
        let module = annotation.module.or(naming_module).unwrap_or(ctx.module());
        return Visibility {
            is_private: Some(annotation.is_private),
            module: module.to_owned(),
        };
    }

    match naming {
        Some((is_private, module)) => Visibility {
            is_private: Some(is_private),
            module: module.unwrap_or(ctx.module()).to_owned(),
        },
        None => Visibility {
            is_private: None,
            module: ctx.module().to_owned(),
        },
    }
}
