//! Text helpers shared by the parsing layers.

use crate::scanner::tokenize_preproc;

/// 1-based line number of byte offset `pos`.
pub fn line_of(text: &str, pos: usize) -> usize {
    let end = pos.min(text.len());
    memchr::memchr_iter(b'\n', &text.as_bytes()[..end]).count() + 1
}

/// 1-based column of byte offset `pos`.
pub fn column_of(text: &str, pos: usize) -> usize {
    let end = pos.min(text.len());
    match memchr::memrchr(b'\n', &text.as_bytes()[..end]) {
        Some(nl) => end - nl,
        None => end + 1,
    }
}

/// Byte offsets at which each line starts. `starts[0]` is always 0.
pub fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(memchr::memchr_iter(b'\n', text.as_bytes()).map(|nl| nl + 1))
        .collect()
}

/// Blank out comments, keeping newlines and the total length unchanged so
/// byte offsets into the result stay valid.
pub fn blank_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokenize_preproc(text, 0) {
        if token.kind.is_comment() {
            out.extend(
                token
                    .text
                    .bytes()
                    .map(|b| if b == b'\n' { '\n' } else { ' ' }),
            );
        } else {
            out.push_str(&token.text);
        }
    }
    out
}
