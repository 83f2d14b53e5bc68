//! C-aware tokenizer for layerc.
//!
//! Splits source text into a flat stream of [`Token`]s whose byte ranges
//! partition the input exactly. Bracket groups are single opaque tokens;
//! callers that need the inside re-tokenize [`Token::interior`] with
//! [`tokenize_at`], which keeps offsets relative to the original file.
//!
//! ```text
//! let tokens: TokenList = tokenize("int f(int x) { return x; }").collect();
//! // int, ' ', f, (int x), ' ', { return x; }
//! ```

mod cursor;
mod scanner;
mod text;
mod token;

pub use cursor::Cursor;
pub use scanner::{
    group_len, is_well_formed, tokenize, tokenize_at, tokenize_preproc, ScanMode, TokenScanner,
};
pub use text::{blank_comments, column_of, line_of, line_starts};
pub use token::{Delim, Span, Token, TokenKind, TokenList};
