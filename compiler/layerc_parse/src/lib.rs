//! Heuristic C parsing for layerc.
//!
//! No C grammar is implemented. A token stream is cut into statements at
//! terminating punctuation and body boundaries, each statement is classified
//! by token patterns, and the extractors pick declarations apart:
//!
//! - [`Variable`]: one declarator and its type
//! - [`FunctionParts`]: prototype or definition
//! - [`RecordParts`]: struct, union or enum with its members
//!
//! Statements that match no pattern are expressions and are ignored by the
//! symbol table.

mod comment;
mod function;
mod keywords;
mod kind;
mod record;
mod statement;
mod variable;

pub use comment::{post_comment, pre_comment};
pub use function::FunctionParts;
pub use keywords::{
    get_base_type, is_control_keyword, is_name, is_record_keyword, is_reserved, is_type_keyword,
    BUILTIN_TYPES, CONTROL_KEYWORDS, C_TYPE_KEYWORDS, DEFAULT_IGNORED_ANNOTATIONS,
    RECORD_KEYWORDS,
};
pub use kind::{classify, StatementKind};
pub use record::RecordParts;
pub use statement::{statements, statements_of, Statement, Statements};
pub use variable::{TypeCarry, Variable};
