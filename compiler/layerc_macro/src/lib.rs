//! C macros for layerc: `#define` parsing, the registry and expansion.
//!
//! ```text
//! let mut macros = Macros::new();
//! macros.define("CAT", Some(&["a", "b"]), "a##b");
//! assert_eq!(macros.expand("CAT(foo, bar)").text, "foobar");
//! ```

mod expand;
mod parts;
mod registry;

pub use expand::{c_string_escape, ExpansionError, MacroExpansion};
pub use parts::{MacroParts, VA_ARGS};
pub use registry::Macros;
