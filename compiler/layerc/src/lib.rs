//! Module-boundary checker for C codebases.
//!
//! `layerc check <root>` scans the C sources under `<root>/src`, builds the
//! symbol table of records, fields, functions, typedefs and macros, and
//! reports what the scan found along the way.

pub mod check;
pub mod options;

use std::sync::Once;

pub use check::{exit, module_config, print_report, run_check, CheckReport};
pub use options::{parse_check_options, CheckOptions, UsageError};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// `LAYERC_LOG` (or `RUST_LOG`) selects the filter; `verbose` falls back to
/// `debug`. Without either, nothing is installed. `LAYERC_LOG_TREE` switches
/// to indented span output.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("LAYERC_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .or_else(|| verbose.then(|| "debug".to_owned()));
        let Some(directives) = directives else {
            return;
        };
        let filter = EnvFilter::new(directives);

        let result = if std::env::var_os("LAYERC_LOG_TREE").is_some() {
            let layer = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true);
            tracing_subscriber::registry().with(layer).with(filter).try_init()
        } else {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry().with(layer).with(filter).try_init()
        };
        if let Err(err) = result {
            eprintln!("layerc: cannot install logger: {err}");
        }
    });
}
