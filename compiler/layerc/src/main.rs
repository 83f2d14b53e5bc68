//! Layerc CLI

use std::io::{self, Write};

use layerc::{exit, init_tracing, parse_check_options, print_report, run_check};

fn print_usage() {
    eprintln!("Usage: layerc check <root> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --module=<name>[:<dir>]   Treat src/<dir> as module <name> (repeatable)");
    eprintln!("  --extra-file=<path>       Scan an extra file, relative to <root>");
    eprintln!("  --define=<NAME[(a,b)]=body>  Predefine a macro");
    eprintln!("  --threads=<n>             Worker threads (default: all cores)");
    eprintln!("  --no-parallel             Scan files one at a time");
    eprintln!("  --cache                   Reuse scans from build/.parsecache");
    eprintln!("  --clear-cache             Delete the scan cache first");
    eprintln!("  --warn-module-mismatch    Report definitions seen in two modules");
    eprintln!("  -v, --verbose             Per-module summary and debug logging");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        print_usage();
        std::process::exit(exit::USAGE);
    };

    match command.as_str() {
        "check" => {
            let options = match parse_check_options(&args[2..]) {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("error: {err}");
                    print_usage();
                    std::process::exit(exit::USAGE);
                }
            };
            init_tracing(options.verbose);

            let report = match run_check(&options) {
                Ok(report) => report,
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(exit::FATAL);
                }
            };

            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            let printed = print_report(&report, options.verbose, &mut out).and_then(|()| out.flush());
            if let Err(err) = printed {
                if err.kind() != io::ErrorKind::BrokenPipe {
                    eprintln!("error: cannot write report: {err}");
                }
                std::process::exit(exit::FATAL);
            }
            std::process::exit(report.exit_code());
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => println!("layerc {}", env!("CARGO_PKG_VERSION")),
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(exit::USAGE);
        }
    }
}
