//! tsexports CLI: print where every export of a TypeScript entry module comes from.

use std::env;
use std::path::PathBuf;
use std::process;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION", "0.1.0");

/// CLI options parsed from arguments.
struct Options {
    entry: PathBuf,
    tsconfig: Option<PathBuf>,
    output_json: Option<PathBuf>,
    root: Option<PathBuf>,
    silent: bool,
    verbose: bool,
}

fn print_usage() {
    eprintln!("tsexports {} - TypeScript export provenance", VERSION);
    eprintln!();
    eprintln!("Usage: tsexports [options] <entry.ts>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tsconfig <path>      Use this tsconfig.json instead of the nearest one");
    eprintln!("  --output-json <path>   Also write the report to a file");
    eprintln!("  --root <dir>           Print module paths relative to this directory");
    eprintln!("                         (default: current directory)");
    eprintln!("  --silent               Do not print the report to stdout");
    eprintln!("  --verbose              Log walk details to stderr");
    eprintln!("  -h, --help             Show this help message");
    eprintln!("  -V, --version          Show version");
    eprintln!();
    eprintln!("Logging honours RUST_LOG when --verbose is not given.");
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(64);
}

fn option_value(args: &[String], i: &mut usize, flag: &str) -> PathBuf {
    *i += 1;
    match args.get(*i) {
        Some(value) => PathBuf::from(value),
        None => usage_error(&format!("{} requires a path", flag)),
    }
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut entry = None;
    let mut options = Options {
        entry: PathBuf::new(),
        tsconfig: None,
        output_json: None,
        root: None,
        silent: false,
        verbose: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("tsexports {}", VERSION);
                process::exit(0);
            }
            "--tsconfig" => options.tsconfig = Some(option_value(&args, &mut i, "--tsconfig")),
            "--output-json" => {
                options.output_json = Some(option_value(&args, &mut i, "--output-json"))
            }
            "--root" => options.root = Some(option_value(&args, &mut i, "--root")),
            "--silent" => options.silent = true,
            "--verbose" => options.verbose = true,
            arg if arg.starts_with('-') => usage_error(&format!("Unknown option: {}", arg)),
            arg => {
                if entry.is_some() {
                    usage_error(&format!("Unexpected argument: {}", arg));
                }
                entry = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    match entry {
        Some(entry) => options.entry = entry,
        None => usage_error("Missing entry module"),
    }
    options
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(options: &Options) -> Result<(), tsexports::error::ExportError> {
    let resolution = tsexports::resolve_entry(
        &options.entry,
        &tsexports::Options {
            tsconfig: options.tsconfig.clone(),
        },
    )?;

    let root = match &options.root {
        Some(root) => env::current_dir()?.join(root),
        None => env::current_dir()?,
    };
    let report = resolution.report(&root);

    if let Some(path) = &options.output_json {
        report.write_json(path)?;
    }
    if !options.silent {
        println!("{}", report.to_json_pretty()?);
    }
    Ok(())
}

fn main() {
    let options = parse_args();
    init_logging(options.verbose);

    if let Err(e) = run(&options) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}
