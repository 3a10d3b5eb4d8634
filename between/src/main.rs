use between_lib::{Between, ConfigError, Options};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

const BETWEEN_ABOUT: &str =
    "Normalize the blank lines between CSS rules, comments and @media blocks";

#[derive(Parser)]
#[command(name = "between")]
#[command(about = BETWEEN_ABOUT)]
struct Args {
    /// Input stylesheets. Reads stdin when none are given or for `-`.
    inputs: Vec<PathBuf>,

    /// Output file name (single input only).
    #[arg(short, long, conflicts_with_all = ["write", "check"])]
    output: Option<PathBuf>,

    /// Rewrite the input files in place.
    #[arg(short, long, conflicts_with = "check")]
    write: bool,

    /// Report inputs that would change and exit with status 1.
    #[arg(long)]
    check: bool,

    /// JSON options file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Blank lines between related rules.
    #[arg(long, value_name = "N")]
    space_related_rule: Option<usize>,

    /// Blank lines between unrelated rules.
    #[arg(long, value_name = "N")]
    space_unrelated_rule: Option<usize>,

    /// Blank lines before a heading comment.
    #[arg(long, value_name = "N")]
    space_heading_before: Option<usize>,

    /// Blank lines after a heading comment.
    #[arg(long, value_name = "N")]
    space_heading_after: Option<usize>,

    /// Blank lines around a related @media/@supports block.
    #[arg(long, value_name = "N")]
    space_related_at_rule: Option<usize>,

    /// Blank lines around an unrelated or empty @media/@supports block.
    #[arg(long, value_name = "N")]
    space_unrelated_at_rule: Option<usize>,

    /// Put each selector of a selector list on its own line.
    #[arg(long)]
    break_multiple_selectors: bool,

    /// Heading comment marker, repeatable. Replaces the configured markers.
    #[arg(long = "heading-identifier", value_name = "TEXT")]
    heading_identifiers: Vec<String>,

    /// Never treat comments as section headings.
    #[arg(long, conflicts_with = "heading_identifiers")]
    no_headings: bool,

    /// Print the resolved options as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn reads_stdin(&self) -> bool {
        self.inputs.is_empty() || self.inputs.iter().all(|p| p.as_os_str() == "-")
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Defaults, then the config file, then command line flags.
fn resolve_options(args: &Args) -> Result<Options, ConfigError> {
    let mut options = match &args.config {
        Some(path) => Options::from_path(path)?,
        None => Options::default(),
    };

    let overrides = [
        (args.space_related_rule, &mut options.space_related_rule),
        (args.space_unrelated_rule, &mut options.space_unrelated_rule),
        (args.space_heading_before, &mut options.space_heading_before),
        (args.space_heading_after, &mut options.space_heading_after),
        (args.space_related_at_rule, &mut options.space_related_at_rule),
        (args.space_unrelated_at_rule, &mut options.space_unrelated_at_rule),
    ];
    for (flag, value) in overrides {
        if let Some(flag) = flag {
            *value = flag;
        }
    }

    if args.break_multiple_selectors {
        options.break_multiple_selectors = true;
    }
    if args.no_headings {
        options.heading_comment_identifiers.clear();
    } else if !args.heading_identifiers.is_empty() {
        options.heading_comment_identifiers = args.heading_identifiers.clone();
    }
    Ok(options)
}

fn run_stdin(between: &Between, args: &Args) -> i32 {
    if args.write {
        eprintln!("Error: --write needs input files");
        return 1;
    }

    let mut css = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut css) {
        eprintln!("Error reading stdin: {}", e);
        return 1;
    }

    let spaced = match between.process_str(&css) {
        Ok(spaced) => spaced,
        Err(e) => {
            eprintln!("<stdin>: {}", e);
            return 1;
        }
    };

    if args.check {
        return i32::from(spaced != css);
    }
    emit(&spaced, args.output.as_deref())
}

fn run_files(between: &Between, args: &Args) -> i32 {
    if args.output.is_some() && args.inputs.len() > 1 {
        eprintln!("Error: --output takes a single input file");
        return 1;
    }

    let mut status = 0;
    let mut paths = Vec::new();
    let mut sources = Vec::new();
    for path in &args.inputs {
        match fs::read_to_string(path) {
            Ok(css) => {
                paths.push(path);
                sources.push(css);
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                status = 1;
            }
        }
    }

    let results = between.process_batch(&sources);
    for ((path, source), result) in paths.into_iter().zip(&sources).zip(results) {
        let spaced = match result {
            Ok(spaced) => spaced,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                status = 1;
                continue;
            }
        };

        if args.check {
            if spaced != *source {
                eprintln!("{} would be respaced", path.display());
                status = 1;
            }
        } else if args.write {
            if spaced != *source {
                if let Err(e) = fs::write(path, &spaced) {
                    eprintln!("Error writing {}: {}", path.display(), e);
                    status = 1;
                } else {
                    log::info!("respaced {}", path.display());
                }
            }
        } else if emit(&spaced, args.output.as_deref()) != 0 {
            status = 1;
        }
    }
    status
}

fn emit(css: &str, output: Option<&Path>) -> i32 {
    let written = match output {
        Some(path) => fs::write(path, css),
        None => io::stdout().write_all(css.as_bytes()),
    };
    match written {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            1
        }
    }
}

fn main() {
    // parse the args given in terminal
    let args: Args = Args::parse();
    init_logging(args.verbose);

    let options = match resolve_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let between = match Between::new(options) {
        Ok(between) => between,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if args.print_config {
        match between.options().to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let status = if args.reads_stdin() {
        run_stdin(&between, &args)
    } else {
        run_files(&between, &args)
    };
    process::exit(status);
}
